#![allow(non_snake_case)]
use quass::algebra::*;
use quass::solver::*;

fn main() {
    // minimize    3x₁² + 2x₂² - x₁ - 4x₂
    // subject to  x₁ - 2x₂ = 0
    //             -1 ≤ x ≤ 1

    let Q = CscMatrix::new(
        2,             // m
        2,             // n
        vec![0, 1, 2], // colptr
        vec![0, 1],    // rowval
        vec![6., 4.],  // nzval
    );

    let c = vec![-1., -4.];

    let A = CscMatrix::from(&[[1., -2.]]);

    let instance = Instance::new(Q, &c, A, &[0.], &[0.], &[-1., -1.], &[1., 1.]).unwrap();

    let settings = DefaultSettings::default();

    let mut solver = QpSolver::new(instance, settings).unwrap();

    solver.solve();

    println!("Solution(x)     = {:?}", solver.solution.x);
    println!("Multipliers(y)  = {:?}", solver.solution.row_duals);
    println!("Bound duals(z)  = {:?}", solver.solution.var_duals);
}
