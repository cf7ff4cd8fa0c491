#![allow(non_snake_case)]
use quass::algebra::*;
use quass::solver::*;

fn main() {
    // minimize    3x₁ - 2x₂ + x₃
    // subject to  -1 ≤ 2x ≤ 1, as rows in triplet format

    let Q = CscMatrix::<f64>::zeros((3, 3));
    let c = [3., -2., 1.];
    let A = TripletMatrix::new(3, 3, vec![0, 1, 2], vec![0, 1, 2], vec![2., 2., 2.]);

    let inf = f64::INFINITY;
    let instance = Instance::new(Q, &c, A, &[-1.; 3], &[1.; 3], &[-inf; 3], &[inf; 3]).unwrap();

    let settings = DefaultSettingsBuilder::default()
        .ratiotest(RatiotestStrategy::TwoPass)
        .build()
        .unwrap();

    let mut solver = QpSolver::new(instance, settings).unwrap();

    solver.solve();

    println!("Solution = {:?}", solver.solution.x);
    println!("Status   = {}", solver.solution.status);
}
