#![allow(non_snake_case)]
use quass::algebra::*;
use quass::solver::*;

fn main() {
    // minimize ½|x|² - 2 sum(x),  x ≤ 1
    let n = 10;
    let instance = Instance::new(
        CscMatrix::<f64>::identity(n),
        &vec![-2.; n],
        CscMatrix::<f64>::zeros((0, n)),
        &[],
        &[],
        &vec![f64::NEG_INFINITY; n],
        &vec![1.; n],
    )
    .unwrap();

    let settings = DefaultSettings::default();
    let mut solver = QpSolver::new(instance, settings).unwrap();

    // stop once four constraints are active
    solver.set_termination_callback(|info: &DefaultInfo<f64>| {
        println!("iteration {}: {} active", info.iterations, info.num_active);
        info.num_active >= 4
    });
    solver.solve();
    println!("Status = {}", solver.solution.status);

    // the same solve, stopped from another thread
    solver.unset_termination_callback();
    let token = solver.cancel_token();
    std::thread::spawn(move || token.cancel()).join().unwrap();
    solver.solve();
    println!("Status = {}", solver.solution.status);
}
