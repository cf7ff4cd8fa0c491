#![allow(non_snake_case)]

use quass::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

fn basic_lp_data() -> Instance<f64> {
    // -1 ≤ 2x ≤ 1 as rows, no variable bounds
    let Q = CscMatrix::<f64>::zeros((3, 3));
    let mut A = CscMatrix::<f64>::identity(3);
    A.scale(2.);

    let c = vec![3., -2., 1.];

    Instance::new(Q, &c, A, &[-1.; 3], &[1.; 3], &[-INF; 3], &[INF; 3]).unwrap()
}

fn quiet_settings() -> DefaultSettings<f64> {
    DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap()
}

#[test]
fn test_lp_feasible() {
    let mut solver = QpSolver::new(basic_lp_data(), quiet_settings()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Optimal);

    let refsol = vec![-0.5, 0.5, -0.5];
    assert!(solver.solution.x.norm_inf_diff(&refsol) <= 1e-8);

    let refobj = -3.;
    assert!(f64::abs(solver.solution.objective - refobj) <= 1e-8);

    // a vertex: every row active on the side opposite its cost
    assert_eq!(
        solver.solution.row_status,
        vec![BasisStatus::AtLower, BasisStatus::AtUpper, BasisStatus::AtLower]
    );
    assert!(solver.solution.row_duals.norm_inf_diff(&[1.5, -1., 0.5]) <= 1e-8);
}

#[test]
fn test_lp_primal_infeasible() {
    // 2 x1 ≤ -1 and 2 x1 ≥ 1 on separate rows
    let Q = CscMatrix::<f64>::zeros((3, 3));
    let A = CscMatrix::from(&[[2., 0., 0.], [2., 0., 0.], [0., 2., 0.], [0., 0., 2.]]);
    let instance = Instance::new(
        Q,
        &[3., -2., 1.],
        A,
        &[-INF, 1., -1., -1.],
        &[-1., INF, 1., 1.],
        &[-INF; 3],
        &[INF; 3],
    )
    .unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Infeasible);
    assert!(solver.solution.primal_infeasibility > 1e-7);
}

#[test]
fn test_lp_dual_infeasible() {
    // rows bound x from below only and x2 has negative cost
    let Q = CscMatrix::<f64>::zeros((3, 3));
    let mut A = CscMatrix::<f64>::identity(3);
    A.scale(2.);
    let instance =
        Instance::new(Q, &[3., -2., 1.], A, &[-1.; 3], &[INF; 3], &[-INF; 3], &[INF; 3]).unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Unbounded);
}

#[test]
fn test_lp_phase_one_start() {
    // start outside the feasible box and with an equality row
    let Q = CscMatrix::<f64>::zeros((2, 2));
    let A = CscMatrix::from(&[[1., 1.], [1., -1.]]);
    let instance = Instance::new(
        Q,
        &[1., 2.],
        A,
        &[2., -INF],
        &[2., 1.],
        &[0., 0.],
        &[INF, INF],
    )
    .unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    let start = StartPoint {
        primal: Some(vec![5., -3.]),
        ..StartPoint::default()
    };
    let status = solver.solve_from(&start).unwrap();

    // minimize x1 + 2 x2 on x1 + x2 = 2, x1 - x2 ≤ 1, x ≥ 0
    assert_eq!(status, SolverStatus::Optimal);
    assert!(solver.solution.x.norm_inf_diff(&[1.5, 0.5]) <= 1e-8);
    assert!(f64::abs(solver.solution.objective - 2.5) <= 1e-8);
    assert!(solver.solution.primal_infeasibility <= 1e-8);
}
