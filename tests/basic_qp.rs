#![allow(non_snake_case)]

use quass::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

fn quiet_settings() -> DefaultSettings<f64> {
    DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap()
}

fn basic_qp_data() -> Instance<f64> {
    // Q = [4. 1;1 2]
    let Q = CscMatrix::new(
        2,                    // m
        2,                    // n
        vec![0, 2, 4],        // colptr
        vec![0, 1, 0, 1],     // rowval
        vec![4., 1., 1., 2.], // nzval
    );

    // x1 + x2 = 1,  0 ≤ x ≤ 0.7
    let A = CscMatrix::from(&[[1., 1.]]);

    Instance::new(Q, &[1., 1.], A, &[1.], &[1.], &[0., 0.], &[0.7, 0.7]).unwrap()
}

fn basic_qp_data_dual_inf() -> Instance<f64> {
    // Q = [1. 1;1 1]
    let Q = CscMatrix::from(&[[1., 1.], [1., 1.]]);
    // x1 + x2 ≤ 1,  x1 ≤ 1
    let A = CscMatrix::from(&[[1., 1.], [1., 0.]]);

    Instance::new(Q, &[1., -1.], A, &[-INF, -INF], &[1., 1.], &[-INF; 2], &[INF; 2]).unwrap()
}

#[test]
fn test_qp_feasible() {
    let mut solver = QpSolver::new(basic_qp_data(), quiet_settings()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Optimal);

    let refsol = vec![0.3, 0.7];
    assert!(solver.solution.x.norm_inf_diff(&refsol) <= 1e-8);

    let refobj = 1.88;
    assert!(f64::abs(solver.solution.objective - refobj) <= 1e-8);
    assert!(solver.solution.primal_infeasibility <= 1e-8);
    assert!(solver.solution.dual_infeasibility <= 1e-7);

    // x2 sits at its upper bound with a nonpositive multiplier
    assert_eq!(solver.solution.var_status[1], BasisStatus::AtUpper);
    assert!(solver.solution.var_duals[1] <= 0.);
}

#[test]
fn test_qp_dual_infeasible() {
    let mut solver = QpSolver::new(basic_qp_data_dual_inf(), quiet_settings()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Unbounded);
}

#[test]
fn test_qp_unconstrained() {
    let instance = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -2.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[-INF; 2],
        &[INF; 2],
    )
    .unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Optimal);
    assert!(solver.solution.x.norm_inf_diff(&[1., 2.]) <= 1e-9);
    assert!(f64::abs(solver.solution.objective + 2.5) <= 1e-9);
    assert_eq!(solver.solution.iterations, 1);
}

#[test]
fn test_qp_box_constrained() {
    // minimize ½(x² + y²),  0 ≤ x,y ≤ 1, from (0.5, 0.5)
    let instance = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[0., 0.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[0., 0.],
        &[1., 1.],
    )
    .unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    let start = StartPoint {
        primal: Some(vec![0.5, 0.5]),
        ..StartPoint::default()
    };
    let status = solver.solve_from(&start).unwrap();

    assert_eq!(status, SolverStatus::Optimal);
    assert!(solver.solution.x.norm_inf() <= 1e-12);
    assert!(f64::abs(solver.solution.objective) <= 1e-12);
}

#[test]
fn test_qp_active_linear_constraint() {
    // minimize ½((x-2)² + (y-2)²),  x + y ≤ 1,  x, y ≥ 0
    let instance = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-2., -2.],
        CscMatrix::from(&[[1., 1.]]),
        &[-INF],
        &[1.],
        &[0., 0.],
        &[INF, INF],
    )
    .unwrap()
    .with_offset(4.)
    .unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    solver.solve();

    let sol = &solver.solution;
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.norm_inf_diff(&[0.5, 0.5]) <= 1e-9);
    assert!(f64::abs(sol.objective - 2.25) <= 1e-9);

    // exactly one constraint active, with a multiplier of the right sign
    assert_eq!(sol.row_status, vec![BasisStatus::AtUpper]);
    assert!(sol.var_status.iter().all(|s| !s.is_active()));
    assert!(f64::abs(sol.row_duals[0] + 1.5) <= 1e-9);
}

#[test]
fn test_qp_unbounded_ray() {
    // Q = diag(1,0), c = (0,-1), no constraints
    let instance = Instance::new(
        CscMatrix::<f64>::diagonal(&[1., 0.]),
        &[0., -1.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[-INF; 2],
        &[INF; 2],
    )
    .unwrap();

    let mut solver = QpSolver::new(instance, quiet_settings()).unwrap();
    assert_eq!(solver.solve(), SolverStatus::Unbounded);
}

#[test]
fn test_qp_iteration_limit() {
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .iteration_limit(0u32)
        .build()
        .unwrap();

    let mut solver = QpSolver::new(basic_qp_data(), settings).unwrap();
    let start = StartPoint {
        primal: Some(vec![0.25, 0.5]),
        ..StartPoint::default()
    };
    let status = solver.solve_from(&start).unwrap();

    assert_eq!(status, SolverStatus::IterationLimit);
    assert_eq!(solver.solution.x, vec![0.25, 0.5]);
    assert_eq!(solver.solution.iterations, 0);
}

#[test]
fn test_qp_time_limit() {
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .time_limit(0.0)
        .build()
        .unwrap();

    let mut solver = QpSolver::new(basic_qp_data(), settings).unwrap();
    // feasible, so the first termination check is in the main loop
    let start = StartPoint {
        primal: Some(vec![0.3, 0.7]),
        ..StartPoint::default()
    };
    let status = solver.solve_from(&start).unwrap();

    assert_eq!(status, SolverStatus::TimeLimit);
    assert!(solver.solution.x.norm_inf_diff(&[0.3, 0.7]) <= 1e-12);
    assert_eq!(solver.solution.iterations, 0);
}

fn degenerate_data() -> Instance<f64> {
    // minimize ½|x|² - x1 - 2 x2 - 2 x3
    // subject to x1 + x2 ≤ 1,  x1 + x3 ≤ 1,  x ≥ 0
    Instance::new(
        CscMatrix::<f64>::identity(3),
        &[-1., -2., -2.],
        CscMatrix::from(&[[1., 1., 0.], [1., 0., 1.]]),
        &[-INF, -INF],
        &[1., 1.],
        &[0., 0., 0.],
        &[INF, INF, INF],
    )
    .unwrap()
}

#[test]
fn test_qp_degenerate_start() {
    // at (1,0,0) both rows and two variable bounds are tight,
    // four constraints in three dimensions
    let start = StartPoint {
        primal: Some(vec![1., 0., 0.]),
        ..StartPoint::default()
    };

    for (ratiotest, pricing) in [
        (RatiotestStrategy::Textbook, PricingStrategy::Dantzig),
        (RatiotestStrategy::TwoPass, PricingStrategy::Dantzig),
        (RatiotestStrategy::Textbook, PricingStrategy::SteepestEdge),
    ] {
        let settings = DefaultSettingsBuilder::default()
            .verbose(false)
            .ratiotest(ratiotest)
            .pricing(pricing)
            .build()
            .unwrap();

        let mut solver = QpSolver::new(degenerate_data(), settings).unwrap();
        let status = solver.solve_from(&start).unwrap();
        let sol = &solver.solution;

        assert_eq!(status, SolverStatus::Optimal);
        assert!(sol.x.norm_inf_diff(&[0., 1., 1.]) <= 1e-6);
        assert!(f64::abs(sol.objective + 3.) <= 1e-6);
        assert!(sol.primal_infeasibility <= 1e-7);
        assert!(sol.dual_infeasibility <= 1e-6);
        assert!(sol.iterations <= 20);
    }
}
