#![allow(non_snake_case)]

use quass::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

// badly scaled problem:  minimize ½(1e4 x₁² + 1e-2 x₂²) - 1e2 x₁ - x₂
// subject to 1e3 x₁ + 1e-1 x₂ ≤ 2e3,  x ≥ 0
fn badly_scaled_data() -> Instance<f64> {
    let Q = CscMatrix::<f64>::diagonal(&[1e4, 1e-2]);
    let A = CscMatrix::from(&[[1e3, 1e-1]]);
    Instance::new(Q, &[-1e2, -1.], A, &[-INF], &[2e3], &[0., 0.], &[INF, INF]).unwrap()
}

fn solve_with(scale: bool) -> QpSolver<f64> {
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .scale(scale)
        .build()
        .unwrap();
    let mut solver = QpSolver::new(badly_scaled_data(), settings).unwrap();
    solver.solve();
    solver
}

#[test]
fn test_scaling_matches_unscaled() {
    let scaled = solve_with(true);
    let unscaled = solve_with(false);

    assert_eq!(scaled.solution.status, SolverStatus::Optimal);
    assert_eq!(unscaled.solution.status, SolverStatus::Optimal);

    let (a, b) = (scaled.solution.objective, unscaled.solution.objective);
    assert!(f64::abs(a - b) <= 1e-6 * f64::max(1., f64::abs(b)));
    assert!(scaled.solution.x.norm_inf_diff(&unscaled.solution.x) <= 1e-6);

    // results are reported in the units of the original problem
    assert!(scaled.solution.primal_infeasibility <= 1e-6);
    assert!(scaled.solution.dual_infeasibility <= 1e-6);
    assert_eq!(scaled.instance(), unscaled.instance());
}

#[test]
fn test_scaling_disabled() {
    let scaled = solve_with(true);
    let unscaled = solve_with(false);

    let s = scaled.scaling();
    assert!(s.col.iter().any(|&v| v != 1.));
    assert_eq!(s.col.len(), 2);
    assert_eq!(s.row.len(), 1);

    let u = unscaled.scaling();
    assert!(u.col.iter().chain(u.row.iter()).all(|&v| v == 1.));
    assert_eq!(u.cost, 1.);
}

// ½|u - (1,2,3,4)|² over Σu ≤ 2.5,  u₁ - u₄ ≥ -2,  0 ≤ u ≤ 1,
// written in x = u / s for column magnitudes s spanning 1e-3..1e3.
// The solution is u = (0, ½, 1, 1) with objective -6.875
fn mixed_magnitude_data() -> Instance<f64> {
    let s = [1e3, 1e-3, 1e2, 1e-2];
    let q: Vec<f64> = s.iter().map(|v| v * v).collect();
    let c: Vec<f64> = s.iter().enumerate().map(|(j, v)| -((j + 1) as f64) * v).collect();
    let A = CscMatrix::from(&[[s[0], s[1], s[2], s[3]], [s[0], 0., 0., -s[3]]]);
    let upper: Vec<f64> = s.iter().map(|v| 1. / v).collect();
    Instance::new(
        CscMatrix::<f64>::diagonal(&q),
        &c,
        A,
        &[-INF, -2.],
        &[2.5, INF],
        &[0.; 4],
        &upper,
    )
    .unwrap()
}

#[test]
fn test_mixed_magnitudes_monotone() {
    for scale in [true, false] {
        let settings = DefaultSettingsBuilder::default()
            .verbose(false)
            .scale(scale)
            .perturb(false)
            .build()
            .unwrap();
        let mut solver = QpSolver::new(mixed_magnitude_data(), settings).unwrap();
        assert_eq!(solver.solve(), SolverStatus::Optimal);
        assert!(f64::abs(solver.solution.objective + 6.875) <= 1e-6);

        let u: Vec<f64> = solver
            .solution
            .x
            .iter()
            .zip([1e3, 1e-3, 1e2, 1e-2])
            .map(|(x, s)| x * s)
            .collect();
        assert!(u.norm_inf_diff(&[0., 0.5, 1., 1.]) <= 1e-6);

        // no iteration may raise the objective
        let obj = &solver.info.statistics.objective;
        assert!(!obj.is_empty());
        for w in obj.windows(2) {
            assert!(w[1] <= w[0] + 1e-9 * (1. + f64::abs(w[0])));
        }
    }
}
