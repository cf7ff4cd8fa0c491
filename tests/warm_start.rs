#![allow(non_snake_case)]

#[cfg(test)]
mod warm_start_tests {
    use quass::algebra::*;
    use quass::solver::*;

    // minimize 3x₁² + 2x₂² - x₁ - 4x₂
    // subject to x₁ - 2x₂ = 0,  -1 ≤ x ≤ 1
    // solution (3/7, 3/14)
    fn warm_start_data() -> Instance<f64> {
        let Q = CscMatrix::from(&[[6., 0.], [0., 4.]]);
        let c = vec![-1., -4.];
        let A = CscMatrix::from(&[[1., -2.]]);
        Instance::new(Q, &c, A, &[0.], &[0.], &[-1., -1.], &[1., 1.]).unwrap()
    }

    fn warm_start_solver() -> QpSolver<f64> {
        let settings = DefaultSettingsBuilder::default()
            .verbose(false)
            .build()
            .unwrap();
        QpSolver::new(warm_start_data(), settings).unwrap()
    }

    const XSOL: [f64; 2] = [3. / 7., 3. / 14.];

    #[test]
    fn test_warm_start_basic() {
        let mut solver = warm_start_solver();
        let start = StartPoint {
            primal: Some(vec![0.4, 0.2]),
            row_duals: Some(vec![0.1]),
            working_set: vec![(0, BasisStatus::AtLower)],
        };
        let status = solver.solve_from(&start).unwrap();

        assert_eq!(status, SolverStatus::Optimal);
        assert!(solver.solution.x.norm_inf_diff(&XSOL) <= 1e-8);
        assert!(f64::abs(solver.solution.objective + 9. / 14.) <= 1e-8);
        assert_eq!(solver.solution.row_status, vec![BasisStatus::AtLower]);
    }

    #[test]
    fn test_warm_start_at_solution() {
        let mut solver = warm_start_solver();
        solver.solve();
        let cold = solver.solution.iterations;

        let start = StartPoint {
            primal: Some(solver.solution.x.clone()),
            row_duals: Some(solver.solution.row_duals.clone()),
            ..StartPoint::default()
        };
        let status = solver.solve_from(&start).unwrap();

        assert_eq!(status, SolverStatus::Optimal);
        assert!(solver.solution.x.norm_inf_diff(&XSOL) <= 1e-8);
        assert!(solver.solution.iterations <= cold);
    }

    #[test]
    fn test_warm_start_loose_working_set() {
        // x₁ is not at its upper bound, so that entry is ignored
        let mut solver = warm_start_solver();
        let start = StartPoint {
            primal: Some(vec![0., 0.]),
            working_set: vec![(1, BasisStatus::AtUpper)],
            ..StartPoint::default()
        };
        let status = solver.solve_from(&start).unwrap();

        assert_eq!(status, SolverStatus::Optimal);
        assert!(solver.solution.x.norm_inf_diff(&XSOL) <= 1e-8);
        assert_eq!(solver.solution.var_status, vec![BasisStatus::Basic; 2]);
    }

    #[test]
    fn test_warm_start_infeasible_primal() {
        // (2, 2) projects to (1, 1), which violates the equality row
        let mut solver = warm_start_solver();
        let start = StartPoint {
            primal: Some(vec![2., 2.]),
            ..StartPoint::default()
        };
        let status = solver.solve_from(&start).unwrap();

        assert_eq!(status, SolverStatus::Optimal);
        assert!(solver.solution.x.norm_inf_diff(&XSOL) <= 1e-8);
        assert!(solver.solution.primal_infeasibility <= 1e-8);
    }

    #[test]
    fn test_warm_start_repeated_solves() {
        // solves do not depend on the state left by a previous one
        let mut solver = warm_start_solver();
        solver.solve();
        let x1 = solver.solution.x.clone();
        let it1 = solver.solution.iterations;

        let start = StartPoint {
            primal: Some(vec![-1., 1.]),
            ..StartPoint::default()
        };
        solver.solve_from(&start).unwrap();
        solver.solve();

        assert_eq!(solver.solution.x, x1);
        assert_eq!(solver.solution.iterations, it1);
    }
}
