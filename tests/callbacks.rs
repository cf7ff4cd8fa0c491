#![allow(non_snake_case)]

#[cfg(test)]
mod callback_test {

    use quass::solver::DefaultInfo;
    use quass::{algebra::*, solver::*};

    // setup a custom termination function
    fn callback_r(info: &DefaultInfo<f64>) -> bool {
        if info.iterations < 3 {
            println!("tick");
            false //continue
        } else {
            println!("BOOM!\n");
            true // stop
        }
    }

    // minimize ½|x|² - 2 sum(x),  x ≤ 1.  Every bound blocks
    // in turn, one iteration each
    fn test_solver() -> QpSolver<f64> {
        let n = 5;
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
        let settings = DefaultSettingsBuilder::default()
            .verbose(false)
            .build()
            .unwrap();
        QpSolver::new(instance, settings).unwrap()
    }

    #[test]
    fn test_callbacks() {
        let mut solver = test_solver();

        solver.set_termination_callback(callback_r);
        solver.solve();
        assert_eq!(solver.solution.status, SolverStatus::Interrupted);
        assert_eq!(solver.solution.iterations, 3);

        // turn it off and run again
        solver.unset_termination_callback();
        solver.solve();
        assert_eq!(solver.solution.status, SolverStatus::Optimal);
        assert!(solver.solution.x.norm_inf_diff(&[1.; 5]) <= 1e-9);

        // a capturing callback that stops immediately
        let limit = 0u32;
        solver.set_termination_callback(move |info: &DefaultInfo<f64>| info.iterations >= limit);
        solver.solve();
        assert_eq!(solver.solution.status, SolverStatus::Interrupted);
        assert_eq!(solver.solution.iterations, 0);
    }

    #[test]
    fn test_cancel_token() {
        let mut solver = test_solver();
        let token = solver.cancel_token();

        // a request made before the solve stops it at once
        token.cancel();
        assert_eq!(solver.solve(), SolverStatus::Interrupted);
        assert_eq!(solver.solution.iterations, 0);

        token.reset();
        assert_eq!(solver.solve(), SolverStatus::Optimal);
    }

    #[test]
    fn test_cancel_from_thread() {
        let mut solver = test_solver();
        let token = solver.cancel_token();

        std::thread::spawn(move || token.cancel()).join().unwrap();
        assert_eq!(solver.solve(), SolverStatus::Interrupted);
    }
}
