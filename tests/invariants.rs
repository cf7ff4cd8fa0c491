#![allow(non_snake_case)]

use quass::{algebra::*, solver::*};

const INF: f64 = f64::INFINITY;

// minimize ½x'Qx - Σ (j+1) x_j with Q = tridiag(-1, 2, -1)
// subject to Σ x ≤ 3,  x₁ - x₆ ≥ -1,  0 ≤ x ≤ 1
fn chain_data() -> Instance<f64> {
    let n = 6;
    let mut Q = TripletMatrix::<f64>::new(n, n, vec![], vec![], vec![]);
    for j in 0..n {
        Q.push(j, j, 2.);
        if j + 1 < n {
            Q.push(j, j + 1, -1.);
            Q.push(j + 1, j, -1.);
        }
    }
    let c: Vec<f64> = (0..n).map(|j| -((j + 1) as f64)).collect();
    let A = CscMatrix::from(&[
        [1., 1., 1., 1., 1., 1.],
        [1., 0., 0., 0., 0., -1.],
    ]);
    Instance::new(Q, &c, A, &[-INF, -1.], &[3., INF], &[0.; 6], &[1.; 6]).unwrap()
}

fn solve_chain(ratiotest: RatiotestStrategy, pricing: PricingStrategy) -> QpSolver<f64> {
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .perturb(false)
        .ratiotest(ratiotest)
        .pricing(pricing)
        .build()
        .unwrap();
    let mut solver = QpSolver::new(chain_data(), settings).unwrap();
    solver.solve();
    solver
}

const STRATEGIES: [(RatiotestStrategy, PricingStrategy); 4] = [
    (RatiotestStrategy::Textbook, PricingStrategy::Dantzig),
    (RatiotestStrategy::Textbook, PricingStrategy::SteepestEdge),
    (RatiotestStrategy::TwoPass, PricingStrategy::Dantzig),
    (RatiotestStrategy::TwoPass, PricingStrategy::SteepestEdge),
];

#[test]
fn test_objective_monotone() {
    for (rt, pr) in STRATEGIES {
        let solver = solve_chain(rt, pr);
        assert_eq!(solver.solution.status, SolverStatus::Optimal);

        let obj = &solver.info.statistics.objective;
        for w in obj.windows(2) {
            assert!(w[1] <= w[0] + 1e-9 * (1. + f64::abs(w[0])));
        }
    }
}

#[test]
fn test_feasibility_preserved() {
    for (rt, pr) in STRATEGIES {
        let solver = solve_chain(rt, pr);
        let stats = &solver.info.statistics;
        assert!(!stats.is_empty());
        assert!(stats.primal_infeasibility.iter().all(|&v| v <= 1e-7));
        assert!(stats.phase.iter().all(|&p| p == 2));
    }
}

#[test]
fn test_working_set_square() {
    for (rt, pr) in STRATEGIES {
        let solver = solve_chain(rt, pr);
        let stats = &solver.info.statistics;
        for k in 0..stats.len() {
            assert_eq!(stats.num_active[k] + stats.nullspace_dim[k], 6);
            assert_eq!(stats.iteration[k] as usize, k + 1);
        }
    }
}

#[test]
fn test_strategies_agree() {
    let reference = solve_chain(RatiotestStrategy::Textbook, PricingStrategy::Dantzig);
    for (rt, pr) in STRATEGIES {
        let solver = solve_chain(rt, pr);
        let sol = &solver.solution;
        assert!(f64::abs(sol.objective - reference.solution.objective) <= 1e-7);
        assert!(sol.primal_infeasibility <= 1e-7);
        assert!(sol.dual_infeasibility <= 1e-6);
    }
}

#[test]
fn test_phase_one_statistics() {
    // start violates the first row, so the history begins in phase 1
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap();
    let mut solver = QpSolver::new(chain_data(), settings).unwrap();
    let start = StartPoint {
        primal: Some(vec![1.; 6]),
        ..StartPoint::default()
    };
    assert_eq!(solver.solve_from(&start).unwrap(), SolverStatus::Optimal);

    let phases = &solver.info.statistics.phase;
    assert_eq!(phases.first(), Some(&1));
    assert!(phases.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(solver.solution.iterations as usize, phases.len());
}
