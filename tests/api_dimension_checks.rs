#![allow(non_snake_case)]
#![allow(clippy::type_complexity)]
use quass::{algebra::*, solver::*};

// a collection of tests to ensure that data of
// incompatible dimension won't be accepted

const INF: f64 = f64::INFINITY;

fn api_dim_check_data() -> (
    CscMatrix<f64>,
    Vec<f64>,
    CscMatrix<f64>,
    Vec<f64>,
    Vec<f64>,
    Vec<f64>,
    Vec<f64>,
) {
    let Q = CscMatrix::<f64>::spalloc(4, 4, 0);
    let c = vec![0.; 4];
    let A = CscMatrix::<f64>::spalloc(2, 4, 0);
    let con_lo = vec![-1.; 2];
    let con_up = vec![1.; 2];
    let var_lo = vec![-INF; 4];
    let var_up = vec![INF; 4];
    (Q, c, A, con_lo, con_up, var_lo, var_up)
}

#[test]
fn api_dim_check_working() {
    // This example should work because dimensions are
    // all compatible.  All following checks vary one
    // of these sizes to test dimension checks

    let (Q, c, A, cl, cu, vl, vu) = api_dim_check_data();
    let instance = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu).unwrap();
    assert_eq!(instance.num_total(), 6);

    let settings = DefaultSettings::default();
    assert!(QpSolver::new(instance, settings).is_ok());
}

#[test]
fn api_dim_check_bad_Q() {
    let (_Q, c, A, cl, cu, vl, vu) = api_dim_check_data();
    let Q = CscMatrix::<f64>::spalloc(3, 3, 0);

    let result = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu);
    assert_eq!(result, Err(DataError::IncompatibleDimension("Q")));
}

#[test]
fn api_dim_check_Q_not_square() {
    let (_Q, c, A, cl, cu, vl, vu) = api_dim_check_data();
    let Q = CscMatrix::<f64>::spalloc(4, 3, 0);

    let result = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu);
    assert_eq!(result, Err(DataError::IncompatibleDimension("Q")));
}

#[test]
fn api_dim_check_bad_A_rows() {
    let (Q, c, _A, cl, cu, vl, vu) = api_dim_check_data();
    let A = CscMatrix::<f64>::spalloc(3, 4, 0);

    let result = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu);
    assert_eq!(result, Err(DataError::IncompatibleDimension("A")));
}

#[test]
fn api_dim_check_bad_A_cols() {
    let (Q, c, _A, cl, cu, vl, vu) = api_dim_check_data();
    let A = CscMatrix::<f64>::spalloc(2, 3, 0);

    let result = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu);
    assert_eq!(result, Err(DataError::IncompatibleDimension("A")));
}

#[test]
fn api_dim_check_bad_bounds() {
    let (Q, c, A, cl, _cu, vl, vu) = api_dim_check_data();
    let result = Instance::new(Q.clone(), &c, A.clone(), &cl, &[1.; 3], &vl, &vu);
    assert_eq!(
        result,
        Err(DataError::IncompatibleDimension("constraint bounds"))
    );

    let result = Instance::new(Q, &c, A, &cl, &[1.; 2], &vl, &[INF; 5]);
    assert_eq!(
        result,
        Err(DataError::IncompatibleDimension("variable bounds"))
    );
}

#[test]
fn api_bound_value_checks() {
    let (Q, c, A, cl, cu, vl, _vu) = api_dim_check_data();

    // variable bound 2 is crossed, combined index m + 2
    let vu = [INF, INF, -1., INF];
    let vl2 = [0.; 4];
    let result = Instance::new(Q.clone(), &c, A.clone(), &cl, &cu, &vl2, &vu);
    assert_eq!(result, Err(DataError::CrossedBounds(4)));

    // huge values are infinities, on the wrong side here
    let result = Instance::new(Q.clone(), &c, A.clone(), &[1e30, -1.], &cu, &vl, &[INF; 4]);
    assert_eq!(
        result,
        Err(DataError::BadInfiniteBound {
            field: "constraint bounds",
            index: 0
        })
    );

    let result = Instance::new(Q, &c, A, &[f64::NAN, -1.], &cu, &vl, &[INF; 4]);
    assert_eq!(result, Err(DataError::NanBound("constraint bounds")));
}

#[test]
fn api_asymmetric_Q() {
    let Q = CscMatrix::from(&[[1., 1.], [0., 1.]]);
    let A = CscMatrix::<f64>::zeros((0, 2));
    let result = Instance::new(Q, &[0., 0.], A, &[], &[], &[-INF; 2], &[INF; 2]);
    assert_eq!(result, Err(DataError::AsymmetricQ));
}

#[test]
fn api_start_point_checks() {
    let (Q, c, A, cl, cu, vl, vu) = api_dim_check_data();
    let instance = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu).unwrap();
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap();
    let mut solver = QpSolver::new(instance, settings).unwrap();

    let start = StartPoint {
        primal: Some(vec![0.; 3]),
        ..StartPoint::default()
    };
    assert!(matches!(
        solver.solve_from(&start),
        Err(SolverError::Data(DataError::IncompatibleDimension(_)))
    ));

    let start = StartPoint {
        row_duals: Some(vec![0., f64::NAN]),
        ..StartPoint::default()
    };
    assert!(matches!(
        solver.solve_from(&start),
        Err(SolverError::Data(DataError::NonFinite(_)))
    ));

    let start = StartPoint {
        working_set: vec![(6, BasisStatus::AtLower)],
        ..StartPoint::default()
    };
    assert!(matches!(
        solver.solve_from(&start),
        Err(SolverError::Data(DataError::IncompatibleDimension(_)))
    ));

    // nothing was solved
    assert_eq!(solver.solution.status, SolverStatus::Unsolved);
}

#[test]
fn api_settings_checks() {
    let result = DefaultSettingsBuilder::<f64>::default()
        .feasibility_tol(-1.)
        .build();
    assert!(result.is_err());

    let result = DefaultSettingsBuilder::<f64>::default()
        .scale_min(10.)
        .scale_max(1.)
        .build();
    assert!(result.is_err());

    // settings built by hand are checked on solver construction
    let (Q, c, A, cl, cu, vl, vu) = api_dim_check_data();
    let instance = Instance::new(Q, &c, A, &cl, &cu, &vl, &vu).unwrap();
    let settings = DefaultSettings {
        pivot_tol: 0.,
        ..DefaultSettings::default()
    };
    assert!(matches!(
        QpSolver::new(instance, settings),
        Err(SolverError::Settings(SettingsError::NotPositive("pivot_tol")))
    ));
}
