#![allow(non_snake_case)]

#[cfg(feature = "serde")]
#[test]
fn test_json_io() {
    use quass::{algebra::*, solver::*};
    use std::io::{Seek, SeekFrom};

    // min x² + x,  x ≥ 2 via a row:  -x ≤ -2
    let Q = CscMatrix {
        m: 1,
        n: 1,
        colptr: vec![0, 1],
        rowval: vec![0],
        nzval: vec![2.0],
    };
    let c = [1.0];
    let A = CscMatrix {
        m: 1,
        n: 1,
        colptr: vec![0, 1],
        rowval: vec![0],
        nzval: vec![-1.0],
    };
    let instance = Instance::new(
        Q,
        &c,
        A,
        &[f64::NEG_INFINITY],
        &[-2.0],
        &[f64::NEG_INFINITY],
        &[f64::INFINITY],
    )
    .unwrap();

    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap();

    let mut solver = QpSolver::<f64>::new(instance, settings).unwrap();
    solver.solve();
    assert_eq!(solver.solution.status, SolverStatus::Optimal);
    assert!(f64::abs(solver.solution.x[0] - 2.0) <= 1e-9);

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    solver.save_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = QpSolver::<f64>::load_from_file(&mut file, None).unwrap();
    solver2.solve();
    assert_eq!(solver.solution.x, solver2.solution.x);
    assert_eq!(solver2.instance().var_lo, vec![f64::NEG_INFINITY]);

    // read the problem from the file with custom settings
    file.seek(SeekFrom::Start(0)).unwrap();
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .iteration_limit(0u32)
        .build()
        .unwrap();
    let mut solver3 = QpSolver::<f64>::load_from_file(&mut file, Some(settings)).unwrap();
    solver3.solve();
    assert_eq!(solver3.solution.status, SolverStatus::IterationLimit);
}
