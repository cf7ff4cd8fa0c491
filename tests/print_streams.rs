#![allow(non_snake_case)]

use quass::{algebra::*, io::ConfigurablePrintTarget, solver::*};

fn test_print_solver() -> QpSolver<f64> {
    // min ½x² - x,  0 ≤ x ≤ 2
    let instance = Instance::new(
        CscMatrix::<f64>::identity(1),
        &[-1.],
        CscMatrix::<f64>::zeros((0, 1)),
        &[],
        &[],
        &[0.],
        &[2.],
    )
    .unwrap();
    let settings = DefaultSettings::default();
    QpSolver::new(instance, settings).unwrap()
}

#[test]
fn test_print_to_stdout() {
    let mut solver = test_print_solver();
    solver.print_to_stdout();
    solver.solve();
}

#[test]
fn test_print_to_buffer() {
    let mut solver = test_print_solver();
    solver.print_to_buffer();
    solver.solve();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("quass"));
    assert!(result.contains("Optimal"));
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.solve();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("quass"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    let stream = Box::new(file.into_file());

    solver.print_to_stream(stream);
    solver.solve();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("quass"));
}

#[test]
fn test_print_to_sink() {
    let mut solver = test_print_solver();
    solver.print_to_sink();
    solver.solve();
    // no output
    solver.print_to_buffer();
    assert!(solver.get_print_buffer().unwrap().is_empty());
}
