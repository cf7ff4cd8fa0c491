#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::utils::infbounds::normalize_infinite_bounds;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// The problem as supplied by the user together with the settings.
// JSON has no infinities, so infinite values are written as the
// largest finite value and mapped back on reading.

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub instance: Instance<T>,
    pub settings: DefaultSettings<T>,
}

impl<T> QpSolver<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    /// Write the unscaled problem and the settings to `file` as JSON
    pub fn save_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut json_data = JsonProblemData {
            instance: self.original.clone(),
            settings: self.runtime.settings.clone(),
        };

        sanitize_instance(&mut json_data.instance);
        sanitize_settings(&mut json_data.settings);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    /// Read a problem written by [`save_to_file`](QpSolver::save_to_file)
    /// and build a solver for it.  `settings`, if given, replace the
    /// settings stored in the file.
    pub fn load_from_file(
        file: &mut File,
        settings: Option<DefaultSettings<T>>,
    ) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        desanitize_instance(&mut json_data.instance);
        desanitize_settings(&mut json_data.settings);

        let settings = settings.unwrap_or(json_data.settings);
        Self::new(json_data.instance, settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

fn sanitize_instance<T: FloatT>(instance: &mut Instance<T>) {
    let bounds = [
        &mut instance.var_lo,
        &mut instance.var_up,
        &mut instance.con_lo,
        &mut instance.con_up,
    ];
    for bound in bounds {
        for v in bound.iter_mut().filter(|v| v.is_infinite()) {
            *v = v.signum() * T::max_value();
        }
    }
}

fn desanitize_instance<T: FloatT>(instance: &mut Instance<T>) {
    normalize_infinite_bounds(&mut instance.var_lo);
    normalize_infinite_bounds(&mut instance.var_up);
    normalize_infinite_bounds(&mut instance.con_lo);
    normalize_infinite_bounds(&mut instance.con_up);
}

fn sanitize_settings<T: FloatT>(settings: &mut DefaultSettings<T>) {
    if settings.time_limit == f64::INFINITY {
        settings.time_limit = f64::MAX;
    }
}

fn desanitize_settings<T: FloatT>(settings: &mut DefaultSettings<T>) {
    if settings.time_limit == f64::MAX {
        settings.time_limit = f64::INFINITY;
    }
}

#[test]
fn test_json_io() {
    use crate::solver::core::SolverStatus;
    use std::io::{Seek, SeekFrom};

    // min ½x'Qx + c'x  s.t.  x1 + x2 ≥ 1,  x ≥ 0
    let instance = Instance::new(
        CscMatrix::<f64>::from(&[[2., 0.], [0., 4.]]),
        &[1., -1.],
        CscMatrix::<f64>::from(&[[1., 1.]]),
        &[1.],
        &[f64::INFINITY],
        &[0., 0.],
        &[f64::INFINITY, f64::INFINITY],
    )
    .unwrap()
    .with_offset(3.)
    .unwrap();

    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap();

    let mut solver = QpSolver::<f64>::new(instance, settings).unwrap();
    assert_eq!(solver.solve(), SolverStatus::Optimal);

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    solver.save_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = QpSolver::<f64>::load_from_file(&mut file, None).unwrap();
    assert_eq!(solver2.instance(), solver.instance());
    assert_eq!(solver2.settings().time_limit, f64::INFINITY);

    assert_eq!(solver2.solve(), SolverStatus::Optimal);
    assert_eq!(solver.solution.x, solver2.solution.x);
}
