#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::solver::core::{callbacks::SolverCallbacks, SolverStatus};
use crate::solver::utils::PositionAll;
use crate::timers::*;

/// Outcome of the feasibility phase
#[derive(Debug, Clone)]
pub(crate) struct PhaseOne<T> {
    /// `Optimal` if a feasible point was found
    pub status: SolverStatus,
    /// last iterate, restricted to the original variables
    pub x: Vec<T>,
    /// working set at termination, in original constraint indices
    pub working_set: Vec<(usize, BasisStatus)>,
}

/// Elastic LP for an infeasible start point.
///
/// ```text
/// minimize    Σ s⁺ + Σ s⁻
/// subject to  con_lo ≤ A x + s⁺ - s⁻ ≤ con_up
///             var_lo ≤ x ≤ var_up,  s⁺, s⁻ ≥ 0
/// ```
///
/// Rows keep their indices, so index `m + j` is still the bound on
/// variable `j` for `j < n`.
fn elastic_instance<T: FloatT>(instance: &Instance<T>) -> Instance<T> {
    let (n, m) = (instance.num_var, instance.num_con);
    let ntot = n + 2 * m;

    let mut A = TripletMatrix::<T>::new(m, ntot, Vec::new(), Vec::new(), Vec::new());
    instance.A.for_each_entry(&mut |i, j, v| A.push(i, j, v));
    for i in 0..m {
        A.push(i, n + i, T::one());
        A.push(i, n + m + i, -T::one());
    }

    let mut c = vec![T::zero(); ntot];
    c[n..].set(T::one());

    let mut var_lo = vec![T::zero(); ntot];
    let mut var_up = vec![T::infinity(); ntot];
    var_lo[..n].copy_from(&instance.var_lo);
    var_up[..n].copy_from(&instance.var_up);

    Instance {
        num_var: ntot,
        num_con: m,
        Q: CscMatrix::<T>::zeros((ntot, ntot)).into(),
        c,
        offset: T::zero(),
        A: A.into(),
        var_lo,
        var_up,
        con_lo: instance.con_lo.clone(),
        con_up: instance.con_up.clone(),
    }
}

/// Find a point satisfying the bounds of `runtime.instance` to within
/// the feasibility tolerance, starting from `x0`.
///
/// Iterations are counted on `runtime` and share its limits.
pub(crate) fn phase_one<T: FloatT>(
    runtime: &mut Runtime<T>,
    x0: &[T],
    info: &mut DefaultInfo<T>,
    callbacks: &mut SolverCallbacks<DefaultInfo<T>>,
    timers: &mut Timers,
) -> PhaseOne<T> {
    let inst = &runtime.instance;
    let (n, m) = (inst.num_var, inst.num_con);

    let mut x = x0.to_vec();
    x.project(&inst.var_lo, &inst.var_up);
    let mut ra = vec![T::zero(); m];
    inst.row_activity(&x, &mut ra);

    // elastics take up the row violations
    let mut start = vec![T::zero(); n + 2 * m];
    start[..n].copy_from(&x);
    for i in 0..m {
        start[n + i] = T::max(T::zero(), inst.con_lo[i] - ra[i]);
        start[n + m + i] = T::max(T::zero(), ra[i] - inst.con_up[i]);
    }

    let mut aux = Runtime::new(elastic_instance(inst), runtime.settings.clone());
    aux.iteration = runtime.iteration;
    aux.phase = 1;

    // zero elastics and tight variable bounds
    let mut b0 = Vec::with_capacity(2 * (n + m));
    for j in 0..n {
        b0.push((m + j, BasisStatus::AtLower));
        b0.push((m + j, BasisStatus::AtUpper));
    }
    for k in start[n..].iter().position_all(|&s| *s == T::zero()) {
        b0.push((m + n + k, BasisStatus::AtLower));
    }

    let mut status = {
        let mut quass = Quass::new(&mut aux, info, callbacks, timers);
        quass.initialize(&start, None, &b0);
        quass.run()
    };
    runtime.iteration = aux.iteration;

    let elastic = aux.primal[n..].norm_inf();
    match status {
        SolverStatus::Optimal if elastic > runtime.settings.feasibility_tol => {
            status = SolverStatus::Infeasible;
        }
        SolverStatus::Unbounded => {
            // the elastic objective is bounded below by zero
            status = SolverStatus::NumericalError;
        }
        _ => {}
    }

    let working_set = aux
        .working_set()
        .iter()
        .filter(|&&i| i < m + n)
        .map(|&i| (i, aux.status[i]))
        .collect();

    let mut x = aux.primal[..n].to_vec();
    x.project(&runtime.instance.var_lo, &runtime.instance.var_up);

    PhaseOne {
        status,
        x,
        working_set,
    }
}

#[cfg(test)]
fn run_phase_one(instance: Instance<f64>, x0: &[f64]) -> (PhaseOne<f64>, Runtime<f64>) {
    let mut rt = Runtime::new(instance, DefaultSettings::default());
    let mut info = DefaultInfo::new();
    info.stream = crate::io::PrintTarget::Sink;
    let mut callbacks = SolverCallbacks::default();
    let mut timers = Timers::default();
    timers.start_as_current("solve");
    let result = phase_one(&mut rt, x0, &mut info, &mut callbacks, &mut timers);
    timers.stop_current();
    (result, rt)
}

#[test]
fn test_elastic_instance() {
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[1., 1.],
        CscMatrix::<f64>::from(&[[1., 1.]]),
        &[1.],
        &[2.],
        &[0., 0.],
        &[5., 5.],
    )
    .unwrap();
    let aux = elastic_instance(&inst);

    assert_eq!(aux.num_var, 4);
    assert_eq!(aux.num_con, 1);
    assert_eq!(aux.c, vec![0., 0., 1., 1.]);
    assert_eq!(aux.Q.nnz(), 0);

    let mut row = [0.; 4];
    aux.constraint_normal(0, &mut row);
    assert_eq!(row, [1., 1., 1., -1.]);
    assert_eq!(aux.var_lo, vec![0.; 4]);
    assert_eq!(aux.var_up[2], f64::INFINITY);
}

#[test]
fn test_phase_one_feasible() {
    // x1 + x2 ≥ 1 from the origin
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[0., 0.],
        CscMatrix::<f64>::from(&[[1., 1.]]),
        &[1.],
        &[f64::INFINITY],
        &[0., 0.],
        &[1., 1.],
    )
    .unwrap();
    let (result, rt) = run_phase_one(inst.clone(), &[0., 0.]);

    assert_eq!(result.status, SolverStatus::Optimal);
    let mut ra = [0.];
    inst.row_activity(&result.x, &mut ra);
    assert!(inst.max_violation(&result.x, &ra) <= 1e-7);
    assert!(rt.iteration > 0);
}

#[test]
fn test_phase_one_infeasible() {
    // x1 + x2 ≥ 3 with x in [0,1]²
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[0., 0.],
        CscMatrix::<f64>::from(&[[1., 1.]]),
        &[3.],
        &[f64::INFINITY],
        &[0., 0.],
        &[1., 1.],
    )
    .unwrap();
    let (result, _) = run_phase_one(inst, &[0., 0.]);
    assert_eq!(result.status, SolverStatus::Infeasible);
}
