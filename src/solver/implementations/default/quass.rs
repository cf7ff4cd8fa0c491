use super::*;
use crate::algebra::*;
use crate::solver::core::{
    callbacks::SolverCallbacks,
    traits::{BasisFactor, Pricing},
    SolverStatus,
};
use crate::timers::*;

// outcome of a single iteration
enum Step {
    Continue,
    Done(SolverStatus),
    Trouble(&'static str),
}

// buffers reused across iterations
struct Workspace<T> {
    g: Vec<T>,
    p: Vec<T>,
    qp: Vec<T>,
    ap: Vec<T>,
    rg: Vec<T>,
    normal: Vec<T>,
    lambda: Vec<T>,
    violations: Vec<T>,
    reduced: ReducedHessian<T>,
}

impl<T> Workspace<T>
where
    T: FloatT,
{
    fn new(n: usize, m: usize) -> Self {
        Self {
            g: vec![T::zero(); n],
            p: vec![T::zero(); n],
            qp: vec![T::zero(); n],
            ap: vec![T::zero(); m],
            rg: Vec::with_capacity(n),
            normal: vec![T::zero(); n],
            lambda: Vec::with_capacity(n),
            violations: Vec::with_capacity(n),
            reduced: ReducedHessian::default(),
        }
    }
}

/// Primal active-set iteration on a [`Runtime`].
///
/// Each iteration either releases one constraint from the working set
/// or takes a step along a null space direction, possibly adding the
/// constraint that blocks it.  The driver borrows all state for the
/// duration of a run.
pub(crate) struct Quass<'a, T: FloatT> {
    runtime: &'a mut Runtime<T>,
    info: &'a mut DefaultInfo<T>,
    callbacks: &'a mut SolverCallbacks<DefaultInfo<T>>,
    timers: &'a mut Timers,
    recoveries: u32,
    rgnorm: T,
}

impl<'a, T> Quass<'a, T>
where
    T: FloatT,
{
    pub fn new(
        runtime: &'a mut Runtime<T>,
        info: &'a mut DefaultInfo<T>,
        callbacks: &'a mut SolverCallbacks<DefaultInfo<T>>,
        timers: &'a mut Timers,
    ) -> Self {
        Self {
            runtime,
            info,
            callbacks,
            timers,
            recoveries: 0,
            rgnorm: T::zero(),
        }
    }

    /// Set the iterate to `x0` and build the initial working set.
    ///
    /// Equality rows and fixed variables come first, then the entries of
    /// `working_set` that are tight at `x0` on the stated side, then rows
    /// tight at the side indicated by the sign of `row_duals`.  Normals
    /// dependent on the constraints already added are skipped.
    pub fn initialize(
        &mut self,
        x0: &[T],
        row_duals: Option<&[T]>,
        working_set: &[(usize, BasisStatus)],
    ) {
        let rt = &mut *self.runtime;
        let (n, m) = (rt.num_var(), rt.num_con());
        let total = rt.instance.num_total();

        rt.set_primal(x0);
        rt.basis.clear();
        rt.reset_status();
        rt.dualcon.set(T::zero());
        rt.dualvar.set(T::zero());

        let mut a = vec![T::zero(); n];
        for i in 0..total {
            if rt.instance.is_equality(i) {
                activate(rt, i, BasisStatus::AtLower, &mut a);
            }
        }

        for &(i, status) in working_set {
            if i < total
                && status.is_active()
                && rt.status[i] == BasisStatus::Basic
                && is_tight(rt, i, status)
            {
                activate(rt, i, status, &mut a);
            }
        }

        if let Some(y) = row_duals {
            for (i, &yi) in y.iter().enumerate().take(m) {
                let status = if yi > T::zero() {
                    BasisStatus::AtLower
                } else if yi < T::zero() {
                    BasisStatus::AtUpper
                } else {
                    continue;
                };
                if rt.status[i] == BasisStatus::Basic && is_tight(rt, i, status) {
                    activate(rt, i, status, &mut a);
                }
            }
        }

        self.recoveries = 0;
        self.rgnorm = T::zero();
    }

    /// Iterate until a termination condition holds
    pub fn run(&mut self) -> SolverStatus {
        let (n, m) = (self.runtime.num_var(), self.runtime.num_con());
        let mut work = Workspace::new(n, m);
        let pricing: PricingRule = self.runtime.settings.pricing.into();

        self.info.update(&*self.runtime, self.rgnorm, &*self.timers);

        loop {
            if let Some(status) = self.check_termination() {
                return self.finish(status);
            }

            match self.iterate(&mut work, &pricing) {
                Step::Continue => {
                    self.recoveries = 0;
                }
                Step::Done(status) => {
                    return self.finish(status);
                }
                Step::Trouble(reason) => {
                    if let Some(status) = self.recover(reason) {
                        return self.finish(status);
                    }
                }
            }
        }
    }

    fn iterate(&mut self, w: &mut Workspace<T>, pricing: &PricingRule) -> Step {
        let rt = &mut *self.runtime;
        let timers = &mut *self.timers;
        let m = rt.num_con();
        let opt_tol = rt.settings.optimality_tol;
        let curvature_tol = rt.settings.curvature_tol;

        w.g.copy_from(rt.gradient.get(&rt.instance, &rt.primal));
        if !w.g.is_finite() {
            return Step::Trouble("non-finite gradient");
        }

        w.rg.resize(rt.basis.nullspace_dim(), T::zero());
        rt.basis.ztprod(&w.g, &mut w.rg);
        let rgnorm = w.rg.norm_inf();
        self.rgnorm = rgnorm;

        // stationary on the working set: optimal, or release a constraint
        if rgnorm <= opt_tol {
            w.lambda.resize(rt.working_set().len(), T::zero());
            if rt.basis.multipliers(&w.g, &mut w.lambda).is_err() {
                return Step::Trouble("singular working set factor");
            }

            w.violations.clear();
            for (&i, &l) in rt.working_set().iter().zip(w.lambda.iter()) {
                let v = if rt.instance.is_equality(i) {
                    T::zero()
                } else {
                    match rt.status[i] {
                        BasisStatus::AtLower => T::max(T::zero(), -l),
                        BasisStatus::AtUpper => T::max(T::zero(), l),
                        _ => T::zero(),
                    }
                };
                w.violations.push(v);
            }

            let choice = pricing.price(&w.violations, &rt.basis, opt_tol);
            let Some(pos) = choice else {
                rt.set_duals(&w.lambda);
                return Step::Done(SolverStatus::Optimal);
            };

            let i = rt.working_set()[pos];
            if rt.basis.remove(i).is_err() {
                return Step::Trouble("working set downdate failed");
            }
            rt.status[i] = BasisStatus::Basic;
            rt.iteration += 1;

            self.info.save_iteration(rt, T::zero(), rgnorm, timers);
            notimeit! {timers; {
                let _ = self.info.print_status(&rt.settings);
            }}
            return Step::Continue;
        }

        // search direction in the null space of the working set
        let direction;
        timeit! {timers => "reduced hessian"; {
            direction = w.reduced.direction(
                &rt.instance, &rt.basis, &w.rg, &mut w.p, curvature_tol, opt_tol,
            );
        }}
        let Ok(kind) = direction else {
            return Step::Trouble("reduced Hessian factorization failed");
        };

        rt.instance.q_vec_mat(&w.p, &mut w.qp);
        rt.instance.row_activity(&w.p, &mut w.ap);
        let gp = w.g.dot(&w.p);
        let pqp = w.p.dot(&w.qp);

        // negated so that NaN is caught too
        if !(gp < T::zero()) {
            return Step::Trouble("search direction is not a descent direction");
        }
        if pqp < -curvature_tol * T::max(T::one(), w.p.sumsq()) {
            return Step::Trouble("negative curvature");
        }
        // a Newton step has unit length up to rounding, however small p is
        let alphastart = match kind {
            SearchDirection::Ray => T::infinity(),
            SearchDirection::Newton if pqp > T::zero() => -gp / pqp,
            SearchDirection::Newton => T::one(),
        };

        let result;
        timeit! {timers => "ratio test"; {
            result = ratiotest(rt, &w.p, &w.ap, alphastart);
        }}
        let α = result.alpha;
        if !α.is_finite() {
            return Step::Done(SolverStatus::Unbounded);
        }

        rt.primal.axpby(α, &w.p, T::one());
        rt.rowactivity.axpby(α, &w.ap, T::one());
        rt.gradient.update(&w.qp, α);

        let mut step = Step::Continue;
        if let Some(i) = result.limiting {
            let status = if result.nowactiveatlower {
                BasisStatus::AtLower
            } else {
                BasisStatus::AtUpper
            };
            if i >= m {
                // land exactly on a variable bound, moving the row
                // activities by the same amount
                let j = i - m;
                let bound = match status {
                    BasisStatus::AtLower => rt.instance.lower(i),
                    _ => rt.instance.upper(i),
                };
                let delta = bound - rt.primal[j];
                if delta != T::zero() {
                    rt.primal[j] = bound;
                    rt.instance.A.col_to_dense(j, &mut w.ap);
                    rt.rowactivity.axpby(delta, &w.ap, T::one());
                    rt.gradient.invalidate();
                }
            }
            rt.instance.constraint_normal(i, &mut w.normal);
            match rt.basis.add(i, &w.normal) {
                Ok(()) => rt.status[i] = status,
                Err(_) => step = Step::Trouble("blocking constraint is dependent"),
            }
        }
        rt.objective = rt.instance.objective(&rt.primal);

        if let Step::Continue = step {
            rt.iteration += 1;
            self.info.save_iteration(rt, α, rgnorm, timers);
            notimeit! {timers; {
                let _ = self.info.print_status(&rt.settings);
            }}
        }
        step
    }

    // time, cancellation and iteration limits, in that order
    fn check_termination(&mut self) -> Option<SolverStatus> {
        let rt = &*self.runtime;
        let elapsed = self.timers.elapsed("solve").unwrap_or_default();
        if elapsed.as_secs_f64() > rt.settings.time_limit {
            return Some(SolverStatus::TimeLimit);
        }
        if self.callbacks.check_termination(&*self.info) {
            return Some(SolverStatus::Interrupted);
        }
        if rt.iteration >= rt.settings.iteration_limit {
            return Some(SolverStatus::IterationLimit);
        }
        None
    }

    // recompute the gradient and refactor the working set.  Returns a
    // status once the recovery budget is exhausted
    fn recover(&mut self, reason: &'static str) -> Option<SolverStatus> {
        let rt = &mut *self.runtime;
        self.recoveries += 1;
        self.info.recoveries += 1;
        if self.recoveries > rt.settings.max_recovery_attempts {
            return Some(SolverStatus::NumericalError);
        }

        rt.refresh();
        let instance = &rt.instance;
        let dropped = rt
            .basis
            .refactor(&mut |i, out| instance.constraint_normal(i, out));
        for &i in dropped.iter() {
            rt.status[i] = BasisStatus::Basic;
        }

        let _ = self.info.print_recovery(&rt.settings, reason, dropped.len());
        None
    }

    fn finish(&mut self, status: SolverStatus) -> SolverStatus {
        self.runtime.termination = status;
        self.info.update(&*self.runtime, self.rgnorm, &*self.timers);
        self.info.status = status;
        status
    }
}

// add constraint i to the working set if its normal is independent
fn activate<T: FloatT>(rt: &mut Runtime<T>, i: usize, status: BasisStatus, a: &mut [T]) -> bool {
    if rt.basis.nullspace_dim() == 0 || rt.basis.contains(i) {
        return false;
    }
    rt.instance.constraint_normal(i, a);
    if rt.basis.add(i, a).is_ok() {
        rt.status[i] = status;
        true
    } else {
        false
    }
}

fn is_tight<T: FloatT>(rt: &Runtime<T>, i: usize, status: BasisStatus) -> bool {
    let bound = match status {
        BasisStatus::AtUpper => rt.instance.upper(i),
        _ => rt.instance.lower(i),
    };
    bound.is_finite() && T::abs(rt.activity(i) - bound) <= rt.settings.feasibility_tol
}

#[cfg(test)]
fn run_quass(
    rt: &mut Runtime<f64>,
    x0: &[f64],
    working_set: &[(usize, BasisStatus)],
) -> SolverStatus {
    let mut info = DefaultInfo::new();
    info.stream = crate::io::PrintTarget::Sink;
    let mut callbacks = SolverCallbacks::default();
    let mut timers = Timers::default();
    timers.start_as_current("solve");
    let mut quass = Quass::new(rt, &mut info, &mut callbacks, &mut timers);
    quass.initialize(x0, None, working_set);
    let status = quass.run();
    timers.stop_current();
    status
}

#[test]
fn test_quass_box_qp() {
    // min (x1-2)² + (x2+1)²  on the box [0,1]²: x = (1, 0)
    let inst = Instance::new(
        CscMatrix::<f64>::diagonal(&[2., 2.]),
        &[-4., 2.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[0., 0.],
        &[1., 1.],
    )
    .unwrap();
    let mut rt = Runtime::new(inst, DefaultSettings::default());
    let status = run_quass(&mut rt, &[0.5, 0.5], &[]);

    assert_eq!(status, SolverStatus::Optimal);
    assert_eq!(rt.primal, vec![1., 0.]);
    assert_eq!(rt.status, vec![BasisStatus::AtUpper, BasisStatus::AtLower]);

    // Qx + c = z
    assert!((rt.dualvar[0] - -2.).abs() < 1e-12);
    assert!((rt.dualvar[1] - 2.).abs() < 1e-12);
}

#[test]
fn test_quass_releases_constraint() {
    // min ½|x|² - x1 - x2, x2 ≥ 0.  Start with x2 active at x = (0, 0)
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -1.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[f64::NEG_INFINITY, 0.],
        &[f64::INFINITY, f64::INFINITY],
    )
    .unwrap();
    let mut rt = Runtime::new(inst, DefaultSettings::default());
    let status = run_quass(&mut rt, &[0., 0.], &[(1, BasisStatus::AtLower)]);

    assert_eq!(status, SolverStatus::Optimal);
    assert!(rt.primal.norm_inf_diff(&[1., 1.]) < 1e-12);
    assert_eq!(rt.status[1], BasisStatus::Basic);
    assert!(rt.working_set().is_empty());
    // step, release, step
    assert_eq!(rt.iteration, 3);
    assert!(rt.dualvar.norm_inf() < 1e-12);
}

#[test]
fn test_quass_unbounded_ray() {
    // min -x1 + x2²,  x2 ≥ -1, x1 free
    let inst = Instance::new(
        CscMatrix::<f64>::diagonal(&[0., 2.]),
        &[-1., 0.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[f64::NEG_INFINITY, -1.],
        &[f64::INFINITY, f64::INFINITY],
    )
    .unwrap();
    let mut rt = Runtime::new(inst, DefaultSettings::default());
    let status = run_quass(&mut rt, &[0., 0.], &[]);
    assert_eq!(status, SolverStatus::Unbounded);
}

#[test]
fn test_quass_iteration_limit() {
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -1.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[f64::NEG_INFINITY; 2],
        &[f64::INFINITY; 2],
    )
    .unwrap();
    let settings = DefaultSettings {
        iteration_limit: 0,
        ..DefaultSettings::default()
    };
    let mut rt = Runtime::new(inst, settings);
    let status = run_quass(&mut rt, &[3., 4.], &[]);
    assert_eq!(status, SolverStatus::IterationLimit);
    assert_eq!(rt.primal, vec![3., 4.]);
    assert_eq!(rt.iteration, 0);
}

#[test]
fn test_quass_short_newton_step() {
    // min ½x², -1 ≤ x ≤ 1 from just off the minimizer.  The Newton step
    // has curvature p'Qp below curvature_tol but must still have unit
    // length rather than run to the far bound
    let inst = Instance::new(
        CscMatrix::<f64>::identity(1),
        &[0.],
        CscMatrix::<f64>::zeros((0, 1)),
        &[],
        &[],
        &[-1.],
        &[1.],
    )
    .unwrap();
    let settings = DefaultSettings::default();
    assert!(5e-6 > settings.optimality_tol && 2.5e-11 < settings.curvature_tol);

    let mut rt = Runtime::new(inst, settings);
    let status = run_quass(&mut rt, &[5e-6], &[]);

    assert_eq!(status, SolverStatus::Optimal);
    assert!(rt.primal[0].abs() < 1e-15);
    assert!(rt.objective <= 0.5 * 5e-6 * 5e-6);
    assert_eq!(rt.iteration, 1);
    assert!(rt.working_set().is_empty());
}

#[test]
fn test_quass_rowactivity_tracks_bound_snap() {
    // min ½|x - 1|²,  x1 + x2 ≤ 10,  0 ≤ x ≤ 0.3
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -1.],
        CscMatrix::from(&[[1., 1.]]),
        &[f64::NEG_INFINITY],
        &[10.],
        &[0., 0.],
        &[0.3, 0.3],
    )
    .unwrap();
    let mut rt = Runtime::new(inst, DefaultSettings::default());
    let status = run_quass(&mut rt, &[0.1, 0.2], &[]);

    assert_eq!(status, SolverStatus::Optimal);
    assert_eq!(rt.primal, vec![0.3, 0.3]);
    assert_eq!(rt.status[1..], [BasisStatus::AtUpper, BasisStatus::AtUpper]);

    let mut ax = vec![0.];
    rt.instance.row_activity(&rt.primal, &mut ax);
    assert!((rt.rowactivity[0] - ax[0]).abs() < 1e-15);
}

#[test]
fn test_quass_time_limit() {
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -1.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[f64::NEG_INFINITY; 2],
        &[f64::INFINITY; 2],
    )
    .unwrap();
    let settings = DefaultSettings {
        time_limit: 0.0,
        ..DefaultSettings::default()
    };
    let mut rt = Runtime::new(inst, settings);
    let status = run_quass(&mut rt, &[3., 4.], &[]);
    assert_eq!(status, SolverStatus::TimeLimit);
    assert_eq!(rt.primal, vec![3., 4.]);
    assert_eq!(rt.iteration, 0);
}

#[test]
fn test_quass_recovery_exhausted() {
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[-1., -1.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[0., 0.],
        &[5., 5.],
    )
    .unwrap();
    let settings = DefaultSettings {
        max_recovery_attempts: 2,
        ..DefaultSettings::default()
    };
    let mut rt = Runtime::new(inst, settings);
    // every recomputed gradient is NaN, so no recovery can succeed
    rt.instance.c[0] = f64::NAN;

    let mut info = DefaultInfo::new();
    info.stream = crate::io::PrintTarget::Sink;
    let mut callbacks = SolverCallbacks::default();
    let mut timers = Timers::default();
    timers.start_as_current("solve");
    let status = {
        let mut quass = Quass::new(&mut rt, &mut info, &mut callbacks, &mut timers);
        quass.initialize(&[1., 2.], None, &[]);
        quass.run()
    };
    timers.stop_current();

    assert_eq!(status, SolverStatus::NumericalError);
    assert_eq!(info.recoveries, 3);
    assert_eq!(info.status, SolverStatus::NumericalError);
    // the iterate is left where the trouble started
    assert_eq!(rt.primal, vec![1., 2.]);
    assert_eq!(rt.iteration, 0);
}
