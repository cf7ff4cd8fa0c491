use super::*;
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::solver::core::{
    callbacks::{Callback, CancelToken, SolverCallbacks},
    SolverError, SolverStatus,
};
use crate::timers::*;
use std::io::Write;

/// Optional warm start data for [`QpSolver::solve_from`]
#[derive(Debug, Clone)]
pub struct StartPoint<T> {
    /// initial primal point, projected onto the variable bounds.
    /// Defaults to the projection of zero.
    pub primal: Option<Vec<T>>,
    /// row dual estimate.  Rows tight at the start point are made
    /// active on the side indicated by the sign of their estimate.
    pub row_duals: Option<Vec<T>>,
    /// constraints to make active, in combined index space.  Entries
    /// that are not tight at the start point are ignored.
    pub working_set: Vec<(usize, BasisStatus)>,
}

impl<T> Default for StartPoint<T> {
    fn default() -> Self {
        Self {
            primal: None,
            row_duals: None,
            working_set: Vec::new(),
        }
    }
}

/// Primal active-set solver for convex quadratic programs.
///
/// The problem is scaled once on construction.  Each call to
/// [`solve`](QpSolver::solve) or [`solve_from`](QpSolver::solve_from)
/// starts from scratch on the scaled problem and leaves its result in
/// [`solution`](QpSolver::solution), in the units of the original problem.
///
/// ```
/// use quass::algebra::*;
/// use quass::solver::*;
///
/// // minimize ½(x² + y²) - x - 2y
/// let instance = Instance::new(
///     CscMatrix::<f64>::identity(2),
///     &[-1., -2.],
///     CscMatrix::<f64>::zeros((0, 2)),
///     &[],
///     &[],
///     &[f64::NEG_INFINITY; 2],
///     &[f64::INFINITY; 2],
/// )
/// .unwrap();
/// let settings = DefaultSettingsBuilder::<f64>::default().verbose(false).build().unwrap();
///
/// let mut solver = QpSolver::new(instance, settings).unwrap();
/// assert_eq!(solver.solve(), SolverStatus::Optimal);
/// assert!((solver.solution.x[1] - 2.).abs() < 1e-9);
/// ```
pub struct QpSolver<T: FloatT = f64> {
    // unscaled problem, as supplied
    pub(crate) original: Instance<T>,
    pub(crate) scaling: ScalingData<T>,
    pub(crate) runtime: Runtime<T>,

    pub info: DefaultInfo<T>,
    pub solution: DefaultSolution<T>,

    pub(crate) callbacks: SolverCallbacks<DefaultInfo<T>>,
    pub(crate) timers: Option<Timers>,
}

impl<T> QpSolver<T>
where
    T: FloatT,
{
    pub fn new(instance: Instance<T>, settings: DefaultSettings<T>) -> Result<Self, SolverError> {
        settings.validate()?;
        instance.validate()?;

        let mut timers = Timers::default();
        let output;

        timeit! {timers => "setup"; {

        let (n, m) = (instance.num_var, instance.num_con);

        // scaling happens once here, so that repeated
        // solves work on the same scaled problem
        let mut scaled = instance.clone();
        let scaling;
        timeit!{timers => "scaling"; {
            scaling = scale_instance(&mut scaled, &settings);
        }}

        let mut runtime = Runtime::new(scaled, settings);
        runtime.objective_scale = scaling.cost;

        output = Self {
            original: instance,
            scaling,
            runtime,
            info: DefaultInfo::new(),
            solution: DefaultSolution::new(n, m),
            callbacks: SolverCallbacks::default(),
            timers: None,
        };

        }} //end "setup" timer

        let mut output = output;
        output.timers.replace(timers);
        Ok(output)
    }

    pub fn settings(&self) -> &DefaultSettings<T> {
        &self.runtime.settings
    }

    /// The problem as supplied, before scaling
    pub fn instance(&self) -> &Instance<T> {
        &self.original
    }

    /// The scaling applied on construction
    pub fn scaling(&self) -> &ScalingData<T> {
        &self.scaling
    }

    /// Timers of the most recent setup and solve
    pub fn timers(&self) -> Option<&Timers> {
        self.timers.as_ref()
    }

    /// Solve from the projection of the origin onto the variable bounds
    pub fn solve(&mut self) -> SolverStatus {
        self.run_solve(&StartPoint::default())
    }

    /// Solve from the given start data.  Fails without solving if the
    /// start data has the wrong dimensions or non-finite entries.
    pub fn solve_from(&mut self, start: &StartPoint<T>) -> Result<SolverStatus, SolverError> {
        self.check_start(start)?;
        Ok(self.run_solve(start))
    }

    fn check_start(&self, start: &StartPoint<T>) -> Result<(), DataError> {
        let (n, m) = (self.original.num_var, self.original.num_con);
        if let Some(x) = &start.primal {
            if x.len() != n {
                return Err(DataError::IncompatibleDimension("start primal"));
            }
            if !x.is_finite() {
                return Err(DataError::NonFinite("start primal"));
            }
        }
        if let Some(y) = &start.row_duals {
            if y.len() != m {
                return Err(DataError::IncompatibleDimension("start row duals"));
            }
            if !y.is_finite() {
                return Err(DataError::NonFinite("start row duals"));
            }
        }
        if start.working_set.iter().any(|&(i, _)| i >= n + m) {
            return Err(DataError::IncompatibleDimension("start working set"));
        }
        Ok(())
    }

    fn run_solve(&mut self, start: &StartPoint<T>) -> SolverStatus {
        let mut timers = self.timers.take().unwrap_or_default();

        self.info.reset(&mut timers);
        let settings = &self.runtime.settings;
        let _ = self.info.print_banner(settings);
        let _ = self.info.print_configuration(settings, &self.original);

        let status;
        timeit! {timers => "solve"; {
            status = self.solve_scaled(start, &mut timers);
            self.runtime.termination = status;
        }}

        self.info.finalize(status, &timers);
        self.solution
            .post_process(&self.runtime, &self.scaling, &self.original, &self.info);
        // report the KKT residual of the returned point
        self.info.dual_infeasibility = self.solution.dual_infeasibility;
        self.info.primal_infeasibility = self.solution.primal_infeasibility;
        self.info.objective = self.solution.objective;

        let _ = self.info.print_footer(&self.runtime.settings, &timers);
        self.timers.replace(timers);
        status
    }

    // phase 1 if needed, then the main loop under bound perturbation
    fn solve_scaled(&mut self, start: &StartPoint<T>, timers: &mut Timers) -> SolverStatus {
        let n = self.runtime.num_var();
        self.runtime.reset();

        let mut x0 = start.primal.clone().unwrap_or_else(|| vec![T::zero(); n]);
        x0.project(&self.original.var_lo, &self.original.var_up);
        self.scaling.scale_primal(&mut x0);

        let mut row_duals = start.row_duals.clone().map(|mut y| {
            self.scaling.scale_row_duals(&mut y);
            y
        });
        let mut working_set = start.working_set.clone();

        self.runtime.set_primal(&x0);
        if self.runtime.settings.iteration_limit == 0 {
            return SolverStatus::IterationLimit;
        }

        let _ = self.info.print_status_header(&self.runtime.settings);

        let violation = self.runtime.primal_infeasibility();
        if violation > self.runtime.settings.feasibility_tol {
            let _ = self.info.print_phase_one(&self.runtime.settings, violation);
            let result;
            timeit! {timers => "phase 1"; {
                result = phase_one(
                    &mut self.runtime, &x0, &mut self.info, &mut self.callbacks, timers,
                );
            }}
            self.runtime.set_primal(&result.x);
            if result.status != SolverStatus::Optimal {
                return result.status;
            }
            x0 = result.x;
            working_set = result.working_set;
            row_duals = None;
        }
        self.runtime.phase = 2;

        let perturbation = if self.runtime.settings.perturb {
            let m = self.runtime.num_con();
            let mut keep: Vec<usize> = working_set.iter().map(|&(i, _)| i).collect();
            if let Some(y) = &row_duals {
                keep.extend((0..m).filter(|&i| y[i] != T::zero()));
            }
            Perturbation::apply(&mut self.runtime, &keep)
        } else {
            Perturbation::default()
        };

        let mut status = self.main_loop(&x0, row_duals.as_deref(), &working_set, timers);

        if !perturbation.is_empty() {
            perturbation.restore(&mut self.runtime);
            // polish on the true bounds from the final working set
            if status == SolverStatus::Optimal {
                let x = self.runtime.primal.clone();
                let ws: Vec<_> = self
                    .runtime
                    .working_set()
                    .iter()
                    .map(|&i| (i, self.runtime.status[i]))
                    .collect();
                status = self.main_loop(&x, None, &ws, timers);
            }
        }
        status
    }

    fn main_loop(
        &mut self,
        x0: &[T],
        row_duals: Option<&[T]>,
        working_set: &[(usize, BasisStatus)],
        timers: &mut Timers,
    ) -> SolverStatus {
        let status;
        timeit! {timers => "main loop"; {
            let mut quass = Quass::new(
                &mut self.runtime, &mut self.info, &mut self.callbacks, timers,
            );
            quass.initialize(x0, row_duals, working_set);
            status = quass.run();
        }}
        status
    }

    /// Install a callback polled once per iteration.  Returning `true`
    /// stops the solve with status `Interrupted`.
    pub fn set_termination_callback<F>(&mut self, f: F)
    where
        F: FnMut(&DefaultInfo<T>) -> bool + Send + 'static,
    {
        self.callbacks.termination_callback = Callback::Rust(Box::new(f));
    }

    pub fn unset_termination_callback(&mut self) {
        self.callbacks.termination_callback = Callback::None;
    }

    /// A handle that can interrupt a solve from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.callbacks.cancel.clone()
    }
}

impl<T> ConfigurablePrintTarget for QpSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.info.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}
