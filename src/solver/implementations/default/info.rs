use super::*;
use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::core::{traits::BasisFactor, SolverStatus};
use crate::timers::*;

/// Progress and termination information for the QP solver.
///
/// Passed to a user termination callback once per iteration.

#[derive(Default, Debug)]
pub struct DefaultInfo<T> {
    pub iterations: u32,
    /// 1 during the feasibility phase, 2 in the main loop
    pub phase: u8,
    /// objective in unscaled units
    pub objective: T,
    pub primal_infeasibility: T,
    /// reduced gradient norm during the iteration, KKT residual at the end
    pub dual_infeasibility: T,
    pub nullspace_dim: usize,
    pub num_active: usize,
    pub step_length: T,
    /// number of recoveries from numerical trouble
    pub recoveries: u32,

    pub solve_time: f64,
    pub status: SolverStatus,

    pub statistics: Statistics<T>,

    // target stream for printing
    pub(crate) stream: PrintTarget,
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self, timers: &mut Timers) {
        self.status = SolverStatus::Unsolved;
        self.iterations = 0;
        self.phase = 2;
        self.recoveries = 0;
        self.step_length = T::zero();
        self.solve_time = 0f64;
        self.statistics.clear();

        timers.reset_timer("solve");
    }

    /// Summarize the current iterate of `runtime`
    pub(crate) fn update(&mut self, runtime: &Runtime<T>, rgnorm: T, timers: &Timers) {
        self.iterations = runtime.iteration;
        self.phase = runtime.phase;
        self.objective = runtime.reported_objective();
        self.primal_infeasibility = runtime.primal_infeasibility();
        self.dual_infeasibility = rgnorm;
        self.nullspace_dim = runtime.basis.nullspace_dim();
        self.num_active = runtime.working_set().len();
        self.solve_time = solve_seconds(timers);
    }

    /// Record a completed iteration with step length `α`
    pub(crate) fn save_iteration(&mut self, runtime: &Runtime<T>, α: T, rgnorm: T, timers: &Timers) {
        self.update(runtime, rgnorm, timers);
        self.step_length = α;

        // statistics is moved out so that it can read the other fields
        let mut statistics = std::mem::take(&mut self.statistics);
        statistics.record(self);
        self.statistics = statistics;
    }

    pub(crate) fn finalize(&mut self, status: SolverStatus, timers: &Timers) {
        self.status = status;
        self.solve_time = solve_seconds(timers);
    }
}

fn solve_seconds(timers: &Timers) -> f64 {
    timers.elapsed("solve").unwrap_or_default().as_secs_f64()
}
