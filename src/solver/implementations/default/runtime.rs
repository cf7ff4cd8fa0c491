use super::*;
use crate::algebra::*;
use crate::solver::core::traits::BasisFactor;
use crate::solver::core::SolverStatus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of a row or variable bound relative to the working set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BasisStatus {
    /// Active at its lower bound.  Equality rows and fixed
    /// variables in the working set also carry this status.
    AtLower,
    /// Active at its upper bound
    AtUpper,
    /// Inactive, with at least one finite bound
    Basic,
    /// Inactive, with both bounds infinite
    Free,
}

impl BasisStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, BasisStatus::AtLower | BasisStatus::AtUpper)
    }
}

/// Mutable state of one run of the active-set iteration.
///
/// Holds the working copy of the problem (scaled and possibly
/// perturbed), the iterate and its bookkeeping.  All mutation is
/// performed by the [`Quass`] driver and the pre- and post-passes.
#[derive(Debug)]
pub struct Runtime<T: FloatT> {
    pub instance: Instance<T>,
    /// `instance` with bounds relaxed by the feasibility tolerance,
    /// built on demand for the two pass ratio test
    pub relaxed: Option<Instance<T>>,
    pub settings: DefaultSettings<T>,

    pub primal: Vec<T>,
    /// `A * primal`, maintained incrementally
    pub rowactivity: Vec<T>,
    /// one entry per constraint index, rows first
    pub status: Vec<BasisStatus>,
    /// row multipliers `y`
    pub dualcon: Vec<T>,
    /// variable bound multipliers `z`
    pub dualvar: Vec<T>,
    pub objective: T,
    /// cost scaling of `instance`, for reporting unscaled objectives
    pub objective_scale: T,

    pub gradient: Gradient<T>,
    pub basis: DenseQrBasis<T>,

    /// iterations over all phases
    pub iteration: u32,
    /// 1 for the feasibility phase, 2 for the main loop
    pub phase: u8,
    pub termination: SolverStatus,
}

impl<T> Runtime<T>
where
    T: FloatT,
{
    pub fn new(instance: Instance<T>, settings: DefaultSettings<T>) -> Self {
        let (n, m) = (instance.num_var, instance.num_con);
        let status = vec![BasisStatus::Basic; instance.num_total()];
        let gradient = Gradient::new(n, settings.gradient_recompute_frequency);
        let basis = DenseQrBasis::new(n, settings.pivot_tol);

        let mut runtime = Self {
            instance,
            relaxed: None,
            settings,
            primal: vec![T::zero(); n],
            rowactivity: vec![T::zero(); m],
            status,
            dualcon: vec![T::zero(); m],
            dualvar: vec![T::zero(); n],
            objective: T::zero(),
            objective_scale: T::one(),
            gradient,
            basis,
            iteration: 0,
            phase: 2,
            termination: SolverStatus::Unsolved,
        };
        runtime.reset_status();
        runtime
    }

    /// Clear counters, duals and cached data ahead of a new solve
    pub fn reset(&mut self) {
        self.basis.clear();
        self.reset_status();
        self.dualcon.set(T::zero());
        self.dualvar.set(T::zero());
        self.gradient.invalidate();
        self.relaxed = None;
        self.iteration = 0;
        self.phase = 2;
        self.termination = SolverStatus::Unsolved;
    }

    /// Mark every constraint inactive
    pub fn reset_status(&mut self) {
        for (i, status) in self.status.iter_mut().enumerate() {
            *status = if self.instance.is_free(i) {
                BasisStatus::Free
            } else {
                BasisStatus::Basic
            };
        }
    }

    pub fn num_var(&self) -> usize {
        self.instance.num_var
    }

    pub fn num_con(&self) -> usize {
        self.instance.num_con
    }

    /// Set the iterate and recompute everything derived from it
    pub fn set_primal(&mut self, x: &[T]) {
        self.primal.copy_from(x);
        self.refresh();
    }

    /// Recompute row activities, gradient and objective from `primal`
    pub fn refresh(&mut self) {
        self.instance.row_activity(&self.primal, &mut self.rowactivity);
        self.gradient.recompute(&self.instance, &self.primal);
        self.objective = self.instance.objective(&self.primal);
    }

    /// Objective value in unscaled units
    pub fn reported_objective(&self) -> T {
        self.objective / self.objective_scale
    }

    pub fn activity(&self, i: usize) -> T {
        self.instance.activity(i, &self.primal, &self.rowactivity)
    }

    /// Largest bound violation of the current iterate
    pub fn primal_infeasibility(&self) -> T {
        self.instance.max_violation(&self.primal, &self.rowactivity)
    }

    /// Active constraint indices, in factorization order
    pub fn working_set(&self) -> &[usize] {
        self.basis.working_set()
    }

    /// Build (once) the relaxed bounds used by the two pass ratio test
    pub fn ratiotest_relax_instance(&mut self) {
        if self.relaxed.is_none() {
            let tol = self.settings.feasibility_tol;
            self.relaxed = Some(self.instance.with_relaxed_bounds(tol));
        }
    }

    /// Drop cached data derived from the bounds of `instance`
    pub fn invalidate_relaxed(&mut self) {
        self.relaxed = None;
    }

    /// Store multipliers for the working set into the dual vectors.
    /// Entries off the working set are zero.
    pub fn set_duals(&mut self, lambda: &[T]) {
        let m = self.num_con();
        self.dualcon.set(T::zero());
        self.dualvar.set(T::zero());
        for (&i, &l) in self.basis.working_set().iter().zip(lambda) {
            if i < m {
                self.dualcon[i] = l;
            } else {
                self.dualvar[i - m] = l;
            }
        }
    }
}
