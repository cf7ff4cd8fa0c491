use super::*;
use crate::{algebra::*, solver::core::SolverStatus};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Solution returned by [`QpSolver`], in the units of the original problem.
///
/// Duals follow the convention `Qx + c = A'y + z`: a multiplier is
/// nonnegative at a lower bound, nonpositive at an upper bound and zero
/// for an inactive constraint.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct DefaultSolution<T> {
    /// final solver status
    pub status: SolverStatus,
    /// primal solution
    pub x: Vec<T>,
    /// row activities `Ax`
    pub rowactivity: Vec<T>,
    /// row multipliers `y`
    pub row_duals: Vec<T>,
    /// variable bound multipliers `z`
    pub var_duals: Vec<T>,
    pub row_status: Vec<BasisStatus>,
    pub var_status: Vec<BasisStatus>,
    /// objective value including the constant offset
    pub objective: T,
    /// number of iterations over both phases
    pub iterations: u32,
    /// solve time in seconds
    pub solve_time: f64,
    /// largest bound violation
    pub primal_infeasibility: T,
    /// largest stationarity residual or dual sign violation
    pub dual_infeasibility: T,
}

impl<T> DefaultSolution<T>
where
    T: FloatT,
{
    /// Create a new `DefaultSolution` object
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            status: SolverStatus::Unsolved,
            x: vec![T::zero(); n],
            rowactivity: vec![T::zero(); m],
            row_duals: vec![T::zero(); m],
            var_duals: vec![T::zero(); n],
            row_status: vec![BasisStatus::Basic; m],
            var_status: vec![BasisStatus::Basic; n],
            objective: T::nan(),
            iterations: 0,
            solve_time: 0f64,
            primal_infeasibility: T::nan(),
            dual_infeasibility: T::nan(),
        }
    }

    /// Fill in from the final runtime state, undoing the scaling.
    /// Residuals are computed against the unscaled `original` problem.
    pub(crate) fn post_process(
        &mut self,
        runtime: &Runtime<T>,
        scaling: &ScalingData<T>,
        original: &Instance<T>,
        info: &DefaultInfo<T>,
    ) {
        let m = runtime.num_con();

        self.status = info.status;
        self.iterations = info.iterations;
        self.solve_time = info.solve_time;

        self.x.copy_from(&runtime.primal);
        scaling.unscale_primal(&mut self.x);
        original.row_activity(&self.x, &mut self.rowactivity);

        self.row_duals.copy_from(&runtime.dualcon);
        self.var_duals.copy_from(&runtime.dualvar);
        scaling.unscale_duals(&mut self.row_duals, &mut self.var_duals);

        self.row_status.copy_from_slice(&runtime.status[..m]);
        self.var_status.copy_from_slice(&runtime.status[m..]);

        self.objective = original.objective(&self.x);
        self.primal_infeasibility = original.max_violation(&self.x, &self.rowactivity);
        self.dual_infeasibility = self.dual_residual(original);
    }

    // ‖Qx + c - A'y - z‖∞, or the largest multiplier of the wrong sign
    fn dual_residual(&self, original: &Instance<T>) -> T {
        let mut r = original.c.clone();
        original.Q.gemv(&mut r, &self.x, T::one(), T::one());
        original.A.gemv_t(&mut r, &self.row_duals, -T::one(), T::one());
        r.axpby(-T::one(), &self.var_duals, T::one());

        let duals = self.row_duals.iter().chain(self.var_duals.iter());
        let statuses = self.row_status.iter().chain(self.var_status.iter());
        let sign = duals
            .zip(statuses)
            .enumerate()
            .fold(T::zero(), |acc, (i, (&d, status))| {
                let v = if original.is_equality(i) {
                    T::zero()
                } else {
                    match status {
                        BasisStatus::AtLower => T::max(T::zero(), -d),
                        BasisStatus::AtUpper => T::max(T::zero(), d),
                        _ => T::abs(d),
                    }
                };
                T::max(acc, v)
            });

        T::max(r.norm_inf(), sign)
    }
}

#[test]
fn test_solution_dual_residual() {
    // min ½x² - 2x,  x ≤ 1:  x = 1, z = -1
    let inst = Instance::new(
        CscMatrix::<f64>::identity(1),
        &[-2.],
        CscMatrix::<f64>::zeros((0, 1)),
        &[],
        &[],
        &[f64::NEG_INFINITY],
        &[1.],
    )
    .unwrap();
    let mut sol = DefaultSolution::<f64>::new(1, 0);
    sol.x = vec![1.];
    sol.var_status = vec![BasisStatus::AtUpper];
    sol.var_duals = vec![-1.];
    assert_eq!(sol.dual_residual(&inst), 0.);

    // wrong sign at an upper bound
    sol.var_duals = vec![1.];
    assert_eq!(sol.dual_residual(&inst), 2.);
}
