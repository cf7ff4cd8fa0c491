use super::*;
use crate::algebra::*;
use crate::solver::core::traits::BasisFactor;
use crate::solver::utils::golden_sequence;

// one moved bound
#[derive(Debug, Clone, Copy)]
struct Shift<T> {
    index: usize,
    lower: bool,
    original: T,
}

/// Record of the bound perturbations applied against degeneracy
#[derive(Debug, Clone, Default)]
pub struct Perturbation<T> {
    shifts: Vec<Shift<T>>,
}

impl<T> Perturbation<T>
where
    T: FloatT,
{
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Move outward every finite non-equality bound that is tight at the
    /// current iterate, except for the constraints in `keep`.
    pub fn apply(runtime: &mut Runtime<T>, keep: &[usize]) -> Self {
        let mut shifts = Vec::new();
        let s = &runtime.settings;
        let base = s.perturb_factor * s.feasibility_tol;
        let tol = s.feasibility_tol;

        for i in 0..runtime.instance.num_total() {
            if runtime.instance.is_equality(i) || keep.contains(&i) {
                continue;
            }
            let act = runtime.activity(i);
            let u: T = golden_sequence(i).as_T();
            let (lo, up) = (runtime.instance.lower(i), runtime.instance.upper(i));

            if lo.is_finite() && T::abs(act - lo) <= tol {
                let delta = base * (T::one() + T::abs(lo)) * (T::one() + u);
                set_bound(&mut runtime.instance, i, true, lo - delta);
                shifts.push(Shift {
                    index: i,
                    lower: true,
                    original: lo,
                });
            }
            if up.is_finite() && T::abs(act - up) <= tol {
                let delta = base * (T::one() + T::abs(up)) * (T::one() + u);
                set_bound(&mut runtime.instance, i, false, up + delta);
                shifts.push(Shift {
                    index: i,
                    lower: false,
                    original: up,
                });
            }
        }
        runtime.invalidate_relaxed();
        Self { shifts }
    }

    /// Restore the original bounds.  Active constraints are moved back
    /// onto their true bounds by a minimum norm correction within the
    /// working set, and the iterate is clipped to the variable bounds.
    pub fn restore(&self, runtime: &mut Runtime<T>) {
        if self.is_empty() {
            return;
        }
        for s in self.shifts.iter() {
            set_bound(&mut runtime.instance, s.index, s.lower, s.original);
        }
        runtime.invalidate_relaxed();

        let m = runtime.num_con();
        let ws = runtime.working_set().to_vec();
        let residual: Vec<T> = ws
            .iter()
            .map(|&i| active_bound(runtime, i) - runtime.activity(i))
            .collect();

        if residual.norm_inf() > T::zero() {
            let mut dx = vec![T::zero(); runtime.num_var()];
            if runtime.basis.solve_active(&residual, &mut dx).is_ok() && dx.is_finite() {
                runtime.primal.axpby(T::one(), &dx, T::one());
            }
        }

        // exact values for active variable bounds, then clip
        for &i in ws.iter().filter(|&&i| i >= m) {
            runtime.primal[i - m] = active_bound(runtime, i);
        }
        let inst = &runtime.instance;
        runtime.primal.project(&inst.var_lo, &inst.var_up);
        runtime.refresh();
    }
}

// the bound an active constraint sits on
fn active_bound<T: FloatT>(runtime: &Runtime<T>, i: usize) -> T {
    match runtime.status[i] {
        BasisStatus::AtUpper => runtime.instance.upper(i),
        _ => runtime.instance.lower(i),
    }
}

fn set_bound<T: FloatT>(instance: &mut Instance<T>, i: usize, lower: bool, value: T) {
    let m = instance.num_con;
    let target = match (i < m, lower) {
        (true, true) => &mut instance.con_lo[i],
        (true, false) => &mut instance.con_up[i],
        (false, true) => &mut instance.var_lo[i - m],
        (false, false) => &mut instance.var_up[i - m],
    };
    *target = value;
}

#[test]
fn test_perturb_and_restore() {
    // x1 + x2 ≥ 1, 0 ≤ x ≤ 1, x2 = 0.5 fixed by an equality row
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[0., 0.],
        CscMatrix::<f64>::from(&[[1., 1.], [0., 1.]]),
        &[1., 0.5],
        &[f64::INFINITY, 0.5],
        &[0., 0.],
        &[1., 1.],
    )
    .unwrap();
    let mut rt = Runtime::new(inst.clone(), DefaultSettings::default());
    rt.set_primal(&[0.5, 0.5]);

    // tight: row 0 at its lower bound.  Row 1 is an equality
    let pert = Perturbation::apply(&mut rt, &[]);
    assert_eq!(pert.len(), 1);
    assert!(rt.instance.con_lo[0] < 1.);
    assert!(rt.instance.con_lo[0] > 1. - 1e-4);
    assert_eq!(rt.instance.con_lo[1], 0.5);

    // make both rows active, row 0 at its perturbed bound
    let mut a = [0.; 2];
    for i in [1, 0] {
        rt.instance.constraint_normal(i, &mut a);
        assert!(rt.basis.add(i, &a).is_ok());
        rt.status[i] = BasisStatus::AtLower;
    }
    let x = [rt.instance.con_lo[0] - 0.5, 0.5];
    rt.set_primal(&x);

    pert.restore(&mut rt);
    assert_eq!(rt.instance, inst);
    assert!((rt.rowactivity[0] - 1.).abs() < 1e-15);
    assert_eq!(rt.primal[1], 0.5);
    assert!(rt.primal_infeasibility() < 1e-15);
}

#[test]
fn test_perturbation_skips_kept_constraints() {
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[0., 0.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[0., 0.],
        &[1., 1.],
    )
    .unwrap();
    let mut rt = Runtime::new(inst, DefaultSettings::default());
    rt.set_primal(&[0., 1.]);

    let pert = Perturbation::apply(&mut rt, &[0]);
    assert_eq!(pert.len(), 1);
    assert_eq!(rt.instance.var_lo[0], 0.);
    assert!(rt.instance.var_up[1] > 1.);

    // distinct indices get distinct shifts
    let mut rt2 = Runtime::new(rt.instance.clone(), DefaultSettings::default());
    rt2.instance.var_up = vec![1., 1.];
    rt2.set_primal(&[1., 1.]);
    Perturbation::apply(&mut rt2, &[]);
    assert!(rt2.instance.var_up[0] != rt2.instance.var_up[1]);
}
