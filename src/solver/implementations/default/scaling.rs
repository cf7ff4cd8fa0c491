#![allow(non_snake_case)]
use super::*;
use crate::algebra::*;

// ---------------
// scaling data
// ---------------

/// Diagonal scaling applied to a problem instance.
///
/// The scaled problem has variables `x̃ = D⁻¹x`, Hessian `σDQD`, cost
/// `σDc`, constraint matrix `EAD`, variable bounds `D⁻¹[lo,up]` and row
/// bounds `E[lo,up]`.  All factors are powers of two.
#[derive(Debug, Clone)]
pub struct ScalingData<T> {
    /// variable scaling `D`
    pub col: Vec<T>,
    /// row scaling `E`
    pub row: Vec<T>,
    /// objective scaling `σ`
    pub cost: T,
}

impl<T> ScalingData<T>
where
    T: FloatT,
{
    /// identity scaling for `n` variables and `m` rows
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            col: vec![T::one(); n],
            row: vec![T::one(); m],
            cost: T::one(),
        }
    }

    /// user point to scaled space, `x̃ = x / d`
    pub fn scale_primal(&self, x: &mut [T]) {
        x.iter_mut().zip(&self.col).for_each(|(x, &d)| *x /= d);
    }

    pub fn unscale_primal(&self, x: &mut [T]) {
        x.hadamard(&self.col);
    }

    pub fn unscale_rowactivity(&self, ra: &mut [T]) {
        ra.iter_mut().zip(&self.row).for_each(|(r, &e)| *r /= e);
    }

    /// user row dual estimate to scaled space, `ỹ = σ y / e`
    pub fn scale_row_duals(&self, y: &mut [T]) {
        let σ = self.cost;
        y.iter_mut().zip(&self.row).for_each(|(y, &e)| *y = σ * *y / e);
    }

    /// `y = E ỹ / σ` and `z = z̃ / (σ D)`
    pub fn unscale_duals(&self, y: &mut [T], z: &mut [T]) {
        let σ = self.cost;
        y.iter_mut().zip(&self.row).for_each(|(y, &e)| *y = e * *y / σ);
        z.iter_mut().zip(&self.col).for_each(|(z, &d)| *z /= σ * d);
    }

    pub fn unscale_objective(&self, f: T) -> T {
        f / self.cost
    }
}

// ---------------
// geometric scaling
// ---------------

/// Equilibrate `instance` in place and return the applied scaling.
/// Returns the identity scaling if scaling is disabled.
pub fn scale_instance<T: FloatT>(
    instance: &mut Instance<T>,
    settings: &DefaultSettings<T>,
) -> ScalingData<T> {
    let (n, m) = (instance.num_var, instance.num_con);
    let mut scaling = ScalingData::new(n, m);
    if !settings.scale {
        return scaling;
    }

    let (d, e) = (&mut scaling.col, &mut scaling.row);
    let (smin, smax, tol) = (settings.scale_min, settings.scale_max, settings.scale_tol);

    let mut dwork = vec![T::one(); n];
    let mut ework = vec![T::one(); m];
    let (mut colmin, mut colmax) = (vec![T::zero(); n], vec![T::zero(); n]);
    let (mut rowmin, mut rowmax) = (vec![T::zero(); m], vec![T::zero(); m]);

    for _ in 0..settings.scale_max_iter {
        // row pass over A
        extremes_init(&mut rowmin, &mut rowmax);
        instance.A.for_each_entry(&mut |i, j, v| {
            let a = T::abs(v) * e[i] * d[j];
            track(&mut rowmin[i], &mut rowmax[i], a);
        });
        pass_factors(&mut ework, &rowmin, &rowmax, smin, smax);
        e.hadamard(&ework);

        // column pass over A and Q together
        extremes_init(&mut colmin, &mut colmax);
        instance.A.for_each_entry(&mut |i, j, v| {
            let a = T::abs(v) * e[i] * d[j];
            track(&mut colmin[j], &mut colmax[j], a);
        });
        instance.Q.for_each_entry(&mut |k, j, v| {
            let q = T::abs(v) * d[k] * d[j];
            track(&mut colmin[j], &mut colmax[j], q);
        });
        pass_factors(&mut dwork, &colmin, &colmax, smin, smax);
        d.hadamard(&dwork);

        let converged = |f: &[T]| f.iter().all(|&s| T::abs(s - T::one()) <= tol);
        if converged(&dwork[..]) && converged(&ework[..]) {
            break;
        }
    }

    // powers of two keep the scaling exact in floating point
    d.scalarop(|x| x.nearest_pow2());
    e.scalarop(|x| x.nearest_pow2());

    instance.Q.lrscale(d, d);
    instance.A.lrscale(e, d);
    instance.c.hadamard(d);

    for ((lo, up), &dj) in instance.var_lo.iter_mut().zip(&mut instance.var_up).zip(d.iter()) {
        *lo /= dj;
        *up /= dj;
    }
    for ((lo, up), &ei) in instance.con_lo.iter_mut().zip(&mut instance.con_up).zip(e.iter()) {
        *lo *= ei;
        *up *= ei;
    }

    // cost scaling
    let mut qnorms = vec![T::zero(); n];
    instance.Q.col_norms(&mut qnorms);
    let mean_col_norm_Q = if n > 0 { qnorms.mean() } else { T::zero() };
    let cost_norm = T::max(instance.c.norm_inf(), mean_col_norm_Q);
    if cost_norm > T::zero() {
        let σ = T::recip(cost_norm).clip(smin, smax).nearest_pow2();
        instance.Q.scale(σ);
        instance.c.scale(σ);
        instance.offset *= σ;
        scaling.cost = σ;
    }

    scaling
}

fn extremes_init<T: FloatT>(lo: &mut [T], hi: &mut [T]) {
    lo.set(T::infinity());
    hi.set(T::zero());
}

#[inline]
fn track<T: FloatT>(lo: &mut T, hi: &mut T, v: T) {
    if v > T::zero() {
        *lo = T::min(*lo, v);
        *hi = T::max(*hi, v);
    }
}

// 1/sqrt(min*max) for each row or column, one for empty ones
fn pass_factors<T: FloatT>(out: &mut [T], lo: &[T], hi: &[T], smin: T, smax: T) {
    for ((s, &l), &h) in out.iter_mut().zip(lo).zip(hi) {
        *s = if h > T::zero() {
            T::recip(T::sqrt(l * h)).clip(smin, smax)
        } else {
            T::one()
        };
    }
}

#[cfg(test)]
fn badly_scaled() -> Instance<f64> {
    Instance::new(
        CscMatrix::<f64>::from(&[[1e4, 10.], [10., 1.]]),
        &[100., -1.],
        CscMatrix::<f64>::from(&[[1000., 1.], [0., 1e-3]]),
        &[-5., f64::NEG_INFINITY],
        &[5., 2.],
        &[0., -1.],
        &[10., f64::INFINITY],
    )
    .unwrap()
    .with_offset(3.)
    .unwrap()
}

#[test]
fn test_scaling_powers_of_two() {
    let mut inst = badly_scaled();
    let settings = DefaultSettings::<f64>::default();
    let scaling = scale_instance(&mut inst, &settings);

    let is_pow2 = |v: f64| v > 0. && v.log2().fract() == 0.;
    assert!(scaling.col.iter().all(|&v| is_pow2(v)));
    assert!(scaling.row.iter().all(|&v| is_pow2(v)));
    assert!(is_pow2(scaling.cost));

    // the spread of A magnitudes improves
    let spread = |A: &SparseMatrix<f64>| {
        let (mut lo, mut hi) = (f64::INFINITY, 0f64);
        A.for_each_entry(&mut |_, _, v| {
            lo = lo.min(v.abs());
            hi = hi.max(v.abs());
        });
        hi / lo
    };
    assert!(spread(&inst.A) < spread(&badly_scaled().A));

    // infinite bounds stay infinite
    assert_eq!(inst.con_lo[1], f64::NEG_INFINITY);
    assert_eq!(inst.var_up[1], f64::INFINITY);
}

#[test]
fn test_scaling_round_trip() {
    let orig = badly_scaled();
    let mut inst = orig.clone();
    let scaling = scale_instance(&mut inst, &DefaultSettings::default());

    let x = [0.75, -0.5];
    let mut xs = x.to_vec();
    scaling.scale_primal(&mut xs);
    let mut back = xs.clone();
    scaling.unscale_primal(&mut back);
    assert_eq!(back, x);

    // objective and row activity transform consistently
    let f = orig.objective(&x);
    let fs = inst.objective(&xs);
    assert!((scaling.unscale_objective(fs) - f).abs() < 1e-10 * f.abs().max(1.));

    let (mut ra, mut ras) = ([0.; 2], [0.; 2]);
    orig.row_activity(&x, &mut ra);
    inst.row_activity(&xs, &mut ras);
    scaling.unscale_rowactivity(&mut ras);
    assert!(ras.norm_inf_diff(&ra) < 1e-12);

    // dual estimates survive a round trip
    let y = [2., -3.];
    let mut ys = y.to_vec();
    scaling.scale_row_duals(&mut ys);
    let mut z = [0.; 2];
    scaling.unscale_duals(&mut ys, &mut z);
    assert_eq!(ys, y);

    // no scaling requested
    let mut inst = orig.clone();
    let settings = DefaultSettings::<f64> {
        scale: false,
        ..DefaultSettings::default()
    };
    let scaling = scale_instance(&mut inst, &settings);
    assert_eq!(inst, orig);
    assert_eq!(scaling.cost, 1.);
}
