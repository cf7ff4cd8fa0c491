use super::*;
use crate::algebra::*;

/// Incrementally maintained objective gradient `Qx + c`.
///
/// Each step updates the cached gradient by `α Qp`.  Rounding drift is
/// bounded by a full recompute every `recompute_frequency` updates, or
/// whenever the cache is marked stale.
#[derive(Debug, Clone)]
pub struct Gradient<T> {
    gradient: Vec<T>,
    uptodate: bool,
    numupdates: u32,
    recompute_frequency: u32,
}

impl<T> Gradient<T>
where
    T: FloatT,
{
    pub fn new(n: usize, recompute_frequency: u32) -> Self {
        Self {
            gradient: vec![T::zero(); n],
            uptodate: false,
            numupdates: 0,
            recompute_frequency: recompute_frequency.max(1),
        }
    }

    /// Current gradient at `x`, recomputing first if stale
    pub fn get(&mut self, instance: &Instance<T>, x: &[T]) -> &[T] {
        if !self.uptodate || self.numupdates >= self.recompute_frequency {
            self.recompute(instance, x);
        }
        &self.gradient
    }

    /// `gradient += α Qp`, where `qp = Q p` for the step direction `p`
    pub fn update(&mut self, qp: &[T], alpha: T) {
        self.gradient.axpby(alpha, qp, T::one());
        self.numupdates += 1;
    }

    /// Force a full recompute of `Qx + c`
    pub fn recompute(&mut self, instance: &Instance<T>, x: &[T]) {
        instance.q_vec_mat(x, &mut self.gradient);
        self.gradient.axpby(T::one(), &instance.c, T::one());
        self.uptodate = true;
        self.numupdates = 0;
    }

    pub fn invalidate(&mut self) {
        self.uptodate = false;
    }

    pub fn numupdates(&self) -> u32 {
        self.numupdates
    }
}

#[test]
fn test_gradient_updates() {
    // Q = [2 1; 1 2], c = (1, -1)
    let inst = Instance::new(
        CscMatrix::<f64>::from(&[[2., 1.], [1., 2.]]),
        &[1., -1.],
        CscMatrix::<f64>::zeros((0, 2)),
        &[],
        &[],
        &[f64::NEG_INFINITY; 2],
        &[f64::INFINITY; 2],
    )
    .unwrap();

    let mut grad = Gradient::new(2, 2);
    let mut x = vec![0., 0.];
    assert_eq!(grad.get(&inst, &x), &[1., -1.]);

    // step along p = (1, 0) with α = 0.5
    let p = [1., 0.];
    let mut qp = [0.; 2];
    inst.q_vec_mat(&p, &mut qp);
    x.axpby(0.5, &p, 1.0);
    grad.update(&qp, 0.5);
    assert_eq!(grad.numupdates(), 1);
    assert_eq!(grad.get(&inst, &x), &[2., -0.5]);

    // the second update reaches the recompute frequency
    grad.update(&qp, 0.0);
    let g = grad.get(&inst, &x).to_vec();
    assert_eq!(grad.numupdates(), 0);
    assert_eq!(g, vec![2., -0.5]);

    // stale caches are refreshed on access
    grad.invalidate();
    x[1] = 1.0;
    assert_eq!(grad.get(&inst, &x), &[3., 1.5]);
}
