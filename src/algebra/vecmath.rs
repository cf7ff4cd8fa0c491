use super::{FloatT, VectorMath};
use itertools::izip;
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        self.iter_mut().for_each(|x| *x = op(*x));
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.fill(c);
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x * c)
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    fn hadamard(&mut self, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), y.len());
        zip(&mut *self, y).for_each(|(x, &y)| *x *= y);
        self
    }

    // infinite bounds pass through unchanged
    fn project(&mut self, lo: &[T], up: &[T]) -> &mut Self {
        assert_eq!(self.len(), lo.len());
        assert_eq!(self.len(), up.len());

        for (x, &l, &u) in izip!(&mut *self, lo, up) {
            if *x < l {
                *x = l;
            } else if *x > u {
                *x = u;
            }
        }
        self
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        zip(self, y).fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    fn sum(&self) -> T {
        self.iter().fold(T::zero(), |acc, &a| acc + a)
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    fn norm(&self) -> T {
        // scaled by the largest entry to avoid overflow in the squares
        let s = self.norm_inf();
        if s == T::zero() || !s.is_finite() {
            return s;
        }
        let ss = self.iter().fold(T::zero(), |acc, &a| {
            let r = a / s;
            acc + r * r
        });
        s * T::sqrt(ss)
    }

    // NaN if any entry is NaN
    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for &v in self {
            if v.is_nan() {
                return T::nan();
            }
            out = T::max(out, T::abs(v));
        }
        out
    }

    fn norm_inf_diff(&self, b: &[T]) -> T {
        zip(self, b).fold(T::zero(), |acc, (&x, &y)| T::max(acc, T::abs(x - y)))
    }

    fn mean(&self) -> T {
        match self.len() {
            0 => T::zero(),
            n => self.sum() / T::from_usize(n).unwrap_or_else(T::nan),
        }
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|x| x.is_finite())
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());

        // skip the read of self when it is overwritten
        if b == T::zero() {
            zip(&mut *self, x).for_each(|(y, &x)| *y = a * x);
        } else {
            zip(&mut *self, x).for_each(|(y, &x)| *y = a * x + b * *y);
        }
        self
    }
}

#[test]
fn test_dot_and_sums() {
    let x = vec![1., 2., 3., 4.];
    let y = vec![4., 5., 6., 7.];
    assert_eq!(x.dot(&y), 60.);
    assert_eq!(x.sum(), 10.);
    assert_eq!(x.sumsq(), 30.);
    assert_eq!(x.mean(), 2.5);
    assert_eq!(x[0..0].mean(), 0.);
}

#[test]
fn test_project() {
    let mut x = vec![-2., 0.5, 7., 3.];
    let lo = [-1., 0., f64::NEG_INFINITY, 3.];
    let up = [1., 1., 5., f64::INFINITY];
    x.project(&lo, &up);
    assert_eq!(x, vec![-1., 0.5, 5., 3.]);
}

#[test]
fn test_norms() {
    let x: Vec<f64> = vec![3., -4., 0.];
    assert_eq!(x.norm(), 5.);
    assert_eq!(x.norm_inf(), 4.);
    assert_eq!(x.norm_inf_diff(&[3., -3., 1.]), 1.);

    // no overflow in the squares
    let big: Vec<f64> = vec![3e200, 4e200];
    assert!((big.norm() / 5e200 - 1.).abs() < 1e-14);

    let nan = vec![1., f64::NAN];
    assert!(nan.norm_inf().is_nan());
}

#[test]
fn test_axpby() {
    let mut y = vec![1., 1.];
    y.axpby(2., &[1., 2.], 3.);
    assert_eq!(y, vec![5., 7.]);
    y.axpby(-1., &[1., 2.], 0.);
    assert_eq!(y, vec![-1., -2.]);
}
