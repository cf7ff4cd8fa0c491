use super::{FloatT, ScalarMath};

impl<T: FloatT> ScalarMath for T {
    type T = T;
    fn clip(&self, min_thresh: T, max_thresh: T) -> T {
        if *self < min_thresh {
            min_thresh
        } else if *self > max_thresh {
            max_thresh
        } else {
            *self
        }
    }

    fn nearest_pow2(&self) -> T {
        if !self.is_finite() || *self <= T::zero() {
            return T::one();
        }
        let two = T::one() + T::one();
        two.powf(self.log2().round())
    }
}

#[test]
fn test_clip() {
    assert_eq!(3.0_f64.clip(0.0, 1.0), 1.0);
    assert_eq!((-3.0_f64).clip(0.0, 1.0), 0.0);
    assert_eq!(0.5_f64.clip(0.0, 1.0), 0.5);
}

#[test]
fn test_nearest_pow2() {
    assert_eq!(1.0_f64.nearest_pow2(), 1.0);
    assert_eq!(3.0_f64.nearest_pow2(), 4.0);
    assert_eq!(0.3_f64.nearest_pow2(), 0.25);
    assert_eq!(1024.0_f64.nearest_pow2(), 1024.0);
    assert_eq!(0.0_f64.nearest_pow2(), 1.0);
    assert_eq!(f64::INFINITY.nearest_pow2(), 1.0);
}
