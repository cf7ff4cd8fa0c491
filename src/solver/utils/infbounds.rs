use crate::algebra::*;
use crate::solver::utils::atomic::{AtomicF64, Ordering};
use crate::solver::_INFINITY_DEFAULT;
use lazy_static::lazy_static;
//
lazy_static! {
    static ref INFINITY: AtomicF64 = AtomicF64::new(_INFINITY_DEFAULT);
}

/// Revert internal infinity bound to its default value.
pub fn default_infinity() {
    INFINITY.store(_INFINITY_DEFAULT, Ordering::Relaxed);
}
/// Set the internal infinity bound to a new value.
///
/// Bounds with magnitude at or above this value are treated
/// as infinite when a problem instance is constructed.
pub fn set_infinity(v: f64) {
    INFINITY.store(v, Ordering::Relaxed);
}
/// Get the internal infinity bound.
pub fn get_infinity() -> f64 {
    INFINITY.load(Ordering::Relaxed)
}

// Map user bound values at or beyond the infinity
// threshold onto true infinities, preserving sign.
pub(crate) fn normalize_infinite_bounds<T: FloatT>(v: &mut [T]) {
    let inf: T = get_infinity().as_T();
    for x in v.iter_mut() {
        if *x >= inf {
            *x = T::infinity();
        } else if *x <= -inf {
            *x = -T::infinity();
        }
    }
}

#[test]
fn test_infinity_threshold() {
    let mut v = vec![1e20, -1e21, 5.0, f64::INFINITY];
    normalize_infinite_bounds(&mut v);
    assert_eq!(v, vec![f64::INFINITY, f64::NEG_INFINITY, 5.0, f64::INFINITY]);
    assert_eq!(get_infinity(), 1e20);
}
