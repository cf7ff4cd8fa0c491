//! Internal utility functions and helpers.

pub(crate) mod atomic;
pub(crate) mod infbounds;

// a vectorized version of std::iter::position
// returning indices of *all* elements satisfying a predicate

pub(crate) trait PositionAll<T>: Iterator<Item = T> {
    fn position_all<F>(&mut self, predicate: F) -> Vec<usize>
    where
        F: FnMut(&T) -> bool;
}

impl<T, I> PositionAll<T> for I
where
    I: Iterator<Item = T>,
{
    fn position_all<F>(&mut self, mut f: F) -> Vec<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.enumerate()
            .filter(|(_, item)| f(item))
            .map(|(index, _)| index)
            .collect::<Vec<_>>()
    }
}

// deterministic values in [0,1), distinct for distinct indices.
// Fractional parts of multiples of the golden ratio.
pub(crate) fn golden_sequence(i: usize) -> f64 {
    const PHI_INV: f64 = 0.618_033_988_749_894_9;
    ((i as f64 + 1.0) * PHI_INV).fract()
}

// -------------
// testing

#[test]
fn test_position_all() {
    let test = [3, 1, 0, 5, 9];
    let idx = test.iter().position_all(|&v| *v > 2);
    assert_eq!(idx, vec![0, 3, 4]);

    let idx = test.iter().position_all(|&v| *v == 2);
    assert_eq!(idx, Vec::<usize>::new());
}

#[test]
fn test_golden_sequence() {
    let u: Vec<f64> = (0..50).map(golden_sequence).collect();
    assert!(u.iter().all(|&v| (0.0..1.0).contains(&v)));
    for i in 0..u.len() {
        for j in (i + 1)..u.len() {
            assert!(u[i] != u[j]);
        }
    }
}
