use super::*;
use crate::algebra::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-iteration history of a solve.
///
/// One entry is recorded for every iteration of either phase, in order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistics<T> {
    pub iteration: Vec<u32>,
    pub phase: Vec<u8>,
    pub nullspace_dim: Vec<usize>,
    pub num_active: Vec<usize>,
    pub objective: Vec<T>,
    pub primal_infeasibility: Vec<T>,
    /// norm of the reduced gradient
    pub dual_infeasibility: Vec<T>,
    pub step_length: Vec<T>,
    /// elapsed seconds
    pub time: Vec<f64>,
}

impl<T> Statistics<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            iteration: Vec::new(),
            phase: Vec::new(),
            nullspace_dim: Vec::new(),
            num_active: Vec::new(),
            objective: Vec::new(),
            primal_infeasibility: Vec::new(),
            dual_infeasibility: Vec::new(),
            step_length: Vec::new(),
            time: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn len(&self) -> usize {
        self.iteration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iteration.is_empty()
    }

    /// Append the iteration summarized in `info`
    pub fn record(&mut self, info: &DefaultInfo<T>) {
        self.iteration.push(info.iterations);
        self.phase.push(info.phase);
        self.nullspace_dim.push(info.nullspace_dim);
        self.num_active.push(info.num_active);
        self.objective.push(info.objective);
        self.primal_infeasibility.push(info.primal_infeasibility);
        self.dual_infeasibility.push(info.dual_infeasibility);
        self.step_length.push(info.step_length);
        self.time.push(info.solve_time);
    }
}

#[test]
fn test_statistics_record() {
    let mut info = DefaultInfo::<f64>::new();
    let mut stats = Statistics::new();
    assert!(stats.is_empty());

    info.iterations = 1;
    info.phase = 1;
    info.objective = 2.5;
    stats.record(&info);
    info.iterations = 2;
    info.phase = 2;
    info.step_length = 0.5;
    stats.record(&info);

    assert_eq!(stats.len(), 2);
    assert_eq!(stats.iteration, vec![1, 2]);
    assert_eq!(stats.phase, vec![1, 2]);
    assert_eq!(stats.objective, vec![2.5, 2.5]);
    assert_eq!(stats.step_length, vec![0., 0.5]);

    stats.clear();
    assert!(stats.is_empty());
}
