use super::*;
use crate::algebra::*;
use crate::solver::core::traits::{BasisFactor, Pricing};
use enum_dispatch::*;

/// Releases the constraint with the most violated multiplier
#[derive(Debug, Clone, Copy, Default)]
pub struct DantzigPricing;

/// Releases the constraint with the largest violation relative to the
/// length of the edge it opens, `λ_i^2 / |R^{-T} e_i|^2`
#[derive(Debug, Clone, Copy, Default)]
pub struct SteepestEdgePricing;

/// Pricing rules supported by the default solver
#[enum_dispatch(Pricing)]
#[derive(Debug, Clone, Copy)]
pub enum PricingRule {
    DantzigPricing(DantzigPricing),
    SteepestEdgePricing(SteepestEdgePricing),
}

impl From<PricingStrategy> for PricingRule {
    fn from(strategy: PricingStrategy) -> Self {
        match strategy {
            PricingStrategy::Dantzig => DantzigPricing.into(),
            PricingStrategy::SteepestEdge => SteepestEdgePricing.into(),
        }
    }
}

// position of the largest score among entries with violation above tol.
// First index wins ties.
fn argmax_above<T: FloatT>(
    violations: &[T],
    tol: T,
    score: impl Fn(usize, T) -> T,
) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (k, &v) in violations.iter().enumerate() {
        if v <= tol {
            continue;
        }
        let s = score(k, v);
        match best {
            Some((_, bs)) if s <= bs => {}
            _ => best = Some((k, s)),
        }
    }
    best.map(|(k, _)| k)
}

impl Pricing for DantzigPricing {
    fn price<T: FloatT, B: BasisFactor<T>>(
        &self,
        violations: &[T],
        _basis: &B,
        tol: T,
    ) -> Option<usize> {
        argmax_above(violations, tol, |_, v| v)
    }
}

impl Pricing for SteepestEdgePricing {
    fn price<T: FloatT, B: BasisFactor<T>>(
        &self,
        violations: &[T],
        basis: &B,
        tol: T,
    ) -> Option<usize> {
        let mut weights = vec![T::zero(); violations.len()];
        if basis.steepest_edge_weights(&mut weights).is_err() {
            return DantzigPricing.price(violations, basis, tol);
        }
        argmax_above(violations, tol, |k, v| {
            v * v / T::max(weights[k], T::epsilon())
        })
    }
}

#[test]
fn test_pricing_rules() {
    // R = diag(1, 0.1).  The second constraint has the longer edge
    let mut basis = DenseQrBasis::<f64>::new(2, 1e-9);
    assert!(basis.add(2, &[1., 0.]).is_ok());
    assert!(basis.add(3, &[0., 0.1]).is_ok());

    let violations = [2.0, 0.5];
    let dantzig: PricingRule = PricingStrategy::Dantzig.into();
    let steepest: PricingRule = PricingStrategy::SteepestEdge.into();

    assert_eq!(dantzig.price(&violations, &basis, 1e-7), Some(0));
    // scores 4/1 and 0.25/100
    assert_eq!(steepest.price(&violations, &basis, 1e-7), Some(0));

    let violations = [0.0, 0.5];
    assert_eq!(dantzig.price(&violations, &basis, 1e-7), Some(1));
    assert_eq!(steepest.price(&violations, &basis, 1e-7), Some(1));

    // nothing above tolerance
    let violations = [1e-9, 0.0];
    assert_eq!(dantzig.price(&violations, &basis, 1e-7), None);
    assert_eq!(steepest.price(&violations, &basis, 1e-7), None);

    // ties go to the first entry
    assert_eq!(dantzig.price(&[1.0, 1.0], &basis, 1e-7), Some(0));
}
