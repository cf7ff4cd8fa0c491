use super::*;
use crate::algebra::*;

/// Outcome of a ratio test along a search direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatiotestResult<T> {
    /// step length.  Infinite when nothing blocks an unbounded step
    pub alpha: T,
    /// blocking constraint, if any
    pub limiting: Option<usize>,
    /// whether the blocking constraint becomes active at its lower bound
    pub nowactiveatlower: bool,
}

// a constraint that limits the step
#[derive(Debug, Clone, Copy)]
struct Candidate<T> {
    index: usize,
    alpha: T,
    pivot: T,
    atlower: bool,
}

// rate of change of constraint i along the direction
#[inline]
fn rate<T: FloatT>(i: usize, m: usize, p: &[T], ap: &[T]) -> T {
    if i < m {
        ap[i]
    } else {
        p[i - m]
    }
}

// step to the bound of constraint i in `instance`, if the direction moves
// towards a finite bound with a usable pivot
fn step_to_bound<T: FloatT>(
    instance: &Instance<T>,
    runtime: &Runtime<T>,
    i: usize,
    pivot: T,
    pivot_tol: T,
) -> Option<Candidate<T>> {
    if T::abs(pivot) < pivot_tol {
        return None;
    }
    let atlower = pivot < T::zero();
    let bound = if atlower {
        instance.lower(i)
    } else {
        instance.upper(i)
    };
    if !bound.is_finite() {
        return None;
    }
    let alpha = T::max(T::zero(), (bound - runtime.activity(i)) / pivot);
    Some(Candidate {
        index: i,
        alpha,
        pivot: T::abs(pivot),
        atlower,
    })
}

// every inactive constraint that blocks a step no longer than alphastart
fn candidates<'a, T: FloatT>(
    instance: &'a Instance<T>,
    runtime: &'a Runtime<T>,
    p: &'a [T],
    ap: &'a [T],
    alphastart: T,
) -> impl Iterator<Item = Candidate<T>> + 'a {
    let m = runtime.num_con();
    let pivot_tol = runtime.settings.pivot_tol;
    (0..instance.num_total())
        .filter(move |&i| runtime.status[i] == BasisStatus::Basic)
        .filter_map(move |i| step_to_bound(instance, runtime, i, rate(i, m, p, ap), pivot_tol))
        .filter(move |c| c.alpha <= alphastart)
}

fn finish<T: FloatT>(best: Option<Candidate<T>>, alphastart: T) -> RatiotestResult<T> {
    match best {
        Some(c) => RatiotestResult {
            alpha: c.alpha,
            limiting: Some(c.index),
            nowactiveatlower: c.atlower,
        },
        None => RatiotestResult {
            alpha: alphastart,
            limiting: None,
            nowactiveatlower: false,
        },
    }
}

/// Smallest step to a bound.  Steps within the pivot tolerance of each
/// other are ranked by pivot magnitude, then by index.
fn ratiotest_textbook<T: FloatT>(
    runtime: &Runtime<T>,
    p: &[T],
    ap: &[T],
    alphastart: T,
) -> RatiotestResult<T> {
    let tol = runtime.settings.pivot_tol;
    let best = candidates(&runtime.instance, runtime, p, ap, alphastart).fold(
        None,
        |best: Option<Candidate<T>>, c| match best {
            None => Some(c),
            Some(b) => {
                let better = c.alpha < b.alpha - tol
                    || (T::abs(c.alpha - b.alpha) <= tol && c.pivot > b.pivot);
                if better {
                    Some(c)
                } else {
                    Some(b)
                }
            }
        },
    );
    finish(best, alphastart)
}

/// Harris ratio test.  The first pass bounds the step against bounds
/// relaxed by the feasibility tolerance, the second pass takes the
/// largest pivot among the constraints reached within that bound.
fn ratiotest_twopass<T: FloatT>(
    runtime: &mut Runtime<T>,
    p: &[T],
    ap: &[T],
    alphastart: T,
) -> RatiotestResult<T> {
    runtime.ratiotest_relax_instance();
    let runtime = &*runtime;
    let relaxed = match &runtime.relaxed {
        Some(relaxed) => relaxed,
        None => return ratiotest_textbook(runtime, p, ap, alphastart),
    };

    let maxstep = candidates(relaxed, runtime, p, ap, alphastart)
        .fold(alphastart, |acc, c| T::min(acc, c.alpha));

    let best = candidates(&runtime.instance, runtime, p, ap, maxstep).fold(
        None,
        |best: Option<Candidate<T>>, c| match best {
            Some(b) if c.pivot <= b.pivot => Some(b),
            _ => Some(c),
        },
    );
    finish(best, alphastart)
}

/// Find the longest step `α ≤ alphastart` along `p` that keeps every
/// inactive constraint within its bounds.  `ap` is `A p`.
pub fn ratiotest<T: FloatT>(
    runtime: &mut Runtime<T>,
    p: &[T],
    ap: &[T],
    alphastart: T,
) -> RatiotestResult<T> {
    match runtime.settings.ratiotest {
        RatiotestStrategy::Textbook => ratiotest_textbook(runtime, p, ap, alphastart),
        RatiotestStrategy::TwoPass => ratiotest_twopass(runtime, p, ap, alphastart),
    }
}

#[cfg(test)]
fn two_rows(strategy: RatiotestStrategy) -> Runtime<f64> {
    // rows x1 + x2 ≤ 1 and x1 + 1.5 x2 ≤ 1.0000001,  0 ≤ x
    let inst = Instance::new(
        CscMatrix::<f64>::identity(2),
        &[0., 0.],
        CscMatrix::<f64>::from(&[[1., 1.], [1., 1.5]]),
        &[f64::NEG_INFINITY; 2],
        &[1., 1.0000001],
        &[0., 0.],
        &[f64::INFINITY; 2],
    )
    .unwrap();
    let settings = DefaultSettings {
        ratiotest: strategy,
        ..DefaultSettings::default()
    };
    let mut rt = Runtime::new(inst, settings);
    rt.set_primal(&[0., 0.]);
    rt
}

#[test]
fn test_ratiotest_textbook() {
    let mut rt = two_rows(RatiotestStrategy::Textbook);

    // along x1, row 0 is reached first
    let p = [1., 0.];
    let ap = [1., 1.];
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(0));
    assert!(!res.nowactiveatlower);
    assert_eq!(res.alpha, 1.);

    // along x2 the second row is reached first
    let p = [0., 1.];
    let ap = [1., 1.5];
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(1));
    assert_eq!(res.alpha, 1.0000001 / 1.5);

    // the unconstrained minimizer is closer
    let res = ratiotest(&mut rt, &p, &ap, 0.5);
    assert_eq!(res.limiting, None);
    assert_eq!(res.alpha, 0.5);

    // moving down, the bound on x2 blocks
    let p = [0., -1.];
    let ap = [-1., -1.5];
    rt.set_primal(&[0., 0.5]);
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(3));
    assert!(res.nowactiveatlower);
    assert_eq!(res.alpha, 0.5);

    // active constraints are skipped, leaving the step unbounded
    rt.status[3] = BasisStatus::AtLower;
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, None);
    assert_eq!(res.alpha, f64::INFINITY);
}

#[test]
fn test_ratiotest_ties() {
    let mut rt = two_rows(RatiotestStrategy::Textbook);

    // steps equal up to the pivot tolerance: the larger pivot wins
    let p = [0., 1.];
    let ap = [1., 1.0000001];
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(1));

    // exact ties with equal pivots go to the smaller index
    rt.instance.con_up[1] = 1.0;
    let ap = [1., 1.];
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(0));
}

#[test]
fn test_ratiotest_twopass_prefers_large_pivot() {
    let mut rt = two_rows(RatiotestStrategy::TwoPass);

    // row 0 is reached at α = 1, row 1 slightly later with a larger pivot
    let p = [0., 1.];
    let ap = [1., 1.00000005];

    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(1));
    assert_eq!(res.alpha, 1.0000001 / 1.00000005);

    rt.settings.ratiotest = RatiotestStrategy::Textbook;
    let res = ratiotest(&mut rt, &p, &ap, f64::INFINITY);
    assert_eq!(res.limiting, Some(0));
    assert_eq!(res.alpha, 1.);
}
