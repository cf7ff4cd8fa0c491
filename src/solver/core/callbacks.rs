use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ---------------------------------
// enum for managing callbacks
// ---------------------------------

pub(crate) type CallbackFcn<I> = Box<dyn FnMut(&I) -> bool + Send>;

pub(crate) enum Callback<I> {
    None,
    Rust(CallbackFcn<I>),
}

impl<I> Callback<I> {
    // Call the callback function
    fn call(&mut self, info: &I) -> bool {
        match self {
            Callback::None => false,
            Callback::Rust(f) => f(info),
        }
    }
}

impl<I> std::fmt::Debug for Callback<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callback::None => write!(f, "Callback::None"),
            Callback::Rust(_) => write!(f, "Callback::Rust"),
        }
    }
}

/// A cloneable handle for requesting cancellation of a running solve.
///
/// The flag is polled once per iteration.  A cancelled token stays
/// cancelled until [`reset`](CancelToken::reset) is called, so a
/// request made before `solve` starts interrupts it immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
    /// Clear a previous cancellation request
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug)]
pub(crate) struct SolverCallbacks<I> {
    /// callback for termination
    pub termination_callback: Callback<I>,
    /// external cancellation flag
    pub cancel: CancelToken,
}

impl<I> Default for SolverCallbacks<I> {
    // Create a new set of callbacks
    fn default() -> Self {
        Self {
            termination_callback: Callback::None,
            cancel: CancelToken::new(),
        }
    }
}

impl<I> SolverCallbacks<I> {
    pub(crate) fn check_termination(&mut self, info: &I) -> bool {
        // check termination conditions
        self.cancel.is_cancelled() || self.termination_callback.call(info)
    }
}

#[test]
fn test_cancel_token_shared() {
    let token = CancelToken::new();
    let other = token.clone();
    assert!(!token.is_cancelled());
    other.cancel();
    assert!(token.is_cancelled());
    token.reset();
    assert!(!other.is_cancelled());
}

#[test]
fn test_callback_counts_calls() {
    let mut calls = 0u32;
    let mut callbacks = SolverCallbacks::<u32>::default();
    assert!(!callbacks.check_termination(&0));

    callbacks.termination_callback = Callback::Rust(Box::new(|iter: &u32| *iter >= 3));
    for i in 0..5 {
        if callbacks.check_termination(&i) {
            break;
        }
        calls += 1;
    }
    assert_eq!(calls, 3);
}
