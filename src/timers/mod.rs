//! Nested wall-clock timers for the solve phases.
//!
//! The solver keeps a [`Timers`] collection and wraps each phase in
//! the `timeit!` macro.  Elapsed times of timers that are still
//! running include the time since they were started, so that the
//! total can be polled against a time limit mid-solve.

use std::collections::HashMap;
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct InnerTimer {
    start: Option<Instant>,
    elapsed: Duration,
    subtimers: SubTimersMap,
}

impl InnerTimer {
    fn reset(&mut self) {
        self.start = None;
        self.elapsed = Duration::ZERO;
        self.subtimers.clear();
    }

    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }

    fn suspend(&mut self) {
        //save current elapsed and suspend
        //subtimers if this timer appears active
        if let Some(instant) = self.start {
            self.elapsed += instant.elapsed();
            self.subtimers.suspend();
        }
    }

    fn resume(&mut self) {
        //resume if this timer appears active.
        //just refresh start time to now.
        if self.start.is_some() {
            self.start = Some(Instant::now());
            self.subtimers.resume();
        }
    }

    fn elapsed(&self) -> Duration {
        match self.start {
            Some(instant) => self.elapsed + instant.elapsed(),
            None => self.elapsed,
        }
    }
}

#[derive(Debug, Default)]
struct SubTimersMap(HashMap<&'static str, InnerTimer>);

impl Deref for SubTimersMap {
    type Target = HashMap<&'static str, InnerTimer>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for SubTimersMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl SubTimersMap {
    fn reset_subtimer(&mut self, key: &'static str) {
        let t = self.entry(key).or_default();
        t.reset();
    }

    fn start_subtimer(&mut self, key: &'static str) {
        let t = self.0.entry(key).or_default();
        t.start();
    }

    //this function suspends every timer in the
    //collection.   Used for notimeit!
    fn suspend(&mut self) {
        for t in self.values_mut() {
            t.suspend();
        }
    }

    fn resume(&mut self) {
        for t in self.values_mut() {
            t.resume();
        }
    }

    fn print(&self, out: &mut dyn Write, depth: u8) -> std::io::Result<()> {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort();
        for key in keys {
            let val = &self[key];
            let tabs = format!("{: <1$}", "", 4 * depth as usize);
            writeln!(out, "{}{:} : {:?}", tabs, key, val.elapsed())?;
            val.subtimers.print(out, depth + 1)?;
        }
        Ok(())
    }
}

/// A collection of named, nested timers
#[derive(Default, Debug)]
pub struct Timers {
    stack: Vec<&'static str>,
    subtimers: SubTimersMap,
}

impl Timers {
    fn mut_active_timer(&mut self) -> Option<&mut InnerTimer> {
        let (first, rest) = self.stack.split_first()?;

        //first one gets special treatment since self is not
        //an InnerTimer and a common trait would be overkill
        let mut active_timer = self.subtimers.get_mut(first)?;
        for key in rest {
            active_timer = active_timer.subtimers.get_mut(key)?;
        }
        Some(active_timer)
    }

    pub fn reset_timer(&mut self, key: &'static str) {
        self.subtimers.reset_subtimer(key);
    }

    /// starts a timer with name `key` as a child of the current timer
    pub fn start_as_current(&mut self, key: &'static str) {
        if let Some(active) = self.mut_active_timer() {
            active.subtimers.start_subtimer(key);
        } else {
            // nothing active, create one at root
            self.subtimers.start_subtimer(key);
        }
        self.stack.push(key);
    }

    /// stops the current timer
    pub fn stop_current(&mut self) {
        if let Some(active) = self.mut_active_timer() {
            active.stop();
        }
        self.stack.pop();
    }

    //Suspend every timer in the collection.   Used for notimeit!
    pub fn suspend(&mut self) {
        self.subtimers.suspend();
    }

    //Resume every timer in the collection.   Used for notimeit!
    pub fn resume(&mut self) {
        self.subtimers.resume();
    }

    /// Elapsed time of the named root timer, if it exists
    pub fn elapsed(&self, key: &'static str) -> Option<Duration> {
        self.subtimers.get(key).map(|t| t.elapsed())
    }

    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        self.subtimers.print(out, 0)
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {

        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

macro_rules! notimeit {
    ($timer:ident; $($tt:tt)+) => {

        $timer.suspend();
        $(
            $tt
        )+
        $timer.resume();
    }
}
pub(crate) use notimeit;

#[test]
fn test_timers_nesting() {
    let mut timers = Timers::default();
    let t = &mut timers;

    timeit! {t => "solve";
        timeit! {t => "phase1";
            std::thread::sleep(Duration::from_millis(2));
        }
        // a running timer reports its time so far
        assert!(t.elapsed("solve").unwrap_or_default() >= Duration::from_millis(2));
    }

    let solve = timers.elapsed("solve").unwrap_or_default();
    assert!(solve >= Duration::from_millis(2));
    assert_eq!(timers.elapsed("phase1"), None);

    let mut out = Vec::<u8>::new();
    assert!(timers.print(&mut out).is_ok());
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("solve"));
    assert!(text.contains("    phase1"));

    timers.reset_timer("solve");
    assert_eq!(timers.elapsed("solve"), Some(Duration::ZERO));
}
