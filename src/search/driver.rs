//! Periodic scan driver
//!
//! Slides a window of `period * (1 + overscan)` across time, stepping by one
//! period so consecutive windows share `period * overscan`. An event whose
//! bracket straddles one window boundary is caught by the neighbouring
//! window, and the guard band drops the second sighting of anything seen
//! twice.

use std::time::Instant;

use crate::config::{RefineConfig, SearchBudget};
use crate::error::{AlmanacError, Result};
use crate::signal::{Derivative, Signal};

use super::Timestamp;
use super::bracket::scan;
use super::classify::{EventType, GuardBand, Verdict, classify};
use super::refine::refine_bracket;

/// Ordered, de-duplicated event timestamps for one event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSequence {
    pub name: String,
    pub timestamps: Vec<Timestamp>,
}

impl EventSequence {
    pub fn new(name: impl Into<String>, timestamps: Vec<Timestamp>) -> Self {
        Self {
            name: name.into(),
            timestamps,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// First timestamp, or 0 for an empty sequence
    pub fn epoch(&self) -> Timestamp {
        self.timestamps.first().copied().unwrap_or(0)
    }

    /// Mean gap between consecutive events, rounded to the nearest second
    ///
    /// Zero for fewer than two events. The gaps telescope, so the mean is
    /// `(last - first) / (n - 1)`; it is computed in integers and ties round
    /// away from zero.
    pub fn average_period(&self) -> i64 {
        average_period(&self.timestamps)
    }
}

pub fn average_period(timestamps: &[Timestamp]) -> i64 {
    let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
        return 0;
    };
    let gaps = timestamps.len() as i128 - 1;
    if gaps < 1 {
        return 0;
    }
    let span = last as i128 - first as i128;
    let doubled = 2 * span;
    let rounded = if doubled >= 0 {
        (doubled + gaps) / (2 * gaps)
    } else {
        (doubled - gaps) / (2 * gaps)
    };
    rounded as i64
}

/// Progress callbacks from the scan driver
pub trait ProgressObserver {
    /// Called after each accepted event; `index` is zero-based.
    fn on_event(&mut self, name: &str, index: usize, ts: Timestamp);

    /// Called after each completed window.
    fn on_window(&mut self, _name: &str, _window: usize, _found: usize) {}
}

/// Observer that ignores all progress
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_event(&mut self, _name: &str, _index: usize, _ts: Timestamp) {}
}

/// Observer that reports through `log`
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    /// Log at info level every `every` events
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressObserver for LogProgress {
    fn on_event(&mut self, name: &str, index: usize, ts: Timestamp) {
        let found = index + 1;
        log::debug!("{} #{} at {}", name, found, ts);
        if found % self.every == 0 {
            log::info!("Found {} {} events", found, name);
        }
    }

    fn on_window(&mut self, name: &str, window: usize, found: usize) {
        log::trace!("{}: window {} done, {} events so far", name, window, found);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Scanning,
    Advancing,
    Done,
}

/// Collects events of one type window by window
pub struct ScanDriver<'e, 'a> {
    event: &'e EventType<'a>,
    refine: RefineConfig,
    budget: SearchBudget,
    state: DriverState,
}

impl<'e, 'a> ScanDriver<'e, 'a> {
    pub fn new(event: &'e EventType<'a>) -> Self {
        Self {
            event,
            refine: RefineConfig::default(),
            budget: SearchBudget::default(),
            state: DriverState::Scanning,
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_refine(mut self, refine: RefineConfig) -> Self {
        self.refine = refine;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Collect exactly `count` events at or after `start`
    ///
    /// Fails with [`AlmanacError::TargetUnreachable`] or
    /// [`AlmanacError::SearchTimeout`] once the budget is spent.
    pub fn run(
        &mut self,
        start: Timestamp,
        count: usize,
        observer: &mut dyn ProgressObserver,
    ) -> Result<EventSequence> {
        let event = self.event;
        event.scan.validate().map_err(AlmanacError::Config)?;

        let derivative;
        let target: &dyn Signal = if event.detection.is_extremum() {
            derivative = Derivative::new(&event.signal, event.scan.derivative_offset as f64);
            &derivative
        } else {
            &event.signal
        };

        let window_length = event.scan.window_length();
        let overlap = event.scan.overlap();

        let mut events = Vec::with_capacity(count);
        let mut guard = GuardBand::new(event.scan.guard_band);
        let mut current = start;
        let mut windows = 0usize;
        let started = Instant::now();

        self.state = if count == 0 {
            DriverState::Done
        } else {
            DriverState::Scanning
        };

        loop {
            match self.state {
                DriverState::Scanning => {
                    self.check_budget(windows, events.len(), count, started)?;

                    let end = current + window_length;
                    log::debug!("{}: scanning [{}, {}]", event.name, current, end);

                    for bracket in scan(target, current, end, event.scan.step)? {
                        let candidate = refine_bracket(target, &bracket, &self.refine)?;
                        match classify(event, candidate, &guard)? {
                            Verdict::Accept(ts) => {
                                guard.record(ts);
                                events.push(ts);
                                observer.on_event(&event.name, events.len() - 1, ts);
                                if events.len() == count {
                                    break;
                                }
                            }
                            Verdict::Reject(reason) => {
                                log::trace!(
                                    "{}: rejected candidate {:.1} ({:?})",
                                    event.name,
                                    candidate,
                                    reason
                                );
                            }
                        }
                    }

                    windows += 1;
                    observer.on_window(&event.name, windows, events.len());
                    self.state = if events.len() == count {
                        DriverState::Done
                    } else {
                        DriverState::Advancing
                    };
                }
                DriverState::Advancing => {
                    current = current + window_length - overlap;
                    self.state = DriverState::Scanning;
                }
                DriverState::Done => {
                    return Ok(EventSequence::new(event.name.clone(), events));
                }
            }
        }
    }

    fn check_budget(
        &self,
        windows: usize,
        found: usize,
        requested: usize,
        started: Instant,
    ) -> Result<()> {
        if windows >= self.budget.max_windows {
            return Err(AlmanacError::TargetUnreachable {
                name: self.event.name.clone(),
                found,
                requested,
                windows,
            });
        }
        if let Some(timeout) = self.budget.timeout {
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(AlmanacError::SearchTimeout {
                    name: self.event.name.clone(),
                    found,
                    requested,
                    elapsed_secs: elapsed.as_secs_f64(),
                });
            }
        }
        Ok(())
    }
}

/// Collect `count` events of `event` starting at `start` with default
/// tolerances and budget.
pub fn generate(event: &EventType<'_>, start: Timestamp, count: usize) -> Result<EventSequence> {
    ScanDriver::new(event).run(start, count, &mut NoProgress)
}
