//! Event search engine
//!
//! The driver walks time in overlapping windows. In each window the bracket
//! scanner finds sign changes, the refiner pins each one down and the
//! classifier decides whether the candidate is the event being sought.

pub mod bracket;
pub mod classify;
pub mod driver;
pub mod refine;

/// Whole seconds since the Unix epoch
pub type Timestamp = i64;

pub use bracket::{Bracket, scan};
pub use classify::{
    Bound, Detection, EventType, GuardBand, MagnitudeGate, Rejection, Verdict, classify,
};
pub use driver::{
    DriverState, EventSequence, LogProgress, NoProgress, ProgressObserver, ScanDriver,
    average_period, generate,
};
pub use refine::{refine, refine_bracket, to_timestamp};
