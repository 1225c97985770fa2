use crate::error::{AlmanacError, Result};
use crate::signal::{Signal, sample};

use super::Timestamp;

/// Interval known to contain a root
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket {
    /// The signal is exactly zero at this grid point
    Exact(Timestamp),
    /// `fa` and `fb` have strictly opposite signs
    Span {
        a: Timestamp,
        b: Timestamp,
        fa: f64,
        fb: f64,
    },
}

impl Bracket {
    /// Earliest instant covered by the bracket
    pub fn start(&self) -> Timestamp {
        match *self {
            Self::Exact(t) => t,
            Self::Span { a, .. } => a,
        }
    }
}

/// Find sign changes of `signal` on a fixed grid
///
/// Samples `start, start + step, ...` up to and including the last grid point
/// not past `end`; a trailing partial step is skipped. Each grid point is
/// evaluated once and the previous value is carried forward. The signal is
/// never evaluated outside `[start, end]`.
///
/// # Arguments
/// * `signal` - Signal to scan
/// * `start` - First grid point
/// * `end` - Upper bound of the grid
/// * `step` - Grid spacing in seconds; must be positive
pub fn scan<S: Signal + ?Sized>(
    signal: &S,
    start: Timestamp,
    end: Timestamp,
    step: i64,
) -> Result<Vec<Bracket>> {
    if step <= 0 {
        return Err(AlmanacError::Config(format!(
            "scan step must be positive, got {}",
            step
        )));
    }

    let mut brackets = Vec::new();
    if end < start {
        return Ok(brackets);
    }

    let mut a = start;
    let mut fa = sample(signal, a as f64)?;
    let mut b = a + step;

    while b <= end {
        let fb = sample(signal, b as f64)?;
        if fa == 0.0 {
            brackets.push(Bracket::Exact(a));
        } else if fa * fb < 0.0 {
            brackets.push(Bracket::Span { a, b, fa, fb });
        }
        a = b;
        fa = fb;
        b += step;
    }

    Ok(brackets)
}
