//! Lookups over a decoded event table
//!
//! Answers "which events surround this instant" and "how far through the
//! current period are we", the two queries a clock face needs.

use crate::search::Timestamp;

/// Indices of the events around an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Closest {
    /// Last index with a value <= the instant
    pub past: Option<usize>,
    /// First index with a value >= the instant
    pub future: Option<usize>,
}

/// Position of an instant within its surrounding period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodFraction {
    /// Bin index in `0..resolution`
    pub bin: u32,
    /// `bin` written in octal digits, read back as a decimal number
    pub bin_octal: u64,
    /// Position within the period, 0..=1
    pub normalized: f64,
    /// Fractional progress through the current bin, 0..=1
    pub progress: f64,
    pub past_index: usize,
    pub future_index: usize,
}

/// Read-only view over ascending timestamps
#[derive(Debug, Clone, Copy)]
pub struct EventTable<'a> {
    timestamps: &'a [Timestamp],
}

impl<'a> EventTable<'a> {
    pub fn new(timestamps: &'a [Timestamp]) -> Self {
        Self { timestamps }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Timestamp> {
        self.timestamps.get(index).copied()
    }

    /// Binary search for the events around `ts`
    ///
    /// An exact hit reports the same index for both sides.
    pub fn find_closest(&self, ts: Timestamp) -> Closest {
        let first_at_or_after = self.timestamps.partition_point(|&v| v < ts);
        let future = (first_at_or_after < self.timestamps.len()).then_some(first_at_or_after);

        let past = match future {
            Some(i) if self.timestamps[i] == ts => Some(i),
            _ => first_at_or_after.checked_sub(1),
        };

        Closest { past, future }
    }

    /// Surrounding window `(past_index, future_index)` with a positive span.
    ///
    /// An instant exactly on an event opens the period that starts there.
    fn window(&self, ts: Timestamp) -> Option<(usize, usize)> {
        let closest = self.find_closest(ts);
        let past = closest.past?;
        let future = if closest.future == Some(past) {
            past + 1
        } else {
            closest.future?
        };
        let t0 = self.get(past)?;
        let t1 = self.get(future)?;
        (t1 > t0).then_some((past, future))
    }

    /// Map `ts` onto `resolution` bins of its surrounding period.
    ///
    /// `None` when the table has fewer than two entries, `resolution` is zero
    /// or `ts` lies outside the table.
    pub fn fraction_at(&self, ts: Timestamp, resolution: u32) -> Option<PeriodFraction> {
        if self.timestamps.len() < 2 || resolution == 0 {
            return None;
        }
        let (past, future) = self.window(ts)?;
        Some(self.fraction_in(ts, resolution, past, future))
    }

    fn fraction_in(&self, ts: Timestamp, resolution: u32, past: usize, future: usize) -> PeriodFraction {
        let t0 = self.timestamps[past];
        let t1 = self.timestamps[future];
        let ts = ts.clamp(t0, t1);

        let normalized = ((ts - t0) as f64 / (t1 - t0) as f64).clamp(0.0, 1.0);
        let pos = normalized * resolution as f64;

        // Bins are 1-based on the ceiling, then shifted to 0-based
        let ceiled = (pos.ceil() as u32).clamp(1, resolution);
        let bin = ceiled - 1;

        let next_boundary = ceiled as f64;
        let prev_boundary = next_boundary - 1.0;
        let progress = if pos <= prev_boundary {
            0.0
        } else if pos >= next_boundary {
            1.0
        } else {
            pos - prev_boundary
        };

        PeriodFraction {
            bin,
            bin_octal: octal_digits(bin),
            normalized,
            progress,
            past_index: past,
            future_index: future,
        }
    }
}

/// Caches the current period so repeated queries skip the binary search
#[derive(Debug, Clone, Default)]
pub struct PeriodCursor {
    window: Option<(usize, usize)>,
}

impl PeriodCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fraction_at(
        &mut self,
        table: &EventTable<'_>,
        ts: Timestamp,
        resolution: u32,
    ) -> Option<PeriodFraction> {
        if table.len() < 2 || resolution == 0 {
            return None;
        }

        let cached = self.window.filter(|&(past, future)| {
            match (table.get(past), table.get(future)) {
                (Some(t0), Some(t1)) => t1 > t0 && ts >= t0 && ts < t1,
                _ => false,
            }
        });

        let (past, future) = match cached {
            Some(window) => window,
            None => {
                let window = table.window(ts)?;
                self.window = Some(window);
                window
            }
        };
        Some(table.fraction_in(ts, resolution, past, future))
    }
}

/// Decimal number whose digits spell `value` in base 8 (e.g. 9 → 11).
pub fn octal_digits(value: u32) -> u64 {
    let mut remaining = value;
    let mut place = 1u64;
    let mut out = 0u64;
    while remaining != 0 {
        out += (remaining % 8) as u64 * place;
        remaining /= 8;
        place *= 10;
    }
    out
}
