use crate::config::ScanConfig;
use crate::error::Result;
use crate::signal::{Signal, sample};

use super::Timestamp;
use super::refine::to_timestamp;

/// What kind of point on the raw signal counts as an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Zero crossing from negative to positive
    Ascending,
    /// Zero crossing from positive to negative
    Descending,
    /// Local minimum
    Minimum,
    /// Local maximum
    Maximum,
}

impl Detection {
    /// Extrema are found as roots of the derivative rather than the signal.
    pub fn is_extremum(&self) -> bool {
        matches!(self, Self::Minimum | Self::Maximum)
    }
}

/// Threshold applied by a [`MagnitudeGate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Above(f64),
    Below(f64),
    AbsAbove(f64),
}

impl Bound {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Self::Above(limit) => value > limit,
            Self::Below(limit) => value < limit,
            Self::AbsAbove(limit) => value.abs() > limit,
        }
    }
}

/// Extra acceptance test on an auxiliary signal at the candidate instant
pub struct MagnitudeGate<'a> {
    pub signal: Box<dyn Signal + 'a>,
    pub bound: Bound,
}

impl<'a> MagnitudeGate<'a> {
    pub fn new(signal: impl Signal + 'a, bound: Bound) -> Self {
        Self {
            signal: Box::new(signal),
            bound,
        }
    }

    pub fn admits(&self, t: f64) -> Result<bool> {
        Ok(self.bound.admits(sample(&self.signal, t)?))
    }
}

/// Descriptor for one recurring phenomenon
///
/// Bundles the raw signal, how events show up in it and the scan geometry.
/// New phenomena are added by building one of these; the engine itself has no
/// per-phenomenon code.
pub struct EventType<'a> {
    /// Identifier used for file and symbol names (e.g. `new_moon`)
    pub name: String,
    pub detection: Detection,
    pub scan: ScanConfig,
    pub signal: Box<dyn Signal + 'a>,
    pub gate: Option<MagnitudeGate<'a>>,
}

impl<'a> EventType<'a> {
    pub fn new(
        name: impl Into<String>,
        detection: Detection,
        scan: ScanConfig,
        signal: impl Signal + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            detection,
            scan,
            signal: Box::new(signal),
            gate: None,
        }
    }

    pub fn with_gate(mut self, gate: MagnitudeGate<'a>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Minimum-separation filter over accepted events
#[derive(Debug, Clone)]
pub struct GuardBand {
    min_separation: i64,
    last: Option<Timestamp>,
}

impl GuardBand {
    pub fn new(min_separation: i64) -> Self {
        Self {
            min_separation,
            last: None,
        }
    }

    /// A candidate passes only if it lies more than the guard band after the
    /// last accepted event. Earlier candidates (from window overlap) fail too.
    pub fn admits(&self, ts: Timestamp) -> bool {
        match self.last {
            Some(last) => ts - last > self.min_separation,
            None => true,
        }
    }

    pub fn record(&mut self, ts: Timestamp) {
        self.last = Some(ts);
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Too close to (or before) the previous event
    GuardBand,
    /// Crossing in the opposite direction
    WrongDirection,
    /// Derivative root that is not the requested kind of extremum
    NotExtremum,
    /// Failed the magnitude gate
    Gate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept(Timestamp),
    Reject(Rejection),
}

/// Decide whether a refined candidate is an event of `event`'s type
///
/// The guard band is checked first because it needs no signal evaluation;
/// the verdict is the same as checking it last. The caller records accepted
/// timestamps in `guard`.
pub fn classify(event: &EventType<'_>, candidate: f64, guard: &GuardBand) -> Result<Verdict> {
    let ts = to_timestamp(candidate);
    if !guard.admits(ts) {
        return Ok(Verdict::Reject(Rejection::GuardBand));
    }

    let probe = event.scan.probe_offset as f64;
    let before = sample(&event.signal, candidate - probe)?;
    let after = sample(&event.signal, candidate + probe)?;

    let shape_ok = match event.detection {
        Detection::Ascending => before < 0.0 && 0.0 < after,
        Detection::Descending => before > 0.0 && 0.0 > after,
        Detection::Minimum => {
            let center = sample(&event.signal, candidate)?;
            center < before && center < after
        }
        Detection::Maximum => {
            let center = sample(&event.signal, candidate)?;
            center > before && center > after
        }
    };
    if !shape_ok {
        let reason = if event.detection.is_extremum() {
            Rejection::NotExtremum
        } else {
            Rejection::WrongDirection
        };
        return Ok(Verdict::Reject(reason));
    }

    if let Some(gate) = &event.gate {
        if !gate.admits(candidate)? {
            return Ok(Verdict::Reject(Rejection::Gate));
        }
    }

    Ok(Verdict::Accept(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Sinusoid, from_fn};

    fn sine_event(detection: Detection) -> EventType<'static> {
        EventType::new(
            "test",
            detection,
            ScanConfig::new(1000, 10, 100, 5),
            Sinusoid::new(1000.0),
        )
    }

    #[test]
    fn test_crossing_direction() {
        let guard = GuardBand::new(100);

        let ascending = sine_event(Detection::Ascending);
        assert_eq!(classify(&ascending, 1000.0, &guard).unwrap(), Verdict::Accept(1000));
        assert_eq!(
            classify(&ascending, 500.0, &guard).unwrap(),
            Verdict::Reject(Rejection::WrongDirection)
        );

        let descending = sine_event(Detection::Descending);
        assert_eq!(classify(&descending, 500.0, &guard).unwrap(), Verdict::Accept(500));
        assert_eq!(
            classify(&descending, 1000.0, &guard).unwrap(),
            Verdict::Reject(Rejection::WrongDirection)
        );
    }

    #[test]
    fn test_extremum_three_point() {
        let guard = GuardBand::new(100);

        let maximum = sine_event(Detection::Maximum);
        assert_eq!(classify(&maximum, 250.0, &guard).unwrap(), Verdict::Accept(250));
        assert_eq!(
            classify(&maximum, 750.0, &guard).unwrap(),
            Verdict::Reject(Rejection::NotExtremum)
        );

        let minimum = sine_event(Detection::Minimum);
        assert_eq!(classify(&minimum, 750.0, &guard).unwrap(), Verdict::Accept(750));
    }

    #[test]
    fn test_gate_applied_after_shape() {
        let guard = GuardBand::new(100);
        let event = sine_event(Detection::Ascending)
            .with_gate(MagnitudeGate::new(from_fn(|t| t), Bound::Above(1500.0)));

        assert_eq!(
            classify(&event, 1000.0, &guard).unwrap(),
            Verdict::Reject(Rejection::Gate)
        );
        assert_eq!(classify(&event, 2000.0, &guard).unwrap(), Verdict::Accept(2000));
    }

    #[test]
    fn test_guard_band_rejects_duplicates_and_earlier() {
        let event = sine_event(Detection::Ascending);
        let mut guard = GuardBand::new(100);
        guard.record(1000);

        // Same physical crossing seen again from an overlapping window
        assert_eq!(
            classify(&event, 1000.0, &guard).unwrap(),
            Verdict::Reject(Rejection::GuardBand)
        );
        assert!(!guard.admits(1100));
        assert!(guard.admits(1101));
        assert!(!guard.admits(900));
        assert_eq!(classify(&event, 2000.0, &guard).unwrap(), Verdict::Accept(2000));
    }

    #[test]
    fn test_bound_variants() {
        assert!(Bound::Above(20.0).admits(23.4));
        assert!(!Bound::Above(20.0).admits(-23.4));
        assert!(Bound::Below(-20.0).admits(-23.4));
        assert!(Bound::AbsAbove(170.0).admits(-179.0));
        assert!(!Bound::AbsAbove(170.0).admits(3.0));
    }
}
