//! Configuration for event search and artifact generation.
//!
//! Every event kind carries its own [`ScanConfig`] record. Defaults come from
//! the registry in [`crate::events`]; a TOML file can override any field:
//!
//! ```toml
//! [search]
//! max_windows = 20000
//! timeout = "10m"
//!
//! [events.perigee]
//! step = "3h"
//! derivative_offset = "120s"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::error::{AlmanacError, Result};
use crate::search::Timestamp;

/// A positive span of whole seconds
///
/// # Parsing formats
/// - `3600` or `3600s` - seconds
/// - `90m` - minutes
/// - `6h` - hours
/// - `29.53d` - days (fractional values are rounded to the nearest second)
///
/// # Example
/// ```
/// use almanac::config::Seconds;
///
/// let step: Seconds = "6h".parse().unwrap();
/// assert_eq!(step.get(), 21_600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "SecondsRepr")]
pub struct Seconds(i64);

impl Seconds {
    pub fn new(secs: i64) -> Self {
        Self(secs)
    }

    pub fn from_days(days: f64) -> Self {
        Self((days * SECONDS_PER_DAY as f64).round() as i64)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0.max(0) as u64)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        if s != 0 && s % SECONDS_PER_DAY == 0 {
            write!(f, "{}d", s / SECONDS_PER_DAY)
        } else if s != 0 && s % SECONDS_PER_HOUR == 0 {
            write!(f, "{}h", s / SECONDS_PER_HOUR)
        } else {
            write!(f, "{}s", s)
        }
    }
}

impl FromStr for Seconds {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let (num, scale) = if let Some(num) = s.strip_suffix('d') {
            (num, SECONDS_PER_DAY as f64)
        } else if let Some(num) = s.strip_suffix('h') {
            (num, SECONDS_PER_HOUR as f64)
        } else if let Some(num) = s.strip_suffix('m') {
            (num, 60.0)
        } else {
            (s.strip_suffix('s').unwrap_or(s), 1.0)
        };

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {}", s))?;
        let secs = (value * scale).round();
        if !secs.is_finite() || secs <= 0.0 {
            return Err("duration must be positive".to_string());
        }
        Ok(Self(secs as i64))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecondsRepr {
    Whole(i64),
    Text(String),
}

impl TryFrom<SecondsRepr> for Seconds {
    type Error = String;

    fn try_from(repr: SecondsRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            SecondsRepr::Whole(secs) if secs > 0 => Ok(Self(secs)),
            SecondsRepr::Whole(_) => Err("duration must be positive".to_string()),
            SecondsRepr::Text(text) => text.parse(),
        }
    }
}

/// Parse an instant given as Unix seconds, an RFC 3339 timestamp or a
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_instant(s: &str) -> std::result::Result<Timestamp, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| format!("invalid instant: {}", s))
}

/// Storage qualifier emitted into generated C headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StorageClass {
    /// Flash storage on AVR/ESP targets
    #[default]
    Progmem,
    /// External PSRAM
    Psram,
    /// No qualifier
    None,
}

impl StorageClass {
    pub fn qualifier(&self) -> &'static str {
        match self {
            Self::Progmem => "PROGMEM",
            Self::Psram => "PSRAM",
            Self::None => "",
        }
    }
}

/// Scan geometry for one event kind
///
/// All spans are whole seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Characteristic period of the phenomenon; sizes the scan window
    pub period: i64,
    /// Bracket scanner step; must be well below half the period
    pub step: i64,
    /// Minimum separation between consecutive accepted events
    pub guard_band: i64,
    /// Fraction of a period added to each window and re-scanned by the next
    pub overscan: f64,
    /// Offset used by the classifier when sampling around a candidate
    pub probe_offset: i64,
    /// Half-width of the centered difference used for extremum search
    pub derivative_offset: i64,
}

impl ScanConfig {
    /// Scan config with the default 10% overscan.
    pub fn new(period: i64, step: i64, guard_band: i64, probe_offset: i64) -> Self {
        Self {
            period,
            step,
            guard_band,
            overscan: 0.1,
            probe_offset,
            derivative_offset: 60,
        }
    }

    pub fn with_derivative_offset(mut self, offset: i64) -> Self {
        self.derivative_offset = offset;
        self
    }

    /// Length of one scan window including overscan.
    pub fn window_length(&self) -> i64 {
        (self.period as f64 * (1.0 + self.overscan)) as i64
    }

    /// Span shared by two consecutive windows.
    pub fn overlap(&self) -> i64 {
        (self.period as f64 * self.overscan) as i64
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.period <= 0 {
            return Err("period must be positive".to_string());
        }
        if self.step <= 0 || self.step >= self.period / 2 {
            return Err(format!(
                "step {}s must be positive and below half the period ({}s)",
                self.step, self.period
            ));
        }
        if self.guard_band < 0 || self.guard_band >= self.period {
            return Err(format!(
                "guard band {}s must be non-negative and below the period ({}s)",
                self.guard_band, self.period
            ));
        }
        if !(0.0..1.0).contains(&self.overscan) {
            return Err(format!("overscan {} must be in [0, 1)", self.overscan));
        }
        if self.probe_offset <= 0 || self.derivative_offset <= 0 {
            return Err("probe and derivative offsets must be positive".to_string());
        }
        // The scanner stops at the last grid point; the next window must
        // start at or before it.
        let unscanned_tail = self.window_length() % self.step;
        if unscanned_tail > self.overlap() {
            return Err(format!(
                "step {}s leaves {}s at the end of each window unscanned, more than the {}s overlap",
                self.step,
                unscanned_tail,
                self.overlap()
            ));
        }
        Ok(())
    }
}

/// Root refinement tolerances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Absolute tolerance on the root in seconds
    pub tolerance_secs: f64,
    /// Upper bound on signal evaluations inside one bracket
    pub max_iterations: u32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: 1e-3,
            max_iterations: 100,
        }
    }
}

/// Bound on how long the scan driver may look for events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBudget {
    /// Maximum number of scan windows before the target is declared unreachable
    pub max_windows: usize,
    /// Optional wall-clock ceiling
    pub timeout: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_windows: 100_000,
            timeout: None,
        }
    }
}

/// Partial [`ScanConfig`] read from a config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanOverrides {
    pub period: Option<Seconds>,
    pub step: Option<Seconds>,
    pub guard_band: Option<Seconds>,
    pub overscan: Option<f64>,
    pub probe_offset: Option<Seconds>,
    pub derivative_offset: Option<Seconds>,
}

impl ScanOverrides {
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(period) = self.period {
            config.period = period.get();
        }
        if let Some(step) = self.step {
            config.step = step.get();
        }
        if let Some(guard_band) = self.guard_band {
            config.guard_band = guard_band.get();
        }
        if let Some(overscan) = self.overscan {
            config.overscan = overscan;
        }
        if let Some(offset) = self.probe_offset {
            config.probe_offset = offset.get();
        }
        if let Some(offset) = self.derivative_offset {
            config.derivative_offset = offset.get();
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub max_windows: Option<usize>,
    pub timeout: Option<Seconds>,
}

/// Contents of a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub events: BTreeMap<String, ScanOverrides>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply the `[search]` section on top of `budget`.
    pub fn apply_budget(&self, budget: &mut SearchBudget) {
        if let Some(max_windows) = self.search.max_windows {
            budget.max_windows = max_windows;
        }
        if let Some(timeout) = self.search.timeout {
            budget.timeout = Some(timeout.as_duration());
        }
    }

    /// Overrides for one event slug; fails on slugs no event kind uses.
    pub fn overrides_for(&self, slug: &str, known: &[&str]) -> Result<Option<&ScanOverrides>> {
        if let Some(unknown) = self.events.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(AlmanacError::Config(format!(
                "unknown event kind in config: {}",
                unknown
            )));
        }
        Ok(self.events.get(slug))
    }
}
