//! Registry of supported event kinds
//!
//! Each [`EventKind`] maps to an [`EventType`] descriptor: which ephemeris
//! quantity to watch, how the event shows up in it, an optional magnitude
//! gate and the default scan geometry.

use std::fmt;

use crate::config::ScanConfig;
use crate::constants::{
    ANOMALISTIC_MONTH_DAYS, NODICAL_MONTH_DAYS, SECONDS_PER_DAY, SECONDS_PER_HOUR,
    SYNODIC_MONTH_DAYS, TROPICAL_YEAR_DAYS, days_to_seconds,
};
use crate::ephemeris::{Ephemeris, EphemerisSignal, Quantity};
use crate::search::{Bound, Detection, EventType, MagnitudeGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EventKind {
    /// Elongation crosses zero upward
    #[value(name = "new_moon")]
    NewMoon,
    /// Elongation passes ±180°
    #[value(name = "full_moon")]
    FullMoon,
    /// Lunar distance minimum
    #[value(name = "perigee")]
    Perigee,
    /// Lunar distance maximum
    #[value(name = "apogee")]
    Apogee,
    /// Solar declination maximum (~June 21)
    #[value(name = "solstice_summer")]
    SolsticeSummer,
    /// Solar declination minimum (~December 21)
    #[value(name = "solstice_winter")]
    SolsticeWinter,
    /// Solar declination crosses zero upward (~March 20)
    #[value(name = "equinox_vernal")]
    EquinoxVernal,
    /// Solar declination crosses zero downward (~September 22)
    #[value(name = "equinox_autumnal")]
    EquinoxAutumnal,
    /// Lunar latitude crosses zero upward
    #[value(name = "nodal_ascending")]
    NodalAscending,
    /// Lunar latitude crosses zero downward
    #[value(name = "nodal_descending")]
    NodalDescending,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        Self::NewMoon,
        Self::FullMoon,
        Self::Perigee,
        Self::Apogee,
        Self::SolsticeSummer,
        Self::SolsticeWinter,
        Self::EquinoxVernal,
        Self::EquinoxAutumnal,
        Self::NodalAscending,
        Self::NodalDescending,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::NewMoon => "new_moon",
            Self::FullMoon => "full_moon",
            Self::Perigee => "perigee",
            Self::Apogee => "apogee",
            Self::SolsticeSummer => "solstice_summer",
            Self::SolsticeWinter => "solstice_winter",
            Self::EquinoxVernal => "equinox_vernal",
            Self::EquinoxAutumnal => "equinox_autumnal",
            Self::NodalAscending => "nodal_ascending",
            Self::NodalDescending => "nodal_descending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::FullMoon => "Full Moon",
            Self::Perigee => "Lunar Perigee",
            Self::Apogee => "Lunar Apogee",
            Self::SolsticeSummer => "Summer Solstice",
            Self::SolsticeWinter => "Winter Solstice",
            Self::EquinoxVernal => "Vernal Equinox",
            Self::EquinoxAutumnal => "Autumnal Equinox",
            Self::NodalAscending => "Ascending Node",
            Self::NodalDescending => "Descending Node",
        }
    }

    pub fn slugs() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.slug()).collect()
    }

    pub fn detection(&self) -> Detection {
        match self {
            Self::NewMoon | Self::FullMoon => Detection::Ascending,
            Self::Perigee | Self::SolsticeWinter => Detection::Minimum,
            Self::Apogee | Self::SolsticeSummer => Detection::Maximum,
            Self::EquinoxVernal | Self::NodalAscending => Detection::Ascending,
            Self::EquinoxAutumnal | Self::NodalDescending => Detection::Descending,
        }
    }

    fn quantity(&self) -> Quantity {
        match self {
            Self::NewMoon => Quantity::Elongation,
            Self::FullMoon => Quantity::ShiftedElongation,
            Self::Perigee | Self::Apogee => Quantity::MoonDistance,
            Self::SolsticeSummer
            | Self::SolsticeWinter
            | Self::EquinoxVernal
            | Self::EquinoxAutumnal => Quantity::SunDeclination,
            Self::NodalAscending | Self::NodalDescending => Quantity::MoonLatitude,
        }
    }

    /// Auxiliary threshold some kinds need beyond the crossing/extremum test
    fn gate(&self) -> Option<(Quantity, Bound)> {
        match self {
            // The shifted elongation also jumps through zero at new moon
            Self::FullMoon => Some((Quantity::Elongation, Bound::AbsAbove(170.0))),
            Self::SolsticeSummer => Some((Quantity::SunDeclination, Bound::Above(20.0))),
            Self::SolsticeWinter => Some((Quantity::SunDeclination, Bound::Below(-20.0))),
            _ => None,
        }
    }

    pub fn default_scan(&self) -> ScanConfig {
        let monthly = |days: f64| {
            ScanConfig::new(
                days_to_seconds(days),
                6 * SECONDS_PER_HOUR,
                10 * SECONDS_PER_DAY,
                SECONDS_PER_HOUR,
            )
        };
        let yearly = ScanConfig::new(
            days_to_seconds(TROPICAL_YEAR_DAYS),
            SECONDS_PER_DAY,
            100 * SECONDS_PER_DAY,
            SECONDS_PER_DAY,
        );

        match self {
            Self::NewMoon | Self::FullMoon => monthly(SYNODIC_MONTH_DAYS),
            Self::Perigee | Self::Apogee => monthly(ANOMALISTIC_MONTH_DAYS).with_derivative_offset(60),
            Self::SolsticeSummer | Self::SolsticeWinter => {
                yearly.with_derivative_offset(SECONDS_PER_HOUR)
            }
            Self::EquinoxVernal | Self::EquinoxAutumnal => yearly,
            Self::NodalAscending | Self::NodalDescending => monthly(NODICAL_MONTH_DAYS),
        }
    }

    /// Build the descriptor for this kind over `ephemeris`.
    pub fn descriptor<'a>(&self, ephemeris: &'a dyn Ephemeris, scan: ScanConfig) -> EventType<'a> {
        let event = EventType::new(
            self.slug(),
            self.detection(),
            scan,
            EphemerisSignal::new(ephemeris, self.quantity()),
        );
        match self.gate() {
            Some((quantity, bound)) => event.with_gate(MagnitudeGate::new(
                EphemerisSignal::new(ephemeris, quantity),
                bound,
            )),
            None => event,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
