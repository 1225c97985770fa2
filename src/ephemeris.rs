//! Astronomical signal providers
//!
//! The search engine only needs scalar functions of time. [`Ephemeris`] names
//! the four quantities the event registry is built on; any implementation
//! (a JPL kernel reader, a network service) plugs in through it.
//!
//! [`MeanElementEphemeris`] evaluates truncated mean-element series. It is
//! accurate to hours rather than seconds, which is enough to exercise the
//! pipeline end to end but not for publishing tables.

use crate::constants::J2000_UNIX;
use crate::error::Result;
use crate::signal::Signal;

pub trait Ephemeris {
    /// Moon minus Sun ecliptic longitude in degrees, wrapped to (-180, 180]
    fn elongation_deg(&self, t: f64) -> Result<f64>;

    /// Earth–Moon distance in km
    fn moon_distance_km(&self, t: f64) -> Result<f64>;

    /// Solar declination in degrees
    fn sun_declination_deg(&self, t: f64) -> Result<f64>;

    /// Lunar ecliptic latitude in degrees
    fn moon_latitude_deg(&self, t: f64) -> Result<f64>;
}

/// Which ephemeris quantity a signal reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Elongation,
    /// Elongation shifted by 180°, so it crosses zero at full moon
    ShiftedElongation,
    MoonDistance,
    SunDeclination,
    MoonLatitude,
}

/// One ephemeris quantity viewed as a [`Signal`]
pub struct EphemerisSignal<'a> {
    ephemeris: &'a dyn Ephemeris,
    quantity: Quantity,
}

impl<'a> EphemerisSignal<'a> {
    pub fn new(ephemeris: &'a dyn Ephemeris, quantity: Quantity) -> Self {
        Self {
            ephemeris,
            quantity,
        }
    }
}

impl Signal for EphemerisSignal<'_> {
    fn eval(&self, t: f64) -> Result<f64> {
        match self.quantity {
            Quantity::Elongation => self.ephemeris.elongation_deg(t),
            Quantity::ShiftedElongation => {
                let elongation = self.ephemeris.elongation_deg(t)?;
                Ok(if elongation > 0.0 {
                    elongation - 180.0
                } else {
                    elongation + 180.0
                })
            }
            Quantity::MoonDistance => self.ephemeris.moon_distance_km(t),
            Quantity::SunDeclination => self.ephemeris.sun_declination_deg(t),
            Quantity::MoonLatitude => self.ephemeris.moon_latitude_deg(t),
        }
    }
}

/// Wrap an angle in degrees to (-180, 180].
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

const SECONDS_PER_CENTURY: f64 = 36_525.0 * 86_400.0;
const OBLIQUITY_DEG: f64 = 23.4393;
const MEAN_DISTANCE_KM: f64 = 385_000.56;
const DISTANCE_AMPLITUDE_KM: f64 = 20_905.355;
const LATITUDE_AMPLITUDE_DEG: f64 = 5.128;

/// Low-precision mean-element ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanElementEphemeris;

/// Mean arguments in degrees at one instant
struct Arguments {
    /// Moon's mean elongation
    d: f64,
    /// Sun's mean anomaly
    m: f64,
    /// Moon's mean anomaly
    m_moon: f64,
    /// Moon's argument of latitude
    f: f64,
    /// Sun's mean longitude
    l0: f64,
}

impl Arguments {
    fn at(t: f64) -> Self {
        let c = (t - J2000_UNIX) / SECONDS_PER_CENTURY;
        Self {
            d: 297.850_192_1 + 445_267.111_403_4 * c,
            m: 357.529_109_2 + 35_999.050_290_9 * c,
            m_moon: 134.963_396_4 + 477_198.867_505_5 * c,
            f: 93.272_095_0 + 483_202.017_523_3 * c,
            l0: 280.466_46 + 36_000.769_83 * c,
        }
    }
}

impl Ephemeris for MeanElementEphemeris {
    fn elongation_deg(&self, t: f64) -> Result<f64> {
        let a = Arguments::at(t);
        let moon_center = 6.289 * a.m_moon.to_radians().sin();
        let sun_center = 1.915 * a.m.to_radians().sin();
        Ok(wrap_degrees(a.d + moon_center - sun_center))
    }

    fn moon_distance_km(&self, t: f64) -> Result<f64> {
        let a = Arguments::at(t);
        Ok(MEAN_DISTANCE_KM - DISTANCE_AMPLITUDE_KM * a.m_moon.to_radians().cos())
    }

    fn sun_declination_deg(&self, t: f64) -> Result<f64> {
        let a = Arguments::at(t);
        let m = a.m.to_radians();
        let longitude = a.l0 + 1.9146 * m.sin() + 0.02 * (2.0 * m).sin();
        let sin_dec = OBLIQUITY_DEG.to_radians().sin() * longitude.to_radians().sin();
        Ok(sin_dec.asin().to_degrees())
    }

    fn moon_latitude_deg(&self, t: f64) -> Result<f64> {
        let a = Arguments::at(t);
        Ok(LATITUDE_AMPLITUDE_DEG * a.f.to_radians().sin())
    }
}
