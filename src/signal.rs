//! Scalar signals of time
//!
//! A [`Signal`] maps an instant (seconds since the Unix epoch, as `f64` so the
//! refiner can work between whole seconds) to a real value. Providers are
//! assumed deterministic and free of side effects, so every sample can be
//! repeated safely.

use std::f64::consts::PI;

use crate::error::{AlmanacError, Result};

pub trait Signal {
    fn eval(&self, t: f64) -> Result<f64>;
}

impl<S: Signal + ?Sized> Signal for &S {
    fn eval(&self, t: f64) -> Result<f64> {
        (**self).eval(t)
    }
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn eval(&self, t: f64) -> Result<f64> {
        (**self).eval(t)
    }
}

/// Evaluate `signal` at `t`, rejecting NaN and infinities.
///
/// All search components sample through here.
pub fn sample<S: Signal + ?Sized>(signal: &S, t: f64) -> Result<f64> {
    let value = signal.eval(t)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AlmanacError::NonFiniteSignal { t, value })
    }
}

/// Signal backed by an infallible closure
pub struct FnSignal<F>(F);

/// Wrap a closure as a [`Signal`].
pub fn from_fn<F>(f: F) -> FnSignal<F>
where
    F: Fn(f64) -> f64,
{
    FnSignal(f)
}

impl<F> Signal for FnSignal<F>
where
    F: Fn(f64) -> f64,
{
    fn eval(&self, t: f64) -> Result<f64> {
        Ok((self.0)(t))
    }
}

/// `amplitude * sin(2π (t - phase) / period)`
#[derive(Debug, Clone, Copy)]
pub struct Sinusoid {
    pub period: f64,
    pub phase: f64,
    pub amplitude: f64,
}

impl Sinusoid {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            phase: 0.0,
            amplitude: 1.0,
        }
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }
}

impl Signal for Sinusoid {
    fn eval(&self, t: f64) -> Result<f64> {
        Ok(self.amplitude * (2.0 * PI * (t - self.phase) / self.period).sin())
    }
}

/// Centered finite difference of an inner signal
///
/// `(f(t + h) - f(t - h)) / 2h`. Roots of the derivative are the extrema of
/// the inner signal. Small `h` amplifies noise in the inner signal, so the
/// offset is tuned per event kind.
pub struct Derivative<S> {
    inner: S,
    offset: f64,
}

impl<S: Signal> Derivative<S> {
    pub fn new(inner: S, offset: f64) -> Self {
        Self { inner, offset }
    }
}

impl<S: Signal> Signal for Derivative<S> {
    fn eval(&self, t: f64) -> Result<f64> {
        let ahead = sample(&self.inner, t + self.offset)?;
        let behind = sample(&self.inner, t - self.offset)?;
        Ok((ahead - behind) / (2.0 * self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sample_rejects_non_finite() {
        let signal = from_fn(|t| if t > 10.0 { f64::NAN } else { t });
        assert_eq!(sample(&signal, 5.0).unwrap(), 5.0);
        assert!(matches!(
            sample(&signal, 11.0),
            Err(AlmanacError::NonFiniteSignal { .. })
        ));
    }

    #[test]
    fn test_sinusoid_phase() {
        let signal = Sinusoid::new(100.0).with_phase(25.0);
        assert_abs_diff_eq!(signal.eval(25.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.eval(50.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_of_quadratic() {
        let signal = Derivative::new(from_fn(|t| (t - 3.0) * (t - 3.0)), 0.5);
        assert_abs_diff_eq!(signal.eval(3.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signal.eval(5.0).unwrap(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_derivative_propagates_inner_failure() {
        let signal = Derivative::new(from_fn(|t| if t < 0.0 { f64::INFINITY } else { t }), 1.0);
        assert!(signal.eval(0.5).is_err());
    }
}
