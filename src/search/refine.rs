//! Bracketed root refinement (Brent–Dekker)
//!
//! Combines bisection with secant and inverse quadratic interpolation steps.
//! Every iterate stays inside the current bracket, so the result never leaves
//! `[a, b]`, and the bisection fallback bounds the evaluation count.

use crate::config::RefineConfig;
use crate::error::{AlmanacError, Result};
use crate::signal::{Signal, sample};

use super::{Bracket, Timestamp};

/// Refine a root of `signal` in `[a, b]`.
///
/// `signal(a)` and `signal(b)` must have opposite signs (or one of them must
/// be zero). Anything else is a wiring fault in the caller and is reported as
/// [`AlmanacError::NotBracketed`].
pub fn refine<S: Signal + ?Sized>(
    signal: &S,
    a: f64,
    b: f64,
    config: &RefineConfig,
) -> Result<f64> {
    let fa = sample(signal, a)?;
    let fb = sample(signal, b)?;
    brent(signal, a, fa, b, fb, config)
}

/// Refine a bracket produced by the scanner, reusing its endpoint samples.
pub fn refine_bracket<S: Signal + ?Sized>(
    signal: &S,
    bracket: &Bracket,
    config: &RefineConfig,
) -> Result<f64> {
    match *bracket {
        Bracket::Exact(t) => Ok(t as f64),
        Bracket::Span { a, b, fa, fb } => brent(signal, a as f64, fa, b as f64, fb, config),
    }
}

/// Convert a refined root to a whole-second timestamp (nearest second).
pub fn to_timestamp(t: f64) -> Timestamp {
    t.round() as Timestamp
}

fn brent<S: Signal + ?Sized>(
    signal: &S,
    a: f64,
    fa: f64,
    b: f64,
    fb: f64,
    config: &RefineConfig,
) -> Result<f64> {
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(AlmanacError::NotBracketed { a, b, fa, fb });
    }

    let (mut a, mut b, mut fa, mut fb) = (a, b, fa, fb);
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..config.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance_secs;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let interp_limit = 3.0 * xm * q - (tol * q).abs();
            let step_limit = (e * q).abs();
            if 2.0 * p < interp_limit.min(step_limit) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = sample(signal, b)?;
    }

    Err(AlmanacError::NoConvergence(config.max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Sinusoid, from_fn};
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;

    #[test]
    fn test_sine_root_within_tolerance() {
        let period = 2_551_443.0;
        let signal = Sinusoid::new(period);
        let config = RefineConfig::default();

        // Descending root at period/2, ascending root at period
        let t = refine(&signal, period / 2.0 - 20_000.0, period / 2.0 + 1_000.0, &config).unwrap();
        assert_abs_diff_eq!(t, period / 2.0, epsilon = config.tolerance_secs);

        let t = refine(&signal, period - 3_600.0, period + 18_000.0, &config).unwrap();
        assert_abs_diff_eq!(t, period, epsilon = config.tolerance_secs);
    }

    #[test]
    fn test_result_inside_bracket() {
        // Steep step function: root is the discontinuity at 10.25
        let signal = from_fn(|t| if t < 10.25 { -1.0 } else { 1.0 });
        let config = RefineConfig::default();
        let t = refine(&signal, 0.0, 100.0, &config).unwrap();
        assert!((0.0..=100.0).contains(&t));
        assert_abs_diff_eq!(t, 10.25, epsilon = 2.0 * config.tolerance_secs);
    }

    #[test]
    fn test_bounded_evaluations() {
        let calls = RefCell::new(0u32);
        let signal = from_fn(|t| {
            *calls.borrow_mut() += 1;
            t * t * t - 2.0
        });
        let config = RefineConfig {
            tolerance_secs: 1e-9,
            max_iterations: 100,
        };
        let t = refine(&signal, 0.0, 2.0, &config).unwrap();
        assert_abs_diff_eq!(t, 2f64.cbrt(), epsilon = 1e-8);
        assert!(*calls.borrow() < 40, "took {} evaluations", calls.borrow());
    }

    #[test]
    fn test_endpoint_root_returned_directly() {
        let signal = from_fn(|t| t - 4.0);
        let t = refine(&signal, 4.0, 9.0, &RefineConfig::default()).unwrap();
        assert_eq!(t, 4.0);
    }

    #[test]
    fn test_not_bracketed_is_reported() {
        let signal = from_fn(|t| t * t + 1.0);
        assert!(matches!(
            refine(&signal, -1.0, 1.0, &RefineConfig::default()),
            Err(AlmanacError::NotBracketed { .. })
        ));
    }

    #[test]
    fn test_exact_bracket_passthrough() {
        let signal = from_fn(|_| panic!("exact brackets need no evaluation"));
        let t = refine_bracket(&signal, &Bracket::Exact(42), &RefineConfig::default()).unwrap();
        assert_eq!(t, 42.0);
    }

    #[test]
    fn test_to_timestamp_rounds() {
        assert_eq!(to_timestamp(-1e-7), 0);
        assert_eq!(to_timestamp(2_551_442.6), 2_551_443);
        assert_eq!(to_timestamp(-10.6), -11);
    }
}
