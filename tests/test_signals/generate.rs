use std::f64::consts::PI;

use almanac::Signal;
use almanac::signal::from_fn;
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Angle that advances 360° per `period` seconds, wrapped to (-180, 180]
///
/// Crosses zero upward at every multiple of `period` and jumps from +180 to
/// -180 half way between, like the Moon's elongation.
pub fn sawtooth_elongation(period: f64) -> impl Signal {
    from_fn(move |t| {
        let turns = t / period;
        let angle = 360.0 * (turns - turns.floor());
        if angle > 180.0 { angle - 360.0 } else { angle }
    })
}

/// Sine of `period` with a small fast ripple that adds extra crossings
/// near each main zero crossing
pub fn rippled_sine(period: f64, ripple_amplitude: f64, ripple_period: f64) -> impl Signal {
    from_fn(move |t| {
        (2.0 * PI * t / period).sin() + ripple_amplitude * (2.0 * PI * t / ripple_period).sin()
    })
}

/// Strictly ascending timestamps with random gaps, reproducible per seed
pub fn ascending_timestamps(seed: u64, len: usize, start: i64) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ts = start;
    (0..len)
        .map(|_| {
            ts += rng.random_range(1..=5_000_000i64);
            ts
        })
        .collect()
}
