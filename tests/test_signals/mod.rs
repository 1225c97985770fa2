#![allow(dead_code)]

pub mod generate;

pub use generate::{ascending_timestamps, rippled_sine, sawtooth_elongation};
