use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Signal returned non-finite value {value} at t={t}")]
    NonFiniteSignal { t: f64, value: f64 },

    #[error("Interval [{a}, {b}] does not bracket a root (f(a)={fa}, f(b)={fb})")]
    NotBracketed { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("Root refinement did not converge after {0} iterations")]
    NoConvergence(u32),

    #[error("Target unreachable for {name}: found {found} of {requested} events in {windows} windows")]
    TargetUnreachable {
        name: String,
        found: usize,
        requested: usize,
        windows: usize,
    },

    #[error("Search for {name} timed out after {elapsed_secs:.1}s with {found} of {requested} events")]
    SearchTimeout {
        name: String,
        found: usize,
        requested: usize,
        elapsed_secs: f64,
    },

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Too many entries for a binary record: {0}")]
    TooManyEntries(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AlmanacError>;
