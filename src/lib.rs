pub mod codec;
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod error;
pub mod events;
pub mod report;
pub mod search;
pub mod signal;
pub mod table;

pub use codec::{Encoded, decode_binary, encode};
pub use config::{RefineConfig, ScanConfig, SearchBudget};
pub use error::{AlmanacError, Result};
pub use events::EventKind;
pub use search::{EventSequence, EventType, Timestamp, generate};
pub use signal::Signal;
