mod csv;
mod json;
mod text;

use serde::Serialize;

use crate::codec::iso8601;
use crate::constants::SECONDS_PER_DAY;
use crate::search::EventSequence;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Summary of one generated or decoded event table
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub name: String,
    pub count: usize,
    pub epoch: i64,
    pub epoch_iso: Option<String>,
    pub last: Option<i64>,
    pub average_period: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
}

impl TableReport {
    pub fn from_sequence(sequence: &EventSequence) -> Self {
        let epoch = sequence.epoch();
        Self {
            name: sequence.name.clone(),
            count: sequence.len(),
            epoch,
            epoch_iso: iso8601(epoch),
            last: sequence.timestamps.last().copied(),
            average_period: sequence.average_period(),
            elapsed_secs: None,
            artifacts: Vec::new(),
        }
    }

    pub fn average_period_days(&self) -> f64 {
        self.average_period as f64 / SECONDS_PER_DAY as f64
    }
}

pub trait Formatter {
    fn format(&self, report: &TableReport) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
