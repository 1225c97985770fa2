use super::{Formatter, TableReport};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &TableReport) -> String {
        serde_json::to_string(report).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
