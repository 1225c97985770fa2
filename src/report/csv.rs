use super::{Formatter, TableReport};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &TableReport) -> String {
        let last = report.last.map_or(String::new(), |v| v.to_string());
        let elapsed = report
            .elapsed_secs
            .map_or(String::new(), |v| format!("{:.3}", v));
        format!(
            "{},{},{},{},{},{},{}",
            report.name,
            report.count,
            report.epoch,
            report.epoch_iso.as_deref().unwrap_or(""),
            last,
            report.average_period,
            elapsed
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("name,count,epoch,epoch_iso,last,average_period,elapsed_secs")
    }
}
