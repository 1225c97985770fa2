use super::{Formatter, TableReport};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &TableReport) -> String {
        let epoch_iso = report.epoch_iso.as_deref().unwrap_or("-");
        let last = report.last.map_or("-".to_string(), |v| v.to_string());
        let mut line = format!(
            "{:<18} {:>6} entries  first {} ({})  last {}  period {}s ({:.4} days)",
            report.name,
            report.count,
            report.epoch,
            epoch_iso,
            last,
            report.average_period,
            report.average_period_days()
        );
        if self.verbose {
            if let Some(elapsed) = report.elapsed_secs {
                line.push_str(&format!("\n    elapsed: {:.2}s", elapsed));
            }
            for artifact in &report.artifacts {
                line.push_str(&format!("\n    wrote: {}", artifact));
            }
        }
        line
    }
}
