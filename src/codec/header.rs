//! C header rendering of an event sequence
//!
//! The array mirrors the binary record value for value. It is derived output
//! for firmware builds that link tables in flash instead of reading files.

use std::fmt::Write;

use chrono::DateTime;

use crate::config::StorageClass;
use crate::constants::HEADER_ROW_WIDTH;
use crate::search::EventSequence;

/// Naming and storage options for generated headers
#[derive(Debug, Clone)]
pub struct HeaderOptions {
    /// Prefix for macros (upper-cased) and the array symbol (lower-cased)
    pub prefix: String,
    pub storage: StorageClass,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            prefix: "fractonica".to_string(),
            storage: StorageClass::Progmem,
        }
    }
}

/// RFC 3339 UTC rendering of a timestamp, if chrono can represent it
pub fn iso8601(ts: i64) -> Option<String> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.to_rfc3339())
}

/// `fractonica` → `Fractonica`
fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render `sequence` as a self-contained C header.
pub fn render_header(sequence: &EventSequence, options: &HeaderOptions) -> String {
    let name = sequence.name.as_str();
    let upper_prefix = options.prefix.to_uppercase();
    let lower_prefix = options.prefix.to_lowercase();
    let guard = format!("{}_{}_H", upper_prefix, name.to_uppercase());
    let storage_macro = format!("{}_STORAGE", upper_prefix);
    let count = sequence.len();
    let epoch = sequence.epoch();
    let epoch_iso = iso8601(epoch).unwrap_or_else(|| "out of range".to_string());

    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write!(
        out,
        "/**
 * {title} Ephemeris Data: {name}
 *
 * Auto-generated - do not edit
 *
 * Epoch: {epoch} ({epoch_iso})
 * Average period: {period} seconds
 * Entry count: {count}
 */

#ifndef {guard}
#define {guard}

#include <stdint.h>

#if defined(ARDUINO_ARCH_AVR)
  #include <avr/pgmspace.h>
  #define {storage_macro} {qualifier}
#elif defined(ESP_PLATFORM) || defined(ARDUINO_ARCH_ESP32) || defined(ARDUINO_ARCH_ESP8266)
  #include <pgmspace.h>
  #define {storage_macro} {qualifier}
#else
  #define {storage_macro}
#endif

#define {upper_prefix}_{upper_name}_COUNT {count}U

static const int64_t {storage_macro} {lower_prefix}_{name}_timestamps[{count}] = {{
",
        title = title_case(&options.prefix),
        period = sequence.average_period(),
        qualifier = options.storage.qualifier(),
        upper_name = name.to_uppercase(),
    );

    let rows: Vec<String> = sequence
        .timestamps
        .chunks(HEADER_ROW_WIDTH)
        .map(|row| {
            let literals: Vec<String> = row.iter().map(|ts| format!("{}LL", ts)).collect();
            format!("    {}", literals.join(", "))
        })
        .collect();
    if !rows.is_empty() {
        out.push_str(&rows.join(",\n"));
        out.push('\n');
    }

    let _ = write!(out, "}};\n\n#endif /* {} */\n", guard);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(n: i64) -> EventSequence {
        EventSequence::new("new_moon", (0..n).map(|i| i * 100).collect())
    }

    #[test]
    fn test_header_metadata() {
        let text = render_header(&EventSequence::new("new_moon", vec![0, 100, 210]), &HeaderOptions::default());
        assert!(text.starts_with("/**\n * Fractonica Ephemeris Data: new_moon\n *\n"));
        assert!(text.contains("Epoch: 0 (1970-01-01T00:00:00+00:00)"));
        assert!(text.contains("Average period: 105 seconds"));
        assert!(text.contains("Entry count: 3"));
        assert!(text.contains("#ifndef FRACTONICA_NEW_MOON_H"));
        assert!(text.contains("#define FRACTONICA_NEW_MOON_COUNT 3U"));
        assert!(text.contains("#define FRACTONICA_STORAGE PROGMEM"));
        assert!(text.contains(
            "static const int64_t FRACTONICA_STORAGE fractonica_new_moon_timestamps[3] = {"
        ));
        assert!(text.contains("    0LL, 100LL, 210LL\n};"));
        assert!(text.ends_with("#endif /* FRACTONICA_NEW_MOON_H */\n"));
    }

    #[test]
    fn test_rows_of_eight() {
        let text = render_header(&sequence(10), &HeaderOptions::default());
        assert!(text.contains(
            "    0LL, 100LL, 200LL, 300LL, 400LL, 500LL, 600LL, 700LL,\n    800LL, 900LL\n};"
        ));
    }

    #[test]
    fn test_storage_and_prefix() {
        let options = HeaderOptions {
            prefix: "tides".to_string(),
            storage: StorageClass::Psram,
        };
        let text = render_header(&sequence(2), &options);
        assert!(text.contains(" * Tides Ephemeris Data: new_moon\n"));
        assert!(text.contains("#define TIDES_STORAGE PSRAM"));
        assert!(text.contains("tides_new_moon_timestamps[2]"));

        let options = HeaderOptions {
            storage: StorageClass::None,
            ..HeaderOptions::default()
        };
        let text = render_header(&sequence(2), &options);
        assert!(!text.contains("PROGMEM"));
    }

    #[test]
    fn test_negative_literals() {
        let seq = EventSequence::new("apogee", vec![-86_400, 5_000_000_000]);
        let text = render_header(&seq, &HeaderOptions::default());
        assert!(text.contains("    -86400LL, 5000000000LL\n};"));
    }
}
