pub mod csv;
pub mod json;
pub mod source;

pub use self::csv::parse_csv;
pub use json::{parse_json, parse_json_lines};
pub use source::{FileTripSource, MemoryTripSource, TripSource};

use crate::core::PositionRecord;
use crate::error::InputError;

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    /// A single JSON array of events
    Json,
    /// One JSON object per line
    JsonLines,
    Csv,
    Unknown,
}

/// Detect the format of a trip file from its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    let text = match std::str::from_utf8(&data[..data.len().min(4096)]) {
        Ok(text) => text,
        // Cut may have landed inside a multi-byte char
        Err(e) if e.valid_up_to() > 0 => match std::str::from_utf8(&data[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return InputFormat::Unknown,
        },
        Err(_) => return InputFormat::Unknown,
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();

    if text.starts_with('[') {
        return InputFormat::Json;
    }
    if text.starts_with('{') {
        return InputFormat::JsonLines;
    }
    if is_csv(text) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_csv(text: &str) -> bool {
    // Header plus at least one row, both comma separated
    let mut lines = text.lines().filter(|l| !l.trim().is_empty()).take(2);
    matches!(
        (lines.next(), lines.next()),
        (Some(header), Some(row)) if header.contains(',') && row.contains(',')
    )
}

/// Parse trip events, auto-detecting the format
pub fn parse_records(data: &[u8]) -> Result<Vec<PositionRecord>, InputError> {
    let format = detect_format(data);
    let text = String::from_utf8_lossy(data);

    match format {
        InputFormat::Json => parse_json(&text),
        InputFormat::JsonLines => parse_json_lines(&text),
        InputFormat::Csv => parse_csv(&text),
        InputFormat::Unknown => Err(InputError::UnknownFormat),
    }
}
