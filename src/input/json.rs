use crate::core::PositionRecord;
use crate::error::InputError;
use serde_json::Value;
use tracing::warn;

/// Parse a JSON array of trip events.
///
/// Entries that are not objects are skipped with a warning.
pub fn parse_json(text: &str) -> Result<Vec<PositionRecord>, InputError> {
    let values: Vec<Value> = serde_json::from_str(text)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| to_record(value, idx))
        .collect())
}

/// Parse newline-delimited JSON, one event per line. Blank lines and lines
/// holding something other than an object are skipped; malformed JSON is an
/// error.
pub fn parse_json_lines(text: &str) -> Result<Vec<PositionRecord>, InputError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| InputError::JsonLine {
            line: idx + 1,
            source,
        })?;
        records.extend(to_record(value, idx));
    }
    Ok(records)
}

fn to_record(value: Value, idx: usize) -> Option<PositionRecord> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(entry = idx, error = %e, "Skipping trip event that is not an object");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let text = r#"[
            {"eventType": "Measurements", "measurements": {"DeviceLatitude": 1.5, "DeviceLongitude": 2.5}},
            {"eventType": "Ignition", "measurements": {"VehicleIgnitionStatus": 1}}
        ]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].latitude(), Some(1.5));
        assert_eq!(records[1].event_type, "Ignition");
    }

    #[test]
    fn test_parse_json_lines_reports_line_number() {
        let text = "{\"eventType\": \"Measurements\"}\n\n{not json}\n";
        match parse_json_lines(text) {
            Err(InputError::JsonLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected line error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let text = r#"[null, 5, "text", {"eventType": "Measurements"}, true]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_measurement_event());

        let records = parse_json_lines("42\n{\"eventType\": \"A\"}\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type, "A");
    }

    #[test]
    fn test_parse_json_lines() {
        let text = "{\"eventType\": \"A\"}\n{\"eventType\": \"B\"}\n";
        let records = parse_json_lines(text).unwrap();
        assert_eq!(records.iter().map(|r| r.event_type.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
