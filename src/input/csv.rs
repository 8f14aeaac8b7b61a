use crate::core::PositionRecord;
use crate::error::InputError;
use chrono::{DateTime, Utc};

const EVENT_COLUMNS: &[&str] = &["eventtype", "event_type", "type", "event"];
const TIME_COLUMNS: &[&str] = &["timestamp", "time", "ts"];

/// Parse trip events from CSV text
///
/// The header row must have an event type column (`eventType`, `event_type`,
/// `type` or `event`). An optional `timestamp` column is read as RFC 3339.
/// Every other column is a measurement, named after its header; empty cells
/// are left out so they read as missing.
pub fn parse_csv(text: &str) -> Result<Vec<PositionRecord>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let event_idx = find_column(&headers, EVENT_COLUMNS)
        .ok_or(InputError::MissingEventColumn(EVENT_COLUMNS))?;
    let time_idx = find_column(&headers, TIME_COLUMNS);

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;

        let mut record = PositionRecord::new(row.get(event_idx).unwrap_or_default());
        record.timestamp = time_idx
            .and_then(|idx| row.get(idx))
            .and_then(|s| s.parse::<DateTime<Utc>>().ok());

        for (idx, (name, value)) in headers.iter().zip(row.iter()).enumerate() {
            if idx == event_idx || Some(idx) == time_idx || value.is_empty() {
                continue;
            }
            let value = match value.parse::<f64>() {
                Ok(n) if n.is_finite() => serde_json::json!(n),
                _ => serde_json::Value::String(value.to_string()),
            };
            record.measurements.insert(name.to_string(), value);
        }

        records.push(record);
    }

    Ok(records)
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| names.iter().any(|&name| header.to_lowercase() == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::labels;

    #[test]
    fn test_parse_csv_measurements() {
        let text = "\
eventType,timestamp,DeviceLatitude,DeviceLongitude,VehicleDegree,VehicleIgnitionStatus
Measurements,2019-06-01T10:00:00Z,18.52,73.85,90,ON
Measurements,,18.53,,,
Ignition,,,,,OFF
";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 3);

        assert!(records[0].is_measurement_event());
        assert_eq!(records[0].latitude(), Some(18.52));
        assert_eq!(records[0].heading(), Some(90.0));
        assert!(records[0].timestamp.is_some());
        assert_eq!(
            records[0].measurements.get(labels::VEHICLE_IGNITION),
            Some(&serde_json::json!("ON"))
        );

        assert_eq!(records[1].longitude(), None);
        assert!(records[1].timestamp.is_none());
        assert_eq!(records[2].event_type, "Ignition");
    }

    #[test]
    fn test_header_aliases() {
        let text = "event_type,DeviceLatitude,DeviceLongitude\nMeasurements,1,2\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records[0].longitude(), Some(2.0));
    }

    #[test]
    fn test_missing_event_column() {
        let text = "lat,lng\n1,2\n";
        assert!(matches!(parse_csv(text), Err(InputError::MissingEventColumn(_))));
    }
}
