use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Field names used by the trip recorder
pub mod labels {
    /// `eventType` tag carried by position measurement events
    pub const MEASUREMENTS: &str = "Measurements";
    pub const DEVICE_LATITUDE: &str = "DeviceLatitude";
    pub const DEVICE_LONGITUDE: &str = "DeviceLongitude";
    pub const VEHICLE_DEGREE: &str = "VehicleDegree";
    pub const VEHICLE_SPEED: &str = "VehicleSpeed";
    pub const VEHICLE_IGNITION: &str = "VehicleIgnitionStatus";
    pub const ACCUMULATED_DISTANCE: &str = "AccumulatedDistance";
}

/// One raw event from a recorded trip
///
/// Deserialization never rejects a record for a field it doesn't
/// understand. A missing or non-string `eventType` reads as empty, a
/// `measurements` value that isn't an object reads as no measurements, and
/// an unreadable `timestamp` reads as `None`. The path filter then decides
/// what to keep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    /// Event kind, e.g. "Measurements"
    #[serde(default, deserialize_with = "lenient::string")]
    pub event_type: String,

    /// Named measurement fields. Values are kept as raw JSON since the
    /// recorder mixes numbers, strings and nulls.
    #[serde(default, deserialize_with = "lenient::object")]
    pub measurements: BTreeMap<String, serde_json::Value>,

    /// When the event was recorded, if the source carries it. RFC 3339
    /// strings and epoch milliseconds are understood.
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

mod lenient {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    pub fn object<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Value>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        })
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        })
    }
}

impl PositionRecord {
    /// Create a record with no measurements
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            measurements: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Convenience constructor for a measurement event at a position
    pub fn measurement(lat: f64, lng: f64) -> Self {
        Self::new(labels::MEASUREMENTS)
            .with(labels::DEVICE_LATITUDE, lat)
            .with(labels::DEVICE_LONGITUDE, lng)
    }

    /// Builder-style setter for a numeric measurement
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.measurements.insert(name.to_string(), serde_json::json!(value));
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Read a measurement as a finite number.
    ///
    /// Missing fields, nulls, non-numeric values and NaN/inf all read as `None`.
    /// Numeric strings ("12.5") are accepted since CSV exports produce them.
    pub fn number(&self, name: &str) -> Option<f64> {
        let value = match self.measurements.get(name)? {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.number(labels::DEVICE_LATITUDE)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.number(labels::DEVICE_LONGITUDE)
    }

    /// Recorded compass heading in degrees
    pub fn heading(&self) -> Option<f64> {
        self.number(labels::VEHICLE_DEGREE)
    }

    pub fn is_measurement_event(&self) -> bool {
        self.event_type == labels::MEASUREMENTS
    }
}
