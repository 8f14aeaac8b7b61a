use async_trait::async_trait;
use crate::core::PositionRecord;
use crate::error::InputError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where a trip's events come from
///
/// A source hands back the whole recorded trip in one go, in recording
/// order. It is not a stream of incremental updates.
#[async_trait]
pub trait TripSource: Send {
    /// Human readable name, used in logs
    fn name(&self) -> String;

    /// Fetch the complete, ordered event list
    async fn fetch(&mut self) -> Result<Vec<PositionRecord>, InputError>;
}

/// Trip events read from a file on disk (JSON, NDJSON or CSV)
pub struct FileTripSource {
    path: PathBuf,
}

impl FileTripSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TripSource for FileTripSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&mut self) -> Result<Vec<PositionRecord>, InputError> {
        let data = tokio::fs::read(&self.path).await.map_err(|source| InputError::Io {
            path: self.name(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = data.len(), format = ?super::detect_format(&data), "Read trip file");

        let records = super::parse_records(&data)?;
        info!(path = %self.path.display(), records = records.len(), "Loaded trip events");
        Ok(records)
    }
}

/// Fixed in-memory event list, for tests and demos
pub struct MemoryTripSource {
    name: String,
    records: Vec<PositionRecord>,
}

impl MemoryTripSource {
    pub fn new(name: &str, records: Vec<PositionRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }
}

#[async_trait]
impl TripSource for MemoryTripSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&mut self) -> Result<Vec<PositionRecord>, InputError> {
        Ok(self.records.clone())
    }
}
