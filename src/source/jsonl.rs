use async_trait::async_trait;
use tracing::debug;

use crate::models::TournamentRecord;
use crate::storage::{JsonlReader, StorageConfig};

use super::{RecordSource, SourceError};

/// Tournament rows from the local JSONL data lake.
pub struct JsonlSource {
    reader: JsonlReader<TournamentRecord>,
}

impl JsonlSource {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            reader: JsonlReader::new(storage.tournaments_path()),
        }
    }
}

#[async_trait]
impl RecordSource for JsonlSource {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, SourceError> {
        debug!("Reading tournaments from {:?}", self.reader.path());
        Ok(self.reader.read_all()?)
    }

    async fn count(&self) -> Result<usize, SourceError> {
        Ok(self.reader.count()?)
    }
}
