//! Batch indexing
//!
//! Submits catalog entries in contiguous chunks. A failed chunk is logged and skipped; the
//! run always attempts every chunk.

use std::sync::Arc;

use jts_common::CatalogEntry;
use tracing::{error, info};

use crate::service::JobTitleService;

/// Entries per submission unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Outcome of one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub batches_attempted: usize,
    pub batches_failed: usize,
    pub entries_indexed: usize,
}

/// Chunked submission of entries through the service
pub struct BatchIndexer {
    service: Arc<JobTitleService>,
    batch_size: usize,
}

impl BatchIndexer {
    /// Create an indexer; a zero batch size falls back to the default
    pub fn new(service: Arc<JobTitleService>, batch_size: usize) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        Self {
            service,
            batch_size,
        }
    }

    /// Index every entry in chunks of at most `batch_size`
    pub async fn index_all(&self, entries: &[CatalogEntry]) -> BatchReport {
        let total_batches = entries.len().div_ceil(self.batch_size);
        let mut report = BatchReport::default();

        for (i, batch) in entries.chunks(self.batch_size).enumerate() {
            let start = i * self.batch_size;
            report.batches_attempted += 1;

            match self.service.index_job_titles(batch).await {
                Ok(()) => {
                    report.entries_indexed += batch.len();
                    info!(
                        "Progress: {}/{} batches ({} titles)",
                        i + 1,
                        total_batches,
                        start + batch.len()
                    );
                }
                Err(e) => {
                    report.batches_failed += 1;
                    error!("Error indexing batch starting at {}: {}", start, e);
                }
            }
        }

        report
    }
}
