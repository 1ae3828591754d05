//! Catalog loading
//!
//! One load run reads the classification structure and the elements sources, builds the
//! classification map, extracts unit-group titles and deduplicated example titles, and
//! hands the concatenation (classification titles first) to the batch indexer.

pub mod categorizer;
pub mod classification;
pub mod csv;
pub mod source;
pub mod titles;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jts_common::config::DataConfig;
use jts_common::{Error, Result};
use tracing::info;

use crate::indexer::{BatchIndexer, BatchReport};
use crate::service::JobTitleService;
use classification::{classification_titles, load_classifications};
use source::read_source_lines;
use titles::extract_job_titles;

/// Appended to English text to form the placeholder French text
pub const FRENCH_SUFFIX: &str = " (FR)";

/// Summary of a completed load run
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub classifications: usize,
    pub classification_titles: usize,
    pub example_titles: usize,
    pub batches: BatchReport,
    pub elapsed: Duration,
}

/// Runs a catalog load into the service
pub struct DataLoader {
    service: Arc<JobTitleService>,
    enabled: bool,
    classification_path: PathBuf,
    elements_path: PathBuf,
    batch_size: usize,
}

impl DataLoader {
    pub fn new(service: Arc<JobTitleService>, config: &DataConfig) -> Self {
        Self {
            service,
            enabled: config.loader_enabled,
            classification_path: config.classification_path.clone(),
            elements_path: config.elements_path.clone(),
            batch_size: config.batch_size,
        }
    }

    /// Execute one load run
    ///
    /// Returns `None` when the loader is disabled.
    ///
    /// # Errors
    /// `DataLoad` when a source cannot be read. Batch failures do not fail the run.
    pub async fn run(&self) -> Result<Option<LoadReport>> {
        if !self.enabled {
            info!("Data loader is disabled");
            return Ok(None);
        }

        info!("Starting NOC data loading...");
        let start = Instant::now();

        let structure_lines = read_source_lines(&self.classification_path).await?;
        let element_lines = read_source_lines(&self.elements_path).await?;

        let (classification_count, entries, example_count) =
            tokio::task::spawn_blocking(move || {
                let classifications = load_classifications(&structure_lines);
                info!("Loaded {} classifications", classifications.len());

                let mut entries = classification_titles(&classifications);
                info!("Added {} classification titles", entries.len());

                let examples = extract_job_titles(&element_lines, &classifications);
                info!("Added {} job examples", examples.len());

                let example_count = examples.len();
                entries.extend(examples);
                (classifications.len(), entries, example_count)
            })
            .await
            .map_err(|e| Error::DataLoad(format!("Catalog build task failed: {}", e)))?;

        info!("Total processed: {} unique job titles", entries.len());

        let indexer = BatchIndexer::new(Arc::clone(&self.service), self.batch_size);
        let batches = indexer.index_all(&entries).await;

        let elapsed = start.elapsed();
        info!("NOC data loading completed in {}ms", elapsed.as_millis());

        Ok(Some(LoadReport {
            classifications: classification_count,
            classification_titles: entries.len() - example_count,
            example_titles: example_count,
            batches,
            elapsed,
        }))
    }
}
