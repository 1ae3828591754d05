//! Line sources for the catalog loader

use jts_common::{Error, Result};
use std::path::Path;

/// Read every line of a source file
///
/// The file is opened, fully drained and closed before returning. Bytes that are not valid
/// UTF-8 are replaced rather than failing the run.
pub async fn read_source_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::DataLoad(format!("Failed to read {}: {}", path.display(), e)))?;

    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').to_string())
        .collect();

    tracing::debug!(path = %path.display(), lines = lines.len(), "Read source");
    Ok(lines)
}
