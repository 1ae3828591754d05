//! Database access for jts-search
//!
//! Persists catalog documents in a single SQLite table.

use jts_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the database file (and parent directory) if missing and ensures the schema.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the job_titles table if it doesn't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS job_titles (
            id TEXT PRIMARY KEY,
            noc_code TEXT NOT NULL,
            title_en TEXT NOT NULL DEFAULT '',
            title_fr TEXT NOT NULL DEFAULT '',
            description_en TEXT NOT NULL DEFAULT '',
            description_fr TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT 'General',
            skill_level TEXT NOT NULL DEFAULT 'Unknown'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_job_titles_noc_code ON job_titles(noc_code)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (job_titles)");

    Ok(())
}
