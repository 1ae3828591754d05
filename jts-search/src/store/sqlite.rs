//! SQLite-backed document store
//!
//! Documents are written through to the `job_titles` table and mirrored in a
//! [`MemoryStore`] that answers queries. The mirror is hydrated from the table on open,
//! so a restarted service serves the previously indexed catalog.

use async_trait::async_trait;
use jts_common::{CatalogEntry, Result, SkillLevel};
use sqlx::SqlitePool;

use super::{DocumentStore, MemoryStore, StoreHits};
use crate::search::RelevanceQuery;

type JobTitleRow = (String, String, String, String, String, String, String, String);

/// Persistent document store
pub struct SqliteStore {
    pool: SqlitePool,
    index: MemoryStore,
}

impl SqliteStore {
    /// Open the store on an initialized pool and load existing documents
    pub async fn open(pool: SqlitePool) -> Result<Self> {
        let store = Self {
            pool,
            index: MemoryStore::new(),
        };
        let loaded = store.hydrate().await?;
        tracing::info!(documents = loaded, "Loaded persisted job titles");
        Ok(store)
    }

    async fn hydrate(&self) -> Result<usize> {
        let rows = sqlx::query_as::<_, JobTitleRow>(
            r#"
            SELECT id, noc_code, title_en, title_fr, description_en, description_fr,
                   category, skill_level
            FROM job_titles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let entries: Vec<CatalogEntry> = rows.into_iter().filter_map(row_to_entry).collect();
        self.index.upsert(&entries).await?;
        Ok(entries.len())
    }
}

fn row_to_entry(row: JobTitleRow) -> Option<CatalogEntry> {
    let (id, noc_code, title_en, title_fr, description_en, description_fr, category, skill_level) =
        row;

    match CatalogEntry::new(id, noc_code) {
        Ok(entry) => Some(
            entry
                .with_titles(title_en, title_fr)
                .with_descriptions(description_en, description_fr)
                .with_category(category)
                .with_skill_level(SkillLevel::from(skill_level)),
        ),
        Err(e) => {
            tracing::warn!("Skipping invalid stored job title: {}", e);
            None
        }
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn upsert(&self, documents: &[CatalogEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for doc in documents {
            sqlx::query(
                r#"
                INSERT INTO job_titles (
                    id, noc_code, title_en, title_fr, description_en, description_fr,
                    category, skill_level
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    noc_code = excluded.noc_code,
                    title_en = excluded.title_en,
                    title_fr = excluded.title_fr,
                    description_en = excluded.description_en,
                    description_fr = excluded.description_fr,
                    category = excluded.category,
                    skill_level = excluded.skill_level
                "#,
            )
            .bind(doc.id())
            .bind(doc.noc_code())
            .bind(doc.title_en())
            .bind(doc.title_fr())
            .bind(doc.description_en())
            .bind(doc.description_fr())
            .bind(doc.category())
            .bind(doc.skill_level().as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.index.upsert(documents).await
    }

    async fn delete_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM job_titles")
            .execute(&self.pool)
            .await?;
        self.index.delete_all().await
    }

    async fn query(&self, query: &RelevanceQuery) -> Result<StoreHits> {
        self.index.query(query).await
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_titles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database_pool;
    use crate::search::QueryBuilder;
    use jts_common::SearchRequest;
    use tempfile::TempDir;

    fn legislators() -> CatalogEntry {
        CatalogEntry::new("1", "00010")
            .unwrap()
            .with_titles("Legislators", "Legislators (FR)")
            .with_descriptions("Legislators enact laws", "Legislators enact laws (FR)")
            .with_skill_level(SkillLevel::Management)
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("jts.db");

        let pool = init_database_pool(&db_path).await.unwrap();
        let store = SqliteStore::open(pool.clone()).await.unwrap();
        store.upsert(&[legislators()]).await.unwrap();
        pool.close().await;

        let pool = init_database_pool(&db_path).await.unwrap();
        let reopened = SqliteStore::open(pool).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);

        let query = QueryBuilder::default().build(&SearchRequest::new("legislators", "en", 0, 10));
        let hits = reopened.query(&query).await.unwrap();
        assert_eq!(hits.total_found, 1);
        assert_eq!(hits.documents[0], legislators());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database_pool(&temp_dir.path().join("jts.db")).await.unwrap();
        let store = SqliteStore::open(pool).await.unwrap();

        store.upsert(&[legislators()]).await.unwrap();
        let renamed = legislators().with_titles("Senators", "Senators (FR)");
        store.upsert(&[renamed.clone()]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let query = QueryBuilder::default().build(&SearchRequest::new("senators", "en", 0, 10));
        assert_eq!(store.query(&query).await.unwrap().documents, vec![renamed]);
    }

    #[tokio::test]
    async fn test_delete_all_clears_table_and_index() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database_pool(&temp_dir.path().join("jts.db")).await.unwrap();
        let store = SqliteStore::open(pool).await.unwrap();

        store.upsert(&[legislators()]).await.unwrap();
        store.delete_all().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        let query = QueryBuilder::default().build(&SearchRequest::new("legislators", "en", 0, 10));
        assert_eq!(store.query(&query).await.unwrap().total_found, 0);
    }
}
