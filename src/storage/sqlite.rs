//! SQLite storage implementation
//!
//! This module provides the SQLite-backed store for crawl runs and records.

use crate::output::{ProductRecord, ReviewRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::{RecordCounts, RunRecord, RunStatus, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Run Management =====

    /// Starts a new crawl run and returns its ID
    pub fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                read_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    pub fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                read_run,
            )
            .optional()?;

        Ok(run)
    }

    /// Records the final status and finish time of a run
    pub fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.as_str(), now, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Records =====

    pub fn insert_product(&mut self, run_id: i64, product: &ProductRecord) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO products (run_id, product_id, product_url, name, discount,
                discounted_price, original_price, rating, product_info)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                run_id,
                product.product_id,
                product.product_url,
                product.name,
                product.discount,
                product.discounted_price.map(|p| p.to_string()),
                product.original_price.to_string(),
                product.rating,
                product.product_info,
            ],
        )?;
        Ok(())
    }

    pub fn insert_review(&mut self, run_id: i64, review: &ReviewRecord) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO reviews (run_id, product_id, rating, timestamp, text, size, color)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                review.product_id,
                review.rating,
                review.timestamp,
                review.text,
                review.size,
                review.color,
            ],
        )?;
        Ok(())
    }

    /// Counts stored records, optionally restricted to one run
    pub fn record_counts(&self, run_id: Option<i64>) -> StorageResult<RecordCounts> {
        let count = |sql: &str| -> StorageResult<u64> {
            let n: i64 = self.conn.query_row(sql, params![run_id], |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or(0))
        };

        Ok(RecordCounts {
            products: count("SELECT COUNT(*) FROM products WHERE ?1 IS NULL OR run_id = ?1")?,
            reviews: count("SELECT COUNT(*) FROM reviews WHERE ?1 IS NULL OR run_id = ?1")?,
            reviewed_products: count(
                "SELECT COUNT(DISTINCT product_id) FROM reviews WHERE ?1 IS NULL OR run_id = ?1",
            )?,
        })
    }
}

fn read_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::parse(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Running),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: &str) -> ProductRecord {
        ProductRecord {
            product_id: id.to_string(),
            product_url: format!("https://shop.example.com/product{}.html", id),
            name: Some("Hoodie".to_string()),
            discount: Some(25),
            discounted_price: Some(Decimal::new(1500, 2)),
            original_price: Decimal::new(2000, 2),
            rating: Some(3),
            product_info: None,
        }
    }

    fn review(id: &str) -> ReviewRecord {
        ReviewRecord {
            product_id: id.to_string(),
            rating: 5,
            timestamp: None,
            text: Some("Great".to_string()),
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_run_lifecycle() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("abc123").unwrap();

        let run = storage.get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.config_hash, "abc123");
        assert!(run.finished_at.is_none());

        storage.finish_run(run_id, RunStatus::Completed).unwrap();
        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_finish_unknown_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.finish_run(99, RunStatus::Failed),
            Err(StorageError::RunNotFound(99))
        ));
    }

    #[test]
    fn test_record_counts_per_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_run("h").unwrap();
        let second = storage.create_run("h").unwrap();

        storage.insert_product(first, &product("1")).unwrap();
        storage.insert_review(first, &review("1")).unwrap();
        storage.insert_review(first, &review("1")).unwrap();
        storage.insert_product(second, &product("2")).unwrap();
        storage.insert_review(second, &review("7")).unwrap();

        let first_counts = storage.record_counts(Some(first)).unwrap();
        assert_eq!(
            first_counts,
            RecordCounts {
                products: 1,
                reviews: 2,
                reviewed_products: 1
            }
        );

        let all = storage.record_counts(None).unwrap();
        assert_eq!(all.products, 2);
        assert_eq!(all.reviews, 3);
        assert_eq!(all.reviewed_products, 2);
    }

    #[test]
    fn test_prices_stored_as_text() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("h").unwrap();
        storage.insert_product(run_id, &product("1")).unwrap();

        let (discounted, original): (String, String) = storage
            .conn
            .query_row(
                "SELECT discounted_price, original_price FROM products",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(discounted, "15.00");
        assert_eq!(original, "20.00");
    }
}
