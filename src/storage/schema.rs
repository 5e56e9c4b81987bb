//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Catalog-Harvest
//! record mirror.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- One row per emitted product record
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    product_id TEXT NOT NULL,
    product_url TEXT NOT NULL,
    name TEXT,
    discount INTEGER,
    discounted_price TEXT,
    original_price TEXT NOT NULL,
    rating INTEGER,
    product_info TEXT
);

CREATE INDEX IF NOT EXISTS idx_products_product_id ON products(product_id);

-- One row per emitted review record; product_id is not a foreign key
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    product_id TEXT NOT NULL,
    rating INTEGER NOT NULL,
    timestamp TEXT,
    text TEXT,
    size TEXT,
    color TEXT
);

CREATE INDEX IF NOT EXISTS idx_reviews_product_id ON reviews(product_id);
"#;

/// Creates all tables and indexes that do not exist yet
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["runs", "products", "reviews"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
