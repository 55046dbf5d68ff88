pub mod comments;
pub mod models;
pub mod posts;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

use crate::state::DbPool;

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../../migrations/001_initial.sql"),
)];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // The data directory may not exist on first start
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = Pool::builder()
        .max_size(8)
        .build(SqliteConnectionManager::file(db_path))?;

    // Foreign keys stay unenforced on purpose: deleting a post leaves its
    // comments behind instead of failing or cascading.
    let conn = pool.get()?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )?;

    Ok(pool)
}

/// Apply any migrations that have not run yet, tracked by name in the
/// schema_version table.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let applied: i64 = conn.query_row(
            "SELECT COUNT(*) FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        if applied > 0 {
            continue;
        }

        tracing::info!("Applying migration {}", name);
        conn.execute_batch(sql)?;
        conn.execute(
            "INSERT INTO schema_version (name) VALUES (?1)",
            params![name],
        )?;
    }

    tracing::info!("Schema is up to date");
    Ok(())
}

/// In-memory database for unit tests. A single connection, because every
/// pooled connection would otherwise see its own empty memory database.
#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    let pool = Pool::builder()
        .max_size(1)
        .build(SqliteConnectionManager::memory())
        .unwrap();
    run_migrations(&pool).unwrap();
    pool
}
