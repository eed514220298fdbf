use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Creates the three output tables and their lookup indexes. Idempotent:
/// everything uses IF NOT EXISTS. Storage errors propagate to the caller.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY,
            word TEXT NOT NULL,
            lang_code TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS definitions (
            id INTEGER PRIMARY KEY,
            entry_id INTEGER NOT NULL,
            pos TEXT,
            gloss TEXT NOT NULL,
            etymology TEXT,
            FOREIGN KEY (entry_id) REFERENCES entries(id)
        );

        CREATE TABLE IF NOT EXISTS cross_references (
            id INTEGER PRIMARY KEY,
            definition_id INTEGER NOT NULL,
            target_lang TEXT NOT NULL,
            target_word TEXT NOT NULL,
            roman TEXT,
            FOREIGN KEY (definition_id) REFERENCES definitions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_lookup
            ON entries(word COLLATE NOCASE, lang_code);
        CREATE INDEX IF NOT EXISTS idx_definitions_entry
            ON definitions(entry_id);
        CREATE INDEX IF NOT EXISTS idx_xref_lookup
            ON cross_references(definition_id, target_lang);",
    )
    .context("Failed to create database schema")
}

/// Tunes the connection for bulk loading. WAL keeps each flush transactional
/// without paying full fsync cost on every commit.
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -64000;",
    )
    .context("Failed to apply connection pragmas")
}

/// Post-load compaction: refresh planner statistics and reclaim free pages.
/// Run once after all input files are processed.
pub fn optimize(conn: &Connection) -> Result<()> {
    info!("Optimizing database");
    conn.execute_batch("PRAGMA optimize;")
        .context("Failed to run PRAGMA optimize")?;
    conn.execute("VACUUM", [])
        .context("Failed to vacuum database")?;
    Ok(())
}
