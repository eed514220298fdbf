use crate::models::{CrossRefRow, DefinitionRow, EntryRow};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::debug;

/// Accumulates pending rows between transactional flushes.
///
/// The accumulator itself carries no flush policy: callers decide when to
/// flush (on the batch-size boundary and unconditionally at end-of-file).
/// Memory use is bounded by one batch's worth of rows.
#[derive(Default)]
pub struct RowBatch {
    entries: Vec<EntryRow>,
    definitions: Vec<DefinitionRow>,
    cross_refs: Vec<CrossRefRow>,
}

impl RowBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_entry(&mut self, row: EntryRow) {
        self.entries.push(row);
    }

    pub fn push_definition(&mut self, row: DefinitionRow) {
        self.definitions.push(row);
    }

    pub fn push_cross_ref(&mut self, row: CrossRefRow) {
        self.cross_refs.push(row);
    }

    /// Entries accumulated since the last flush. This is the counter the
    /// batch-size threshold is measured against.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.definitions.is_empty() && self.cross_refs.is_empty()
    }

    /// Writes all pending rows inside one transaction, then clears the
    /// buffers. A no-op when nothing is pending. An insert failure aborts
    /// the transaction and propagates; the buffers are left untouched in
    /// that case, but the run as a whole is considered failed.
    pub fn flush(&mut self, conn: &mut Connection) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let tx = conn.transaction().context("Failed to begin transaction")?;
        {
            let mut stmt = tx
                .prepare_cached("INSERT INTO entries (id, word, lang_code) VALUES (?1, ?2, ?3)")?;
            for row in &self.entries {
                stmt.execute(params![row.id, row.word, row.lang_code])
                    .with_context(|| format!("Failed to insert entry {}", row.id))?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT INTO definitions (id, entry_id, pos, gloss, etymology)
                VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in &self.definitions {
                stmt.execute(params![row.id, row.entry_id, row.pos, row.gloss, row.etymology])
                    .with_context(|| format!("Failed to insert definition {}", row.id))?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT INTO cross_references (definition_id, target_lang, target_word, roman)
                VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in &self.cross_refs {
                stmt.execute(params![
                    row.definition_id,
                    row.target_lang,
                    row.target_word,
                    row.roman
                ])
                .with_context(|| {
                    format!("Failed to insert cross-reference for definition {}", row.definition_id)
                })?;
            }
        }
        tx.commit().context("Failed to commit batch")?;

        debug!(
            entries = self.entries.len(),
            definitions = self.definitions.len(),
            cross_refs = self.cross_refs.len(),
            "Batch flushed"
        );

        self.entries.clear();
        self.definitions.clear();
        self.cross_refs.clear();
        Ok(())
    }
}
