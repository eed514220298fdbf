use crate::batch::RowBatch;
use crate::config::PROGRESS_INTERVAL;
use crate::extract::extract_record;
use crate::langpair::LanguagePairs;
use crate::models::{CrossRefRow, DefinitionRow, EntryRow, RawRecord};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rusqlite::Connection;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Running identifier cursors, threaded across file-processing calls so that
/// ids assigned while processing a second file continue after the first.
/// Explicit state in and out; no hidden globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCursors {
    pub next_entry_id: i64,
    pub next_definition_id: i64,
}

impl IdCursors {
    pub fn new() -> Self {
        Self {
            next_entry_id: 1,
            next_definition_id: 1,
        }
    }
}

impl Default for IdCursors {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-file load counters, reported after each file and summed for the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReport {
    pub entries: u64,
    pub definitions: u64,
    pub cross_refs: u64,
    pub skipped_lines: u64,
    pub flushes: u64,
}

impl FileReport {
    pub fn merge(&mut self, other: &FileReport) {
        self.entries += other.entries;
        self.definitions += other.definitions;
        self.cross_refs += other.cross_refs;
        self.skipped_lines += other.skipped_lines;
        self.flushes += other.flushes;
    }
}

/// Streams one JSONL file into the database.
///
/// Lines that fail to decode are logged and skipped; records whose declared
/// language differs from `lang_code` are silently discarded before the
/// extractor runs; extraction rejections are silently discarded. Accepted
/// records are batched and flushed transactionally every `batch_size`
/// entries, with a final flush at end-of-file.
pub fn process_file(
    conn: &mut Connection,
    path: &Path,
    lang_code: &str,
    pairs: &LanguagePairs,
    batch_size: usize,
    cursors: IdCursors,
) -> Result<(IdCursors, FileReport)> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let pb = ProgressBar::new_spinner();

    info!(path = %path.display(), lang = lang_code, "Processing file");

    let mut cursors = cursors;
    let mut report = FileReport::default();
    let mut batch = RowBatch::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line
            .with_context(|| format!("Failed to read line {} of {}", line_num, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        if line_num as u64 % PROGRESS_INTERVAL == 0 {
            pb.tick();
        }

        let record: RawRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_num, error = %e, "Skipping malformed line");
                report.skipped_lines += 1;
                continue;
            }
        };

        // Dumps interleave entries from many languages; only the language
        // being processed is of interest. Filtered records never reach the
        // extractor.
        if record.lang_code != lang_code {
            continue;
        }

        let Some(extracted) = extract_record(&record, lang_code, pairs) else {
            continue;
        };

        let entry_id = cursors.next_entry_id;
        cursors.next_entry_id += 1;
        batch.push_entry(EntryRow {
            id: entry_id,
            word: extracted.word,
            lang_code: lang_code.to_string(),
        });

        let first_definition_id = cursors.next_definition_id;
        for gloss in extracted.glosses {
            batch.push_definition(DefinitionRow {
                id: cursors.next_definition_id,
                entry_id,
                pos: extracted.pos.clone(),
                gloss,
                etymology: extracted.etymology.clone(),
            });
            cursors.next_definition_id += 1;
            report.definitions += 1;
        }

        // Cross-references attach to the entry's first definition; the dumps
        // do not associate translations with a specific sense.
        for xref in extracted.cross_refs {
            batch.push_cross_ref(CrossRefRow {
                definition_id: first_definition_id,
                target_lang: xref.target_lang,
                target_word: xref.target_word,
                roman: xref.roman,
            });
            report.cross_refs += 1;
        }

        report.entries += 1;

        if batch.entry_count() >= batch_size {
            batch.flush(conn)?;
            report.flushes += 1;
            pb.set_message(format!("{} entries", report.entries));
            info!(entries = report.entries, "Flushed batch");
        }
    }

    if !batch.is_empty() {
        batch.flush(conn)?;
        report.flushes += 1;
    }

    pb.finish_and_clear();

    info!(
        lang = lang_code,
        entries = report.entries,
        definitions = report.definitions,
        cross_refs = report.cross_refs,
        skipped = report.skipped_lines,
        "File complete"
    );

    Ok((cursors, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_schema;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn jsonl_file(lines: &[&str]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(tmp, "{}", line).unwrap();
        }
        tmp.flush().unwrap();
        tmp
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    const CAT_LINE: &str = r#"{"word":"cat","lang_code":"en","pos":"noun","senses":[{"glosses":["a small domesticated feline"]}],"translations":[{"lang_code":"es","word":"gato"}]}"#;

    #[test]
    fn loads_single_record() {
        let mut conn = test_conn();
        let file = jsonl_file(&[CAT_LINE]);
        let pairs = LanguagePairs::bilingual("en", "es");

        let (cursors, report) = process_file(
            &mut conn,
            file.path(),
            "en",
            &pairs,
            100,
            IdCursors::new(),
        )
        .unwrap();

        assert_eq!(report.entries, 1);
        assert_eq!(report.definitions, 1);
        assert_eq!(report.cross_refs, 1);
        assert_eq!(cursors.next_entry_id, 2);
        assert_eq!(cursors.next_definition_id, 2);
        assert_eq!(count(&conn, "entries"), 1);
    }

    #[test]
    fn wrong_language_record_is_inert() {
        let mut conn = test_conn();
        let file = jsonl_file(&[CAT_LINE]);
        let pairs = LanguagePairs::bilingual("en", "es");

        let (cursors, report) = process_file(
            &mut conn,
            file.path(),
            "es",
            &pairs,
            100,
            IdCursors::new(),
        )
        .unwrap();

        assert_eq!(report.entries, 0);
        assert_eq!(cursors, IdCursors::new());
        assert_eq!(count(&conn, "entries"), 0);
        assert_eq!(count(&conn, "definitions"), 0);
        assert_eq!(count(&conn, "cross_references"), 0);
    }

    #[test]
    fn malformed_line_skipped_without_aborting() {
        let mut conn = test_conn();
        let file = jsonl_file(&["{not json", CAT_LINE, ""]);
        let pairs = LanguagePairs::bilingual("en", "es");

        let (_, report) = process_file(
            &mut conn,
            file.path(),
            "en",
            &pairs,
            100,
            IdCursors::new(),
        )
        .unwrap();

        assert_eq!(report.skipped_lines, 1);
        assert_eq!(report.entries, 1);
    }

    #[test]
    fn record_without_usable_definitions_rejected() {
        let mut conn = test_conn();
        let file = jsonl_file(&[r#"{"word":"cat","lang_code":"en","senses":[{"glosses":[]}]}"#]);
        let pairs = LanguagePairs::bilingual("en", "es");

        let (_, report) = process_file(
            &mut conn,
            file.path(),
            "en",
            &pairs,
            100,
            IdCursors::new(),
        )
        .unwrap();

        assert_eq!(report.entries, 0);
        assert_eq!(count(&conn, "entries"), 0);
    }

    #[test]
    fn exact_batch_boundary_flushes_once_automatically() {
        let mut conn = test_conn();
        let lines: Vec<String> = (0..3)
            .map(|i| {
                format!(
                    r#"{{"word":"w{}","lang_code":"en","senses":[{{"glosses":["g{}"]}}]}}"#,
                    i, i
                )
            })
            .collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = jsonl_file(&line_refs);
        let pairs = LanguagePairs::bilingual("en", "es");

        let (_, report) = process_file(
            &mut conn,
            file.path(),
            "en",
            &pairs,
            3,
            IdCursors::new(),
        )
        .unwrap();

        // One automatic flush at the boundary; the end-of-file flush is a
        // no-op because the buffers were already cleared.
        assert_eq!(report.flushes, 1);
        assert_eq!(count(&conn, "entries"), 3);
    }

    #[test]
    fn partial_batch_flushed_at_end_of_file() {
        let mut conn = test_conn();
        let file = jsonl_file(&[CAT_LINE]);
        let pairs = LanguagePairs::bilingual("en", "es");

        let (_, report) = process_file(
            &mut conn,
            file.path(),
            "en",
            &pairs,
            10_000,
            IdCursors::new(),
        )
        .unwrap();

        assert_eq!(report.flushes, 1);
        assert_eq!(count(&conn, "entries"), 1);
    }

    #[test]
    fn ids_continue_across_files() {
        let mut conn = test_conn();
        let pairs = LanguagePairs::bilingual("en", "es");

        let en_file = jsonl_file(&[
            r#"{"word":"cat","lang_code":"en","senses":[{"glosses":["a feline"]},{"glosses":["a jazz musician"]}]}"#,
        ]);
        let es_file = jsonl_file(&[
            r#"{"word":"gato","lang_code":"es","senses":[{"glosses":["felino"]}]}"#,
        ]);

        let (cursors, _) = process_file(
            &mut conn,
            en_file.path(),
            "en",
            &pairs,
            100,
            IdCursors::new(),
        )
        .unwrap();
        let (cursors, _) =
            process_file(&mut conn, es_file.path(), "es", &pairs, 100, cursors).unwrap();

        assert_eq!(cursors.next_entry_id, 3);
        assert_eq!(cursors.next_definition_id, 4);

        // The second file's entry and definition got the next ids
        let (entry_id, word): (i64, String) = conn
            .query_row(
                "SELECT id, word FROM entries WHERE lang_code = 'es'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(entry_id, 2);
        assert_eq!(word, "gato");

        let definition_id: i64 = conn
            .query_row(
                "SELECT id FROM definitions WHERE entry_id = ?1",
                [entry_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(definition_id, 3);
    }

    #[test]
    fn cross_refs_attach_to_first_definition() {
        let mut conn = test_conn();
        let pairs = LanguagePairs::bilingual("en", "es");
        let file = jsonl_file(&[
            r#"{"word":"bank","lang_code":"en","senses":[{"glosses":["a financial institution"]},{"glosses":["the side of a river"]}],"translations":[{"lang_code":"es","word":"banco"},{"lang_code":"es","word":"orilla"}]}"#,
        ]);

        process_file(&mut conn, file.path(), "en", &pairs, 100, IdCursors::new()).unwrap();

        let ids: Vec<i64> = conn
            .prepare("SELECT definition_id FROM cross_references")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(ids, vec![1, 1]);
    }

    #[test]
    fn etymology_duplicated_across_definitions() {
        let mut conn = test_conn();
        let pairs = LanguagePairs::bilingual("en", "es");
        let file = jsonl_file(&[
            r#"{"word":"cat","lang_code":"en","etymology_text":"from Old English catt","senses":[{"glosses":["a feline"]},{"glosses":["a jazz musician"]}]}"#,
        ]);

        process_file(&mut conn, file.path(), "en", &pairs, 100, IdCursors::new()).unwrap();

        let etymologies: Vec<Option<String>> = conn
            .prepare("SELECT etymology FROM definitions ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(etymologies.len(), 2);
        for etymology in etymologies {
            assert_eq!(etymology.as_deref(), Some("from Old English catt"));
        }
    }
}
