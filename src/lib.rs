//! Lexica: Wiktionary JSONL to SQLite dictionary converter
//!
//! This crate is a one-shot batch ETL pipeline that turns Wiktionary JSONL dumps
//! (one JSON object per line, as produced by kaikki.org) into a SQLite database
//! optimized for headword lookup:
//!
//! 1. **Schema Initialization** -- Create the entries/definitions/cross_references
//!    tables and their lookup indexes on a fresh database file
//! 2. **Extraction** -- Map each raw record to a normalized tuple (headword,
//!    part-of-speech, glosses, etymology, filtered cross-references), applying a
//!    configurable language-pair allow-list
//! 3. **Batch Loading** -- Accumulate rows in memory and write them in
//!    fixed-size transactional batches
//! 4. **Compaction** -- Run `PRAGMA optimize` and `VACUUM` once after all input
//!    files are processed
//!
//! # Architecture
//!
//! The pipeline is strictly single-threaded and streaming: lines are consumed
//! one at a time, so memory use is bounded by the batch size rather than the
//! input file size. Up to two input files (one per language of a bilingual
//! pair) are processed sequentially, with entry and definition id cursors
//! threaded across files so identifiers stay unique and monotonic for the
//! whole run.
//!
//! Malformed lines are the one recoverable error class: they are logged as
//! warnings and skipped. Records in the wrong language or failing extraction
//! rules are silently filtered. Any storage failure aborts the run; each
//! flush is transactional, so an interrupted run leaves previously committed
//! batches durable and the database file non-corrupt.
//!
//! # Key Modules
//!
//! - [`schema`] -- Table/index creation, pragmas, post-load compaction
//! - [`extract`] -- Pure record-to-tuple extraction rules
//! - [`batch`] -- Row accumulator with transactional flush
//! - [`load`] -- Per-file streaming loop with id cursor threading
//! - [`langpair`] -- Language-pair allow-list for cross-references
//! - [`models`] -- Raw record views and output row types
//! - [`config`] -- Constants for batching and progress reporting
//!
//! # Example Usage
//!
//! ```bash
//! # Build a bilingual dictionary from English and Spanish dumps
//! lexica --en kaikki-en.jsonl --es kaikki-es.jsonl -o dictionary.db
//!
//! # A single language is fine too
//! lexica --en kaikki-en.jsonl
//! ```

pub mod batch;
pub mod config;
pub mod extract;
pub mod langpair;
pub mod load;
pub mod models;
pub mod schema;
