use anyhow::{bail, Context, Result};
use clap::Parser;
use lexica::langpair::LanguagePairs;
use lexica::load::{self, FileReport, IdCursors};
use lexica::schema;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "lexica")]
#[command(about = "Convert Wiktionary JSONL dumps into a SQLite dictionary database")]
struct Cli {
    /// Path to the English Wiktionary JSONL file
    #[arg(long)]
    en: Option<PathBuf>,

    /// Path to the Spanish Wiktionary JSONL file
    #[arg(long)]
    es: Option<PathBuf>,

    /// Output SQLite database path
    #[arg(short, long, default_value = lexica::config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Entries per transactional batch
    #[arg(long, default_value_t = lexica::config::BATCH_SIZE)]
    batch_size: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run_convert(args: Cli) -> Result<()> {
    if args.en.is_none() && args.es.is_none() {
        bail!("At least one of --en or --es must be provided");
    }

    let inputs: Vec<(&str, &PathBuf)> = [("en", &args.en), ("es", &args.es)]
        .into_iter()
        .filter_map(|(lang, path)| path.as_ref().map(|p| (lang, p)))
        .collect();

    // All validation happens before any storage mutation
    for (lang, path) in &inputs {
        if !path.exists() {
            bail!("{} file not found: {}", lang, path.display());
        }
    }

    if args.output.exists() {
        info!(path = %args.output.display(), "Removing existing database");
        fs::remove_file(&args.output).with_context(|| {
            format!("Failed to remove existing database: {}", args.output.display())
        })?;
    }

    info!(path = %args.output.display(), "Creating database");
    let mut conn = Connection::open(&args.output)
        .with_context(|| format!("Failed to create database: {}", args.output.display()))?;
    schema::apply_pragmas(&conn)?;
    schema::init_schema(&conn)?;

    let pairs = LanguagePairs::bilingual("en", "es");
    let mut cursors = IdCursors::new();
    let mut totals = FileReport::default();
    let start = Instant::now();

    for (lang, path) in &inputs {
        println!("Processing {} ({})...", path.display(), lang);
        let (next, report) =
            load::process_file(&mut conn, path, lang, &pairs, args.batch_size, cursors)?;
        cursors = next;
        totals.merge(&report);
        println!("  Completed: {} entries", report.entries);
    }

    schema::optimize(&conn)?;
    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close database")?;
    let duration = start.elapsed();

    let size_bytes = fs::metadata(&args.output)
        .with_context(|| format!("Failed to stat output file: {}", args.output.display()))?
        .len();

    println!();
    println!("=== Summary ===");
    println!("Total time:        {:.2}s", duration.as_secs_f64());
    println!();
    println!("Entries loaded:    {}", totals.entries);
    println!("Definitions:       {}", totals.definitions);
    println!("Cross-references:  {}", totals.cross_refs);
    println!("Lines skipped:     {}", totals.skipped_lines);
    println!(
        "Database size:     {:.1} MB ({})",
        size_bytes as f64 / (1024.0 * 1024.0),
        args.output.display()
    );

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Warnings go to stderr; the progress and summary output owns stdout.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    match run_convert(cli) {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
