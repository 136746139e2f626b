use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use jobsift::{db, dedupe, stats, AppConfig, Pipeline, TermUnifier, View, VocabularyStore};

#[derive(Parser)]
#[command(name = "jobsift", about = "Structured extraction from job-ad emails")]
struct Cli {
    /// Config file layered over cfg/default and JOBSIFT_* env vars
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    /// Cleaned paragraph blocks
    Payload,
    /// Configured body sections
    Body,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Payload => View::Payload,
            ViewArg::Body => View::Body,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, unify and dedupe all ingested emails
    Run {
        #[arg(long, value_enum, default_value = "payload")]
        view: ViewArg,
        /// Max emails to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print and persist the stats report for the current job_info table
    Stats,
    /// Export the structured table as JSON lines
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    info!(vocab_dir = ?cfg.vocab_dir, msg = "Configuration loaded");

    match cli.command {
        Commands::Run { view, limit } => run(&cfg, view.into(), limit),
        Commands::Stats => print_stats(&cfg),
        Commands::Export { output } => export(output.as_deref()),
    }
}

fn run(cfg: &AppConfig, view: View, limit: Option<usize>) -> Result<()> {
    println!("Jobsift Email Extraction");
    println!("========================\n");

    // vocabulary problems are fatal before any record is touched
    let vocab = VocabularyStore::load(&cfg.vocab_dir)?;

    println!("Database: {:?}\n", db::path());
    let conn = db::connect()?;
    db::create_tables(&conn)?;

    let records = db::fetch_records(&conn, limit)?;
    println!("Loaded {} emails\n", records.len());
    if records.is_empty() {
        return Ok(());
    }

    let pipeline = Pipeline::new(cfg, &vocab);

    println!("Pass 1: extract fields");
    let mut table = pipeline.process(&records, view);
    println!("  -> {} rows\n", table.len());

    println!("Pass 2: unify terms");
    TermUnifier::new(&vocab).unify(&mut table);

    println!("Pass 3: dedupe");
    let table = dedupe(table);
    println!("  -> {} rows\n", table.len());

    let written = db::write_table(&conn, &table)?;
    println!("Wrote {} rows to job_info", written);

    println!("\nDone.");
    Ok(())
}

fn print_stats(cfg: &AppConfig) -> Result<()> {
    let vocab = VocabularyStore::load(&cfg.vocab_dir)?;
    let conn = db::connect()?;
    db::create_tables(&conn)?;

    let table = db::fetch_table(&conn)?;
    if table.is_empty() {
        println!("No job_info rows; run the pipeline first.");
        return Ok(());
    }

    let markdown = stats::render_markdown(&table, &vocab.skill_categories);
    stats::persist_stats(&conn, &table, &vocab.skill_categories, &markdown)?;
    println!("{markdown}");
    Ok(())
}

fn export(output: Option<&std::path::Path>) -> Result<()> {
    let conn = db::connect()?;
    db::create_tables(&conn)?;
    let table = db::fetch_table(&conn)?;

    let mut lines = String::new();
    for row in &table {
        lines.push_str(&serde_json::to_string(row)?);
        lines.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, lines)?;
            println!("Exported {} rows to {:?}", table.len(), path);
        }
        None => {
            std::io::stdout().write_all(lines.as_bytes())?;
        }
    }
    Ok(())
}
