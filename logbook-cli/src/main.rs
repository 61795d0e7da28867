//! logbook: aggregate a markdown learning journal into a single overview
//!
//! Walks the journal root for week logs and exercise scripts, merges every
//! day entry into one timeline and renders it as markdown or JSON.
//!
//! # Subcommands
//! - `overview [--format markdown|json] [--output <file>]`   full pipeline
//! - `parse <file> [--json]`                                 entries of one log
//! - `conflicts`                                             duplicate days and range warnings
//! - `exercises [--json]`                                    exercise script catalog

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use logbook_core::config::DEFAULT_CONFIG_FILE;
use logbook_core::models::{Exercise, Overview, WeekLog};
use logbook_core::{
    parse_week_log, render_json, render_markdown, LogbookConfig, OutputFormat, RenderOptions,
};
use logbook_ingest::{build_overview, discover, load_exercises};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "logbook",
    version,
    about = "Aggregate markdown learning-journal logs into a single overview"
)]
struct Cli {
    /// Config file (TOML); a missing file means built-in defaults
    #[arg(long, env = "LOGBOOK_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Journal root directory (overrides journal.root)
    #[arg(long)]
    root: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the merged overview of every week log
    Overview {
        /// Output format (overrides render.format)
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a single markdown log and print its entries
    Parse {
        /// Markdown file to parse
        file: PathBuf,

        /// Print the parsed week log as JSON
        #[arg(long)]
        json: bool,
    },

    /// List duplicate day entries and days logged in the wrong week
    Conflicts,

    /// List exercise scripts with their day, week and title
    Exercises {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Json => OutputFormat::Json,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn do_overview(
    config: &LogbookConfig,
    format: Option<Format>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let overview = build_overview(config)?;
    let format = format.map(OutputFormat::from).unwrap_or(config.render.format);

    let rendered = match format {
        OutputFormat::Markdown => render_markdown(&overview, &RenderOptions::from(&config.render)),
        OutputFormat::Json => render_json(&overview)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, ensure_newline(rendered))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote overview to {}", path.display());
        }
        None => print!("{}", ensure_newline(rendered)),
    }
    Ok(())
}

fn do_parse(file: &Path, json: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let document = String::from_utf8_lossy(&bytes);
    let source = file.to_string_lossy().replace('\\', "/");
    let log = parse_week_log(&source, &document);

    if json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        print!("{}", describe_week_log(&log));
    }
    Ok(())
}

fn do_conflicts(config: &LogbookConfig) -> anyhow::Result<()> {
    let overview = build_overview(config)?;
    print!("{}", describe_conflicts(&overview));
    Ok(())
}

fn do_exercises(config: &LogbookConfig, json: bool) -> anyhow::Result<()> {
    let root = config.journal.root_path();
    let found = discover(&root, config)?;
    let exercises = load_exercises(&root, &found.exercises);

    if json {
        println!("{}", serde_json::to_string_pretty(&exercises)?);
    } else {
        print!("{}", describe_exercises(&exercises));
    }
    Ok(())
}

// ============================================================================
// Text Output
// ============================================================================

fn describe_week_log(log: &WeekLog) -> String {
    let mut out = Vec::new();
    let week = if log.week == 0 {
        "?".to_string()
    } else {
        log.week.to_string()
    };
    out.push(format!("Week {} ({})", week, log.source));
    if let Some(focus) = &log.focus {
        out.push(format!("Focus: {}", focus));
    }
    for win in &log.key_wins {
        out.push(format!("Win: {}", win));
    }

    for entry in &log.entries {
        let day = entry
            .day
            .map(|d| format!("Day {}", d))
            .unwrap_or_else(|| "Day ?".to_string());
        let date = entry
            .date
            .map(|d| format!(" [{}]", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        out.push(format!("{}{}: {}", day, date, entry.title));
        for topic in &entry.topics {
            out.push(format!("  - {}", topic));
        }
        for link in &entry.links {
            out.push(format!("  -> {} ({})", link.label, link.target));
        }
    }

    out.push(String::new());
    out.join("\n")
}

fn describe_conflicts(overview: &Overview) -> String {
    if overview.conflicts.is_empty() && overview.range_warnings.is_empty() {
        return "No conflicts.\n".to_string();
    }

    let mut out = Vec::new();
    for conflict in &overview.conflicts {
        out.push(format!(
            "Day {}: {} -> kept {}",
            conflict.day,
            conflict.sources.join(", "),
            conflict.winner
        ));
    }
    for warning in &overview.range_warnings {
        out.push(format!(
            "Day {} in {} is outside week {}",
            warning.day, warning.source, warning.week
        ));
    }
    out.push(String::new());
    out.join("\n")
}

fn describe_exercises(exercises: &[Exercise]) -> String {
    if exercises.is_empty() {
        return "No exercises found.\n".to_string();
    }

    let cell = |n: Option<u32>| n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    let mut out: Vec<String> = exercises
        .iter()
        .map(|e| {
            format!(
                "day {:>3}  week {:>2}  {}  ({})",
                cell(e.day),
                cell(e.week),
                e.title,
                e.path
            )
        })
        .collect();
    out.push(String::new());
    out.join("\n")
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

// ============================================================================
// Main
// ============================================================================

fn load_config(cli: &Cli) -> anyhow::Result<LogbookConfig> {
    let mut config = LogbookConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    if let Some(root) = &cli.root {
        config.journal.root = root.clone();
    }
    Ok(config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config: LogbookConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Overview { format, output } => do_overview(&config, format, output.as_deref()),
        Commands::Parse { file, json } => do_parse(&file, json),
        Commands::Conflicts => do_conflicts(&config),
        Commands::Exercises { json } => do_exercises(&config, json),
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("logbook: {:#}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.logging.level);

    if let Err(e) = run(cli, config) {
        eprintln!("logbook: {:#}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
