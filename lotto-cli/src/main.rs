mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::display::{
    display_draws, display_gaps, display_import_summary, display_intervals, display_ranges,
    display_report,
};
use lotto_db::db::{
    count_draws, db_path, fetch_draw, fetch_window, fetch_window_until, migrate, open_db,
};
use lotto_db::rusqlite::Connection;
use lotto_insight::appearance::{build_appearance_map, current_gaps};
use lotto_insight::config::InsightConfig;
use lotto_insight::interval::{build_interval_ensemble, ScoredItem};
use lotto_insight::key::encode;
use lotto_insight::report::InsightReport;
use lotto_insight::stats::{hot_numbers, last_overlap, range_stats};

#[derive(Parser)]
#[command(name = "lotto", about = "6/45 draw statistics and insights")]
struct Cli {
    /// JSON file with insight settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import draws from a JSON or CSV file in the results API format
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the database path
    DbPath,

    /// List the latest draws
    List {
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Range counts, hot numbers and overlap of the latest draws
    Stats {
        #[arg(short, long)]
        window: Option<usize>,

        /// Number of hot numbers to show
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Rounds since each number last appeared
    Gaps {
        /// Base round (defaults to the latest stored round)
        #[arg(short, long)]
        base_round: Option<u32>,

        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Average scores of scored numbers grouped into intervals
    Intervals {
        /// JSON array of {"value": n, "score": x}
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        size: Option<u32>,

        /// Order by descending average score
        #[arg(long)]
        sort: bool,
    },

    /// Full insight report over the latest draws
    Insight {
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Print the stable request key of a JSON parameter object
    Key { params: String },

    /// Write the effective settings to a JSON file
    InitConfig {
        #[arg(short, long, default_value = "lotto.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = match &cli.config {
        Some(path) => InsightConfig::load(path)?,
        None => InsightConfig::default(),
    };

    match cli.command {
        Command::Import { file } => cmd_import(&open_store()?, &file),
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
        Command::List { last } => cmd_list(&open_store()?, last),
        Command::Stats { window, top } => {
            config.window = window.unwrap_or(config.window);
            config.hot_top_n = top.unwrap_or(config.hot_top_n);
            cmd_stats(&open_store()?, &config)
        }
        Command::Gaps { base_round, window } => {
            config.window = window.unwrap_or(config.window);
            cmd_gaps(&open_store()?, base_round, &config)
        }
        Command::Intervals { file, size, sort } => {
            cmd_intervals(&file, size.unwrap_or(config.interval_size), sort)
        }
        Command::Insight { window } => {
            config.window = window.unwrap_or(config.window);
            cmd_insight(&open_store()?, &config)
        }
        Command::Key { params } => cmd_key(&params),
        Command::InitConfig { output } => {
            config.save(&output)?;
            println!("Settings written to {}", output.display());
            Ok(())
        }
    }
}

fn open_store() -> Result<Connection> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    Ok(conn)
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_file(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn load_window(conn: &Connection, window: usize) -> Result<Option<Vec<lotto_db::models::Draw>>> {
    if count_draws(conn)? == 0 {
        println!("Empty database. Run first: lotto import --file <draws.json>");
        return Ok(None);
    }
    if window == 0 {
        bail!("Window must be at least 1");
    }
    let limit = u32::try_from(window).context("Window too large")?;
    Ok(Some(fetch_window(conn, limit)?))
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if let Some(mut draws) = load_window(conn, last as usize)? {
        draws.reverse();
        display_draws(&draws);
    }
    Ok(())
}

fn cmd_stats(conn: &Connection, config: &InsightConfig) -> Result<()> {
    let Some(draws) = load_window(conn, config.window)? else {
        return Ok(());
    };

    println!("\nStatistics over the last {} draws\n", draws.len());
    display_ranges(&range_stats(&draws));
    let hot: Vec<String> = hot_numbers(&draws, config.hot_top_n)
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!("\nHot numbers : {}", hot.join(", "));
    if let Some(overlap) = last_overlap(&draws) {
        println!("Overlap with previous draw : {}", overlap);
    }
    Ok(())
}

fn cmd_gaps(conn: &Connection, base_round: Option<u32>, config: &InsightConfig) -> Result<()> {
    let Some(latest) = load_window(conn, config.window)? else {
        return Ok(());
    };

    let (base, draws) = match base_round {
        Some(round) => {
            if fetch_draw(conn, round)?.is_none() {
                log::warn!("Round {} is not stored; gaps are computed anyway", round);
            }
            let limit = u32::try_from(config.window).context("Window too large")?;
            (round, fetch_window_until(conn, round, limit)?)
        }
        None => match latest.last().map(|d| d.round) {
            Some(round) => (round, latest),
            None => return Ok(()),
        },
    };

    let map = build_appearance_map(&draws);
    display_gaps(&current_gaps(base, &map), base);
    Ok(())
}

fn cmd_insight(conn: &Connection, config: &InsightConfig) -> Result<()> {
    config.validate()?;
    let Some(draws) = load_window(conn, config.window)? else {
        return Ok(());
    };
    let report = InsightReport::compute(&draws, config);
    display_report(&report);
    Ok(())
}

fn cmd_intervals(file: &Path, size: u32, sort: bool) -> Result<()> {
    let json = std::fs::read_to_string(file).with_context(|| format!("Cannot open {:?}", file))?;
    let items: Vec<ScoredItem> =
        serde_json::from_str(&json).with_context(|| format!("Invalid scored items in {:?}", file))?;
    let buckets = build_interval_ensemble(&items, size, sort)?;
    display_intervals(&buckets);
    Ok(())
}

fn cmd_key(params: &str) -> Result<()> {
    let value: Value = serde_json::from_str(params).context("Parameters must be valid JSON")?;
    println!("{}", encode(&value));
    Ok(())
}
