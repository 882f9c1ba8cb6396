// vacstat - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (platform directory or --config)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the listing, statistics or split flow

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vacstat::app::dataset::{self, Projection};
use vacstat::app::query::{self, ListingRequest};
use vacstat::app::report;
use vacstat::core::export;
use vacstat::core::listing::ListingWindow;
use vacstat::core::stats::compute_stats_with;
use vacstat::platform::config::{self, AppConfig, PlatformPaths};
use vacstat::util;
use vacstat::util::error::Result;

/// vacstat - job vacancy listings and salary statistics.
///
/// Reads a CSV export of vacancy postings and either prints a filtered,
/// sorted table or aggregates salary and volume series for a profession.
#[derive(Parser, Debug)]
#[command(name = "vacstat", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Configuration file to use instead of the platform default.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print vacancies as a table, optionally filtered and sorted.
    List {
        /// Vacancy CSV file.
        file: PathBuf,

        /// Filter expression, e.g. "Навыки: Git, SQL".
        #[arg(short = 'f', long = "filter")]
        filter: Option<String>,

        /// Field to sort by, e.g. "Оклад".
        #[arg(short = 's', long = "sort")]
        sort: Option<String>,

        /// Sort in descending order.
        #[arg(short = 'r', long = "reverse")]
        reverse: bool,

        /// First row number to show (1-based, inclusive).
        #[arg(long = "start", default_value_t = 1)]
        start: usize,

        /// Row number to stop before (exclusive).
        #[arg(long = "end")]
        end: Option<usize>,

        /// Comma-separated columns to show, e.g. "Название, Оклад".
        #[arg(long = "columns")]
        columns: Option<String>,

        /// Write the rows to a file (.json for JSON, CSV otherwise).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Aggregate salary and vacancy series by year and by area.
    Stats {
        /// Vacancy CSV file.
        file: PathBuf,

        /// Keyword selecting the profession series (substring of the title).
        #[arg(short = 'p', long = "profession")]
        profession: String,

        /// Directory for years.csv, areas.csv and stats.json.
        #[arg(short = 'o', long = "out-dir")]
        out_dir: Option<PathBuf>,
    },

    /// Split the file into one CSV per publication year.
    Split {
        /// Vacancy CSV file.
        file: PathBuf,

        /// Directory for the <year>.csv files.
        #[arg(short = 'o', long = "out-dir")]
        out_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its level can take effect; warnings
    // are held and reported once the subscriber exists.
    let (app_config, config_warnings) = match cli.config.as_deref() {
        Some(path) => match config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        },
        None => config::load_config(&PlatformPaths::resolve()),
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "vacstat starting"
    );

    if let Err(e) = run(cli.command, &app_config) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command, app_config: &AppConfig) -> Result<()> {
    match command {
        Command::List {
            file,
            filter,
            sort,
            reverse,
            start,
            end,
            columns,
            output,
        } => {
            let request = ListingRequest {
                filter,
                sort,
                descending: reverse,
                window: ListingWindow {
                    start: start.max(1),
                    end,
                },
                columns,
                max_cell_chars: app_config.max_cell_chars,
            };
            run_list(&file, &request, output.as_deref())
        }
        Command::Stats {
            file,
            profession,
            out_dir,
        } => run_stats(&file, &profession, out_dir.as_deref(), app_config),
        Command::Split { file, out_dir } => run_split(&file, &out_dir),
    }
}

fn run_list(file: &Path, request: &ListingRequest, output: Option<&Path>) -> Result<()> {
    let vacancies = dataset::load_csv(file, Projection::Full)?;
    let outcome = query::run_listing(&vacancies, request)?;

    if outcome.nothing_found() {
        println!("Nothing found");
        return Ok(());
    }
    let listing = outcome.listing;

    match output {
        Some(path) => {
            let writer = report::create(path)?;
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                export::export_json(&listing, writer, path)?;
            } else {
                export::export_listing_csv(&listing, writer, path)?;
            }
            tracing::info!(path = %path.display(), rows = listing.rows.len(), "Listing exported");
            println!("Wrote {} rows to {}", listing.rows.len(), path.display());
        }
        None => print!("{}", query::render_listing(&listing)),
    }
    Ok(())
}

fn run_stats(
    file: &Path,
    profession: &str,
    out_dir: Option<&Path>,
    app_config: &AppConfig,
) -> Result<()> {
    let vacancies = dataset::load_csv(file, Projection::Summary)?;
    let stats = compute_stats_with(&vacancies, profession, &app_config.stats)?;

    print!("{}", report::render_summary(&stats));

    if let Some(dir) = out_dir {
        let files = report::write_reports(&stats, dir)?;
        println!(
            "Wrote {}, {} and {}",
            files.years.display(),
            files.areas.display(),
            files.stats.display()
        );
    }
    Ok(())
}

fn run_split(file: &Path, out_dir: &Path) -> Result<()> {
    let files = dataset::split_by_year(file, out_dir)?;
    for year_file in &files {
        println!("{}: {} rows -> {}", year_file.year, year_file.rows, year_file.path.display());
    }
    Ok(())
}
