// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use catalog_maint::app_config::{self, Config};
use catalog_maint::record_filter::MatchMode;
use catalog_maint::{report, Controller};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for MatchMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMatchMode {
    Either,
    Both,
    Source,
    Target,
}

impl From<CliMatchMode> for MatchMode {
    fn from(cli_mode: CliMatchMode) -> Self {
        match cli_mode {
            CliMatchMode::Either => MatchMode::Either,
            CliMatchMode::Both => MatchMode::Both,
            CliMatchMode::Source => MatchMode::Source,
            CliMatchMode::Target => MatchMode::Target,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Remove conversions of the given categories from the catalog
    Prune(PruneArgs),

    /// Merge a localized payload into the per-locale translation files
    Merge(MergeArgs),

    /// Generate shell completions for catalog-maint
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct PruneArgs {
    /// Catalog files to prune (defaults to the configured catalogs)
    #[arg(value_name = "CATALOG")]
    catalogs: Vec<PathBuf>,

    /// Category to remove; repeat for several (e.g. -c video -c audio)
    #[arg(short = 'c', long = "category")]
    categories: Vec<String>,

    /// Which side of a conversion has to match a removed category
    #[arg(short, long, value_enum)]
    mode: Option<CliMatchMode>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not copy files aside before rewriting them
    #[arg(long)]
    no_backup: bool,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// JSON file mapping locale keys to fragments
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Directory holding one JSON file per locale
    #[arg(short = 'd', long)]
    locales_dir: Option<PathBuf>,

    /// Top-level field the fragments are written to
    #[arg(short, long)]
    field: Option<String>,

    /// Only merge these locales; repeat for several
    #[arg(short = 'l', long = "locale")]
    locales: Vec<String>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not copy files aside before rewriting them
    #[arg(long)]
    no_backup: bool,
}

/// catalog-maint - maintenance for the converter's JSON data files
#[derive(Parser, Debug)]
#[command(name = "catalog-maint")]
#[command(version)]
#[command(about = "Prune the conversion catalog and merge locale strings")]
#[command(long_about = "catalog-maint edits the JSON data files of the converter frontend.

EXAMPLES:
    catalog-maint prune                              # Remove configured categories
    catalog-maint prune -c video                     # Remove every video conversion
    catalog-maint prune -c video --mode both -n      # Preview removing video → video only
    catalog-maint merge                              # Merge locale-payload.json into frontend/locales
    catalog-maint merge -p modal.json -f modal       # Use a specific payload and field
    catalog-maint merge -l ja -l zh                  # Only touch two locales
    catalog-maint completions bash > catalog-maint.bash

CONFIGURATION:
    Configuration is read from conf.json by default. If it doesn't exist, built-in
    defaults are used. A file given with --config must exist.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (default: conf.json)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("⚠️ ", "1;33"),
            Level::Info => ("  ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, colour) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Info until the config is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "catalog-maint", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Prune(args) => run_prune(config, args),
        Commands::Merge(args) => run_merge(config, args),
        Commands::Completions { .. } => Ok(()),
    }
}

// @loads: Config, with the command line log level applied before reading it
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let cli_log_level = cli.log_level.clone().map(app_config::LogLevel::from);
    if let Some(log_level) = &cli_log_level {
        log::set_max_level(log_level.to_level_filter());
    }

    let mut config = match &cli.config_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(app_config::DEFAULT_CONFIG_PATH)?,
    };

    // Command line log level wins over the config
    if let Some(log_level) = cli_log_level {
        config.log_level = log_level;
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

fn run_prune(mut config: Config, args: PruneArgs) -> Result<()> {
    if !args.catalogs.is_empty() {
        config.catalog.paths = args.catalogs;
    }
    if !args.categories.is_empty() {
        config.catalog.remove_categories = args.categories;
    }
    if let Some(mode) = args.mode {
        config.catalog.match_mode = mode.into();
    }
    if args.no_backup {
        config.backup.enabled = false;
    }

    let controller = Controller::with_config(config)?;
    let run = controller.run_prune(args.dry_run);

    print!("{}", report::format_prune_run(&run));

    if !run.is_success() {
        return Err(anyhow!("{} catalog(s) could not be processed", run.failures.len()));
    }

    info!("Catalog maintenance finished");
    Ok(())
}

fn run_merge(mut config: Config, args: MergeArgs) -> Result<()> {
    if let Some(payload) = args.payload {
        config.locales.payload_path = payload;
    }
    if let Some(dir) = args.locales_dir {
        config.locales.dir = dir;
    }
    if let Some(field) = args.field {
        config.locales.target_field = field;
    }
    if args.no_backup {
        config.backup.enabled = false;
    }

    let controller = Controller::with_config(config)?;
    let run = controller.run_merge(&args.locales, args.dry_run)?;

    print!("{}", report::format_merge_run(&run));

    if !run.is_success() {
        return Err(anyhow!("{} locale document(s) could not be processed", run.failures.len()));
    }

    info!("Locale merge finished");
    Ok(())
}
