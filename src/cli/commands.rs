use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::filters::counting::{CountPattern, collect_files, count_matches, totals};
use crate::filters::{
    DisabledStore, Filter, FilterFlags, FilterRequest, FilterStore, OptionalDefinition,
    UpdateRequest,
};
use crate::logging::{self, LogConfig};
use crate::storage::{load_store, save_store};
use crate::tui::run_interactive;
use crate::utils::{STORE_ENV, default_store_path, log_file_path};

#[derive(Parser)]
#[command(name = "log-filters")]
#[command(version)]
#[command(about = "Manage search filters for log files", long_about = None)]
pub struct Cli {
    /// Store file holding the filters
    #[arg(long, global = true, env = STORE_ENV)]
    pub store: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a pattern is a valid regular expression
    Check { pattern: String },
    /// List filters and disabled entities
    List,
    /// Add a filter
    Add(AddArgs),
    /// Remove a filter or disabled entity by uuid or pattern
    Remove { target: String },
    /// Activate or deactivate a filter by uuid or pattern
    Toggle { target: String },
    /// Count matches of every active filter in files or directories
    Count {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Open the terminal UI
    Browse {
        /// Log file searched by "show matches"
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct AddArgs {
    pub pattern: String,
    /// Case-sensitive matching
    #[arg(long)]
    pub cases: bool,
    /// Whole-word matching
    #[arg(long)]
    pub word: bool,
    /// Treat the pattern as a regular expression
    #[arg(long)]
    pub reg: bool,
    /// Add the filter switched off
    #[arg(long)]
    pub inactive: bool,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let store = match cli.store {
        Some(store) => store,
        None => default_store_path()?,
    };

    let mut log_config = LogConfig::from_verbosity(cli.verbose);
    if matches!(cli.command, Commands::Browse { .. }) {
        log_config = log_config.to_file(log_file_path(&store));
    }
    logging::init(&log_config)?;
    debug!(store = %store.display(), "using store");

    match cli.command {
        Commands::Check { pattern } => {
            return Ok(match check_pattern(&pattern) {
                None => {
                    println!("valid");
                    ExitCode::SUCCESS
                }
                Some(error) => {
                    println!("{error}");
                    ExitCode::FAILURE
                }
            });
        }
        Commands::List => list(&store)?,
        Commands::Add(args) => add(&store, args)?,
        Commands::Remove { target } => remove(&store, &target)?,
        Commands::Toggle { target } => toggle(&store, &target)?,
        Commands::Count { paths } => count(&store, &paths)?,
        Commands::Browse { log } => run_interactive(&store, log)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// `None` when `pattern` can be added as a regex filter, otherwise the reason
fn check_pattern(pattern: &str) -> Option<String> {
    let flags = FilterFlags::new(false, false, true);
    FilterRequest::new(Filter::new(pattern, flags).into()).err().map(|err| err.to_string())
}

fn open(store: &Path) -> Result<(FilterStore, DisabledStore)> {
    let loaded = load_store(store)
        .with_context(|| format!("Failed to load filters from {}", store.display()))?;
    Ok(loaded.map_or_else(
        || (FilterStore::new(), DisabledStore::new()),
        |loaded| (loaded.filters, loaded.disabled),
    ))
}

fn save(store: &Path, filters: &FilterStore, disabled: &DisabledStore) -> Result<()> {
    save_store(store, filters, disabled)
        .with_context(|| format!("Failed to save filters to {}", store.display()))
}

fn flag_letters(flags: &FilterFlags) -> String {
    [(flags.cases, 'c'), (flags.word, 'w'), (flags.reg, 'r')]
        .iter()
        .map(|&(on, letter)| if on { letter } else { '-' })
        .collect()
}

fn list(store: &Path) -> Result<()> {
    let (filters, disabled) = open(store)?;

    println!("Filters ({}):", filters.len());
    for filter in filters.get() {
        let definition = filter.definition();
        println!(
            "  [{}] {:<32} {}  {}",
            if definition.active { "x" } else { " " },
            definition.filter.filter,
            flag_letters(&definition.filter.flags),
            definition.uuid
        );
    }
    println!("Disabled ({}):", disabled.len());
    for request in disabled.get() {
        println!("  ({}) {:<32} {}", request.icon(), request.display_name(), request.uuid());
    }
    Ok(())
}

fn add(store: &Path, args: AddArgs) -> Result<()> {
    let (mut filters, disabled) = open(store)?;
    let flags = FilterFlags::new(args.cases, args.word, args.reg);
    let request = FilterRequest::new(OptionalDefinition {
        filter: Filter::new(args.pattern, flags),
        active: Some(!args.inactive),
        ..Default::default()
    })?;
    let uuid = request.uuid().to_string();
    filters.add(request);
    save(store, &filters, &disabled)?;
    println!("{uuid}");
    Ok(())
}

/// Uuid of the first filter whose uuid or pattern equals `target`
fn resolve_filter(filters: &FilterStore, target: &str) -> Option<String> {
    filters
        .get()
        .iter()
        .find(|filter| filter.uuid() == target || filter.definition().filter.filter == target)
        .map(|filter| filter.uuid().to_string())
}

fn remove(store: &Path, target: &str) -> Result<()> {
    let (mut filters, mut disabled) = open(store)?;
    let removed = if let Some(uuid) = resolve_filter(&filters, target) {
        let removed = filters.delete(&[uuid]);
        removed.iter().map(|filter| filter.definition().filter.filter.clone()).collect::<Vec<_>>()
    } else {
        let uuid = disabled
            .get()
            .iter()
            .find(|request| request.uuid() == target || request.display_name() == target)
            .map(|request| request.uuid().to_string());
        match uuid {
            Some(uuid) => disabled.delete(&[uuid]).iter().map(|request| request.display_name()).collect(),
            None => bail!("No filter or disabled entity matches '{target}'"),
        }
    };
    save(store, &filters, &disabled)?;
    for name in removed {
        println!("Removed {name}");
    }
    Ok(())
}

fn toggle(store: &Path, target: &str) -> Result<()> {
    let (mut filters, disabled) = open(store)?;
    let Some(uuid) = resolve_filter(&filters, target) else {
        bail!("No filter matches '{target}'");
    };
    let active = filters.find(&uuid).is_some_and(|filter| filter.is_active());
    filters.update(&uuid, UpdateRequest { active: Some(!active), ..Default::default() })?;
    save(store, &filters, &disabled)?;
    println!("{} {}", if active { "Deactivated" } else { "Activated" }, target);
    Ok(())
}

fn count(store: &Path, paths: &[PathBuf]) -> Result<()> {
    let (filters, _) = open(store)?;
    let patterns: Vec<CountPattern> = filters.active().map(CountPattern::from).collect();
    if patterns.is_empty() {
        bail!("No active filters to count");
    }

    let files = collect_files(paths);
    if files.is_empty() {
        bail!("No files found");
    }
    let results = count_matches(&files, &patterns);
    for result in &results {
        if let Some(error) = &result.error {
            warn!(path = %result.path.display(), %error, "file skipped");
            eprintln!("Skipped {}: {error}", result.path.display());
        }
    }

    for (pattern, total) in patterns.iter().zip(totals(&results, patterns.len())) {
        println!("{total:>10}  {}", pattern.label);
    }
    Ok(())
}
