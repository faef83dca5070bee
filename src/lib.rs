//! Wildreid - animal re-identification by retrieval and local-match fusion.
//!
//! Query images are matched against a labeled gallery by global embedding
//! similarity, the best candidates are re-scored by a local keypoint matcher,
//! and the fused score decides between a known identity and a new individual.

#![warn(missing_docs)]

pub mod calibration;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod output;
pub mod pipeline;

use clap::Parser;
use cli::{Cli, Command, IdentifyArgs};
use config::{
    Config, config_file_path, load_default_config, resolve_config_path, save_default_config,
    validate_config,
};
use dataset::load_metadata;
use embedding::{EmbeddingStore, PrecomputedExtractor, extract_normalized};
use engine::{EngineConfig, Gallery, RetrievalEngine};
use matcher::{DisabledLocalMatcher, LocalMatcher, PrecomputedLocalMatcher};
use pipeline::{Partition, calibration_subset, group_queries, partition, process_group};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for wildreid CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.identify.verbose, cli.identify.quiet);

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &cli.identify);
    }

    let config = load_default_config(cli.identify.config.as_deref())?;
    let config = merge_args(&cli.identify, config);
    validate_config(&config)?;

    let progress_enabled = !cli.identify.quiet && !cli.identify.no_progress;
    identify(&config, progress_enabled)
}

/// Overlay command-line options on the loaded configuration.
fn merge_args(args: &IdentifyArgs, mut config: Config) -> Config {
    if let Some(path) = &args.metadata {
        config.dataset.metadata = Some(path.clone());
    }
    if let Some(path) = &args.embeddings {
        config.dataset.embeddings = Some(path.clone());
    }
    if let Some(path) = &args.local_scores {
        config.dataset.local_scores = Some(path.clone());
    }
    if let Some(path) = &args.output {
        config.output.path.clone_from(path);
    }
    if let Some(alpha) = args.alpha {
        config.matching.alpha = alpha;
    }
    if let Some(k) = args.shortlist_size {
        config.matching.shortlist_size = k;
    }
    if let Some(threshold) = args.threshold {
        config.matching.threshold = threshold;
    }
    if args.no_query_expansion {
        config.matching.query_expansion = false;
    }
    if let Some(max_parallel) = args.max_parallel {
        config.matching.max_parallel = max_parallel;
    }
    if args.calibrate {
        config.calibration.enabled = true;
    }
    if let Some(size) = args.calibration_size {
        config.calibration.size = size;
    }
    config
}

/// Identify every query and write the submission file.
fn identify(config: &Config, progress_enabled: bool) -> Result<()> {
    use std::time::Instant;

    let total_start = Instant::now();

    let metadata_path = required_path(
        config.dataset.metadata.as_deref(),
        "metadata",
        "--metadata",
        "dataset.metadata",
    )?;
    let embeddings_path = required_path(
        config.dataset.embeddings.as_deref(),
        "embeddings",
        "--embeddings",
        "dataset.embeddings",
    )?;

    info!("Loading metadata: {}", metadata_path.display());
    let dataset = load_metadata(metadata_path)?;

    info!("Loading embeddings: {}", embeddings_path.display());
    let store = EmbeddingStore::load(embeddings_path)?;
    info!(
        "Loaded {} embeddings of dimension {}",
        store.len(),
        store.dim()
    );

    let dataset = store.retain_available(&dataset);
    let Partition { database, queries } = partition(&dataset);
    info!(
        "{} database images, {} query images",
        database.len(),
        queries.len()
    );

    let matcher = build_matcher(config)?;
    let extractor = PrecomputedExtractor::new(&store);

    let gallery_embeddings = extract_normalized(&extractor, &database)?;
    let gallery = Gallery::new(database, gallery_embeddings)?;
    if gallery.is_empty() {
        warn!("No database images available, every query group will be skipped");
    }

    let mut engine = RetrievalEngine::new(EngineConfig::from(&config.matching), gallery)?;

    if config.calibration.enabled {
        let subset = calibration_subset(engine.gallery().records(), config.calibration.size);
        info!("Fitting calibration on {} database records", subset.len());
        let subset_embeddings = extract_normalized(&extractor, &subset)?;
        let calibration =
            calibration::fit_calibration(&subset, &subset_embeddings, matcher.as_ref())?;
        engine = engine.with_calibration(calibration);
    }

    let groups = group_queries(&queries);
    info!("Processing {} species group(s)", groups.len());

    let mut predictions = Vec::with_capacity(queries.len());
    let mut new_individuals = 0;
    let mut matching_secs = 0.0;
    for (species, group) in &groups {
        let result = process_group(
            species,
            group,
            &engine,
            &extractor,
            matcher.as_ref(),
            progress_enabled,
        )?;
        new_individuals += result.new_individuals;
        matching_secs += result.duration_secs;
        predictions.extend(result.predictions);
    }

    output::write_submission(&config.output.path, &predictions)?;
    info!("Wrote submission: {}", config.output.path.display());

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} predictions, {} matched, {} new individuals in {:.2}s ({:.2}s matching)",
        predictions.len(),
        predictions.len() - new_individuals,
        new_individuals,
        total_duration,
        matching_secs
    );

    Ok(())
}

/// Local matcher for the configured score source.
fn build_matcher(config: &Config) -> Result<Box<dyn LocalMatcher>> {
    match &config.dataset.local_scores {
        Some(path) => {
            info!("Loading local scores: {}", path.display());
            let matcher = PrecomputedLocalMatcher::load(path)?;
            info!("Loaded {} local match scores", matcher.len());
            Ok(Box::new(matcher))
        }
        None if config.matching.alpha < 1.0 => Err(Error::ConfigValidation {
            message: format!(
                "alpha {} needs local scores (use --local-scores, or --alpha 1 for global only)",
                config.matching.alpha
            ),
        }),
        None => Ok(Box::new(DisabledLocalMatcher)),
    }
}

fn required_path<'a>(
    path: Option<&'a Path>,
    what: &str,
    flag: &str,
    key: &str,
) -> Result<&'a Path> {
    path.ok_or_else(|| Error::ConfigValidation {
        message: format!("no {what} file specified (use {flag} or set {key} in config)"),
    })
}

/// Initialize the tracing subscriber.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Handle subcommands.
fn handle_command(command: Command, args: &IdentifyArgs) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action, args.config.as_deref()),
        Command::Species { metadata } => handle_species_command(metadata, args.config.as_deref()),
    }
}

fn handle_config_command(action: cli::ConfigAction, explicit: Option<&Path>) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  set dataset.metadata and dataset.embeddings, then run wildreid");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config(explicit)?;
            validate_config(&config)?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = resolve_config_path(explicit)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_species_command(metadata: Option<PathBuf>, explicit: Option<&Path>) -> Result<()> {
    let path = match metadata {
        Some(path) => path,
        None => {
            let config = load_default_config(explicit)?;
            required_path(
                config.dataset.metadata.as_deref(),
                "metadata",
                "--metadata",
                "dataset.metadata",
            )?
            .to_path_buf()
        }
    };

    let dataset = load_metadata(&path)?;
    let summaries = cli::species::summarize_species(&dataset);
    print!("{}", cli::species::format_species_summary(&summaries));
    Ok(())
}
