//! Combo Resolver - Main entry point
//!
//! Loads a catalog snapshot, runs one resolver query and prints the answer on
//! stdout. Logs go to stderr.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use combo_resolver::cli::{Cli, Commands};
use combo_resolver::{
    ComboResolver, ComboStatus, OptionId, ProductCatalog, ResolverConfig, Selection,
};

/// Exit code for a well-formed selection that matches no combo
const EXIT_UNAVAILABLE: u8 = 2;

/// Initialize the logger; RUST_LOG overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            // Both go to stderr; print directly only when the log line is filtered out
            if tracing::enabled!(Level::ERROR) {
                error!("{:#}", e);
            } else {
                eprintln!("✗ {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = ResolverConfig::resolve(cli.config.as_deref())?;
    debug!(?config, "resolver config");

    match &cli.command {
        Commands::Validate { catalog } => {
            info!("Validating catalog file: {:?}", catalog);
            let catalog = load_catalog(catalog)?;
            let resolver = ComboResolver::with_config(&catalog, config);
            let audit = resolver.audit();
            let orphaned = audit
                .iter()
                .filter(|a| a.status == ComboStatus::Orphaned)
                .count();

            println!(
                "✓ Catalog for product {} is valid: {} types, {} options, {} combos ({} orphaned)",
                catalog.product_id,
                catalog.types.len(),
                catalog.options.len(),
                catalog.combos.len(),
                orphaned
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Available {
            catalog,
            type_index,
            option,
            pick,
        } => {
            let catalog = load_catalog(catalog)?;
            let resolver = ComboResolver::with_config(&catalog, config);
            let selection = Selection::from_picks(pick.iter().copied());
            let available =
                resolver.is_option_available(&selection, *type_index, OptionId(*option))?;
            println!("{}", available);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Options {
            catalog,
            type_index,
            pick,
        } => {
            let catalog = load_catalog(catalog)?;
            let resolver = ComboResolver::with_config(&catalog, config);
            let selection = Selection::from_picks(pick.iter().copied());
            let states = resolver.option_states(&selection, *type_index)?;
            println!("{}", serde_json::to_string_pretty(&states)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Price { catalog, options } => {
            let catalog = load_catalog(catalog)?;
            let resolver = ComboResolver::with_config(&catalog, config);
            let ids: Vec<OptionId> = options.iter().copied().map(OptionId).collect();

            let priced = Selection::from_option_ids(&catalog.types, &catalog.options, &ids)
                .and_then(|selection| resolver.price_for_selection(&selection));

            match priced {
                Ok(price) => {
                    println!("{}", price);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) if e.is_recoverable() => {
                    info!("{}", e);
                    eprintln!("✗ Selected combination unavailable, pick a different one");
                    Ok(ExitCode::from(EXIT_UNAVAILABLE))
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Propose { catalog, choose } => {
            let catalog = load_catalog(catalog)?;
            let resolver = ComboResolver::with_config(&catalog, config);
            let proposed = resolver.expand_potential_combos(choose)?;
            info!("{} combos can be registered", proposed.len());
            println!("{}", serde_json::to_string_pretty(&proposed)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Audit { catalog } => {
            let catalog = load_catalog(catalog)?;
            let resolver = ComboResolver::with_config(&catalog, config);
            println!("{}", serde_json::to_string_pretty(&resolver.audit())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load and validate a catalog snapshot
fn load_catalog(path: &Path) -> Result<ProductCatalog> {
    info!("Loading catalog from: {:?}", path);
    let catalog = ProductCatalog::load_from_file(path)?;
    catalog.validate()?;
    Ok(catalog)
}
