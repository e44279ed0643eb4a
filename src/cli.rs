use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_ENV_VAR;
use crate::selection::Pick;
use crate::types::{OptionId, VariantTypeId};

/// Combo Resolver - variant availability and pricing for storefront products
#[derive(Parser)]
#[command(name = "combo-resolver")]
#[command(about = "Answer option availability, combo price and combo authoring questions for a product snapshot")]
#[command(version)]
pub struct Cli {
    /// Resolver config file (JSON). Falls back to $COMBO_RESOLVER_CONFIG, then defaults.
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Log resolver decisions at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a catalog snapshot and summarize combo health
    Validate {
        /// Path to catalog file
        catalog: PathBuf,
    },
    /// Is an option selectable next?
    Available {
        /// Path to catalog file
        catalog: PathBuf,
        /// Display position of the type being evaluated
        #[arg(short, long)]
        type_index: usize,
        /// Candidate option id
        #[arg(short, long)]
        option: u64,
        /// Earlier picks as TYPE=OPTION
        #[arg(short, long, value_parser = parse_pick)]
        pick: Vec<Pick>,
    },
    /// List every option of a type with its availability
    Options {
        /// Path to catalog file
        catalog: PathBuf,
        /// Display position of the type
        #[arg(short, long)]
        type_index: usize,
        /// Earlier picks as TYPE=OPTION
        #[arg(short, long, value_parser = parse_pick)]
        pick: Vec<Pick>,
    },
    /// Price a complete selection
    Price {
        /// Path to catalog file
        catalog: PathBuf,
        /// Selected option ids (any order)
        #[arg(short, long = "option", required = true)]
        options: Vec<u64>,
    },
    /// Propose combos not yet registered
    Propose {
        /// Path to catalog file
        catalog: PathBuf,
        /// Options to include per type as TYPE=OPT[,OPT...]
        #[arg(short, long, value_parser = parse_choice)]
        choose: Vec<(VariantTypeId, Vec<OptionId>)>,
    },
    /// Report every combo with its status and allowed admin actions
    Audit {
        /// Path to catalog file
        catalog: PathBuf,
    },
}

/// Parse `TYPE=OPTION`
pub fn parse_pick(s: &str) -> Result<Pick, String> {
    let (ty, opt) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=OPTION, got '{}'", s))?;
    let type_id = parse_id(ty)?;
    let option_id = parse_id(opt)?;
    Ok(Pick::new(VariantTypeId(type_id), OptionId(option_id)))
}

/// Parse `TYPE=OPT[,OPT...]`; an empty option list is allowed
pub fn parse_choice(s: &str) -> Result<(VariantTypeId, Vec<OptionId>), String> {
    let (ty, opts) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=OPT[,OPT...], got '{}'", s))?;
    let options = opts
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| parse_id(o).map(OptionId))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((VariantTypeId(parse_id(ty)?), options))
}

fn parse_id(s: &str) -> Result<u64, String> {
    s.trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid id '{}': {}", s.trim(), e))
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
