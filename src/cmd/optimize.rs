use super::LayoutArgs;
use crate::reports;
use clap::{ArgMatches, Args};
use gridforge::api;
use gridforge::config::Config;
use gridforge::error::GfResult;
use gridforge::optimizer::SilentProgress;
use gridforge::scorer::BigramTable;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Bigram CSV produced by `gridforge bigrams`
    #[arg(short, long)]
    pub bigrams: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// JSON config file; flags given on the command line take precedence
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Print the report as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(flatten)]
    pub config: Config,
}

/// Loads the file config (if any) and applies explicit command-line overrides.
pub fn resolve_config(
    config_file: &Option<PathBuf>,
    cli: &Config,
    matches: &ArgMatches,
) -> GfResult<Config> {
    match config_file {
        Some(path) => {
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli, matches);
            Ok(config)
        }
        None => Ok(cli.clone()),
    }
}

pub fn run(args: OptimizeArgs, matches: &ArgMatches) -> GfResult<()> {
    let def = args.layout.source().resolve()?;
    let table = BigramTable::load_csv(&args.bigrams)?;
    let config = resolve_config(&args.config_file, &args.config, matches)?;

    let report = api::optimize(&def, &table, &config, &SilentProgress)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        reports::print_optimization_report(&report);
    }
    Ok(())
}
