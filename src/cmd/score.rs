use super::optimize::resolve_config;
use super::LayoutArgs;
use crate::reports;
use clap::{ArgMatches, Args};
use gridforge::api::{self, RankedLayout};
use gridforge::config::Config;
use gridforge::error::GfResult;
use gridforge::scorer::BigramTable;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[arg(short, long)]
    pub bigrams: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// JSON file holding a filled grid of symbol names
    #[arg(short, long)]
    pub grid: PathBuf,

    #[arg(long)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub config: Config,
}

pub fn run(args: ScoreArgs, matches: &ArgMatches) -> GfResult<()> {
    let def = args.layout.source().resolve()?;
    let table = BigramTable::load_csv(&args.bigrams)?;
    let config = resolve_config(&args.config_file, &args.config, matches)?;

    let rows: Vec<Vec<String>> = serde_json::from_str(&fs::read_to_string(&args.grid)?)?;
    let fitness = api::score_layout(&def, &table, &config, &rows)?;

    reports::print_layout_grid(&def.name, &RankedLayout { fitness, rows });
    Ok(())
}
