use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use gridforge::error::GfResult;
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate bigram probabilities from a text corpus
    Bigrams(cmd::bigrams::BigramsArgs),
    /// Search for a low-cost layout
    Optimize(cmd::optimize::OptimizeArgs),
    /// Score a filled layout
    Score(cmd::score::ScoreArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if let Err(e) = dispatch(cli, &matches) {
        error!("{}", e);
        process::exit(1);
    }
}

fn dispatch(cli: Cli, matches: &clap::ArgMatches) -> GfResult<()> {
    match cli.command {
        Commands::Bigrams(args) => {
            info!("Building bigram table from {}", args.corpus.display());
            cmd::bigrams::run(args)
        }
        Commands::Optimize(args) => {
            let sub = matches.subcommand_matches("optimize").unwrap_or(matches);
            cmd::optimize::run(args, sub)
        }
        Commands::Score(args) => {
            let sub = matches.subcommand_matches("score").unwrap_or(matches);
            cmd::score::run(args, sub)
        }
    }
}
