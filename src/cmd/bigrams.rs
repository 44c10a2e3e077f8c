use super::LayoutArgs;
use clap::Args;
use gridforge::api;
use gridforge::error::GfResult;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct BigramsArgs {
    /// Directory with `*.txt` corpus files
    #[arg(short, long)]
    pub corpus: PathBuf,

    /// Output CSV (`first,second,probability`)
    #[arg(short, long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

pub fn run(args: BigramsArgs) -> GfResult<()> {
    let def = args.layout.source().resolve()?;
    let table = api::fit_bigrams(&def, &args.corpus)?;
    table.save_csv(&args.out)?;

    info!(
        "Saved {} bigrams for '{}' to {}",
        table.len(),
        def.name,
        args.out.display()
    );
    Ok(())
}
