pub mod bigrams;
pub mod optimize;
pub mod score;

use clap::Args;
use gridforge::api::LayoutSource;
use gridforge::layouts::Preset;
use std::path::PathBuf;

/// Either a JSON layout definition or one of the built-in presets.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct LayoutArgs {
    /// JSON file with `name`, `template`, `counted` and `permutable`
    #[arg(short, long)]
    pub layout: Option<PathBuf>,

    /// Built-in layout: en_hex or ru_hex
    #[arg(short, long)]
    pub preset: Option<Preset>,
}

impl LayoutArgs {
    pub fn source(&self) -> LayoutSource {
        match (&self.layout, self.preset) {
            (Some(path), _) => LayoutSource::File(path.clone()),
            (None, Some(preset)) => LayoutSource::Preset(preset),
            // clap enforces exactly one of the two
            (None, None) => LayoutSource::Preset(Preset::EnHex),
        }
    }
}
