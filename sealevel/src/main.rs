mod basemap;
mod generate;
mod granules;
mod options;
mod preview;
mod progress;
mod ranges;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli {
        Cli::Generate(generate) => generate.run(),
        Cli::Granules(granules) => granules.run(),
        Cli::Ranges(ranges) => ranges.run(),
        Cli::Basemap(basemap) => basemap.run(),
        Cli::Preview(preview) => preview.run(),
    }
}
