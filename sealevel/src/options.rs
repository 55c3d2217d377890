use clap::{Args, Parser};
use std::path::PathBuf;

/// Generate sea-level overlay map tiles from SRTM elevation data.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Render the overlay tile pyramid for every range in a range
    /// file.
    Generate(Generate),

    /// List the SRTM granule archives a range file needs.
    Granules(Granules),

    /// Print the geographic center and span of each range.
    Ranges(Ranges),

    /// Stitch basemap tiles for a tile rectangle into one image.
    Basemap(Basemap),

    /// Render a range's composed elevation grid to a grayscale image.
    Preview(Preview),
}

#[derive(Debug, Clone, Args)]
pub struct Generate {
    /// Re-render tiles whose images already exist.
    #[arg(short = 'O', long)]
    pub overwrite: bool,

    /// Exclude void samples from resampled averages instead of
    /// letting the void sentinel participate numerically.
    #[arg(long)]
    pub exclude_voids: bool,

    /// Directory containing SRTM granule (.hgt) files.
    #[arg(short, long)]
    pub srtm_dir: PathBuf,

    /// Root output directory for tile images.
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Range file with one `name,min_x,max_x,min_y,max_y` line per
    /// tileset, bounds given as zoom-11 tile coordinates.
    pub ranges: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Granules {
    /// Range file to plan granule downloads for.
    pub ranges: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Ranges {
    /// Range file to describe.
    pub ranges: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Basemap {
    /// Zoom level of the tile rectangle.
    #[arg(short, long, default_value_t = 11)]
    pub zoom: u32,

    /// Tile server URL template with {z}, {x} and {y} placeholders.
    #[arg(
        long,
        default_value = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
    )]
    pub server: String,

    /// Output image path.
    #[arg(short, long)]
    pub out: PathBuf,

    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

#[derive(Debug, Clone, Args)]
pub struct Preview {
    /// Directory containing SRTM granule (.hgt) files.
    #[arg(short, long)]
    pub srtm_dir: PathBuf,

    /// Output image path.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Range file containing the dataset.
    pub ranges: PathBuf,

    /// Dataset name selecting which range to preview.
    pub dataset: String,
}
