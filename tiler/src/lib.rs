mod error;
pub mod mercator;
mod range;
mod raster;
mod resample;
mod store;
mod tileset;

pub use crate::{
    error::TilerError,
    range::{parse_ranges, RangeSpec},
    raster::{ClearMask, RenderConfig, TileOutcome, TileRenderer},
    resample::{pixel_elevation, VoidPolicy},
    store::{SolidTable, SolidTile, TileStore},
    tileset::{
        granule_window, plan_zooms, GranuleWindow, TileJob, TileRect, ZoomPlan, BASE_ZOOM,
        MAX_ZOOM, MIN_ZOOM,
    },
};
