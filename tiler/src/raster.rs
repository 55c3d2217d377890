//! Tile rasterization: dense elevation rasters, per-sea-level masks,
//! and RGBA overlay output.

use crate::{
    resample::{pixel_elevation, VoidPolicy},
    store::{SolidTable, SolidTile, TileStore},
    TilerError,
};
use image::{Rgba, RgbaImage};
use log::debug;
use srtm::ElevationGrid;

/// Immutable rendering knobs for a tileset run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output tile edge length in pixels.
    pub tile_size: u32,

    /// Fill color for submerged pixels.
    pub overlay_color: Rgba<u8>,

    /// Highest sea level rendered, inclusive.
    pub max_sea_level: u16,

    /// Re-render tiles whose images already exist.
    pub overwrite: bool,

    /// VOID sample handling during resampling.
    pub void_policy: VoidPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            overlay_color: Rgba([0, 122, 255, 150]),
            max_sea_level: 100,
            overwrite: false,
            void_policy: VoidPolicy::Include,
        }
    }
}

/// Drawable sub-rectangle of a tile, in pixel coordinates.
///
/// Pixels left of `left`, at or right of `right`, above `top`, or at
/// or below `bottom` are forced transparent no matter what the
/// elevation mask says. Used for edge tiles at the low zoom levels so
/// the overlay stops exactly at the requested base-zoom boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMask {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl ClearMask {
    /// A mask admitting the whole tile.
    pub fn full(tile_size: u32) -> Self {
        Self {
            left: 0,
            right: tile_size,
            top: 0,
            bottom: tile_size,
        }
    }

    pub fn is_full(&self, tile_size: u32) -> bool {
        *self == Self::full(tile_size)
    }

    /// True if the pixel is inside the drawable rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// What rendering did for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOutcome {
    /// Images already present and overwrite was off.
    Skipped,

    /// Tile was rasterized; `images` overlay images were written, and
    /// `solid` records the sea level at which the tile became fully
    /// submerged, if it did.
    Rendered { images: u32, solid: Option<u16> },
}

/// Renders overlay images for the tiles of one tileset over a shared
/// read-only elevation grid.
///
/// Tiles are independent of each other, so one renderer may be driven
/// from many threads at once; only the solid table serializes.
pub struct TileRenderer<'a> {
    grid: &'a ElevationGrid,
    store: &'a TileStore,
    solid: &'a SolidTable,
    config: &'a RenderConfig,
}

impl<'a> TileRenderer<'a> {
    pub fn new(
        grid: &'a ElevationGrid,
        store: &'a TileStore,
        solid: &'a SolidTable,
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            grid,
            store,
            solid,
            config,
        }
    }

    /// Renders every sea level of the tile at `(x, y)`, zoom `z`.
    ///
    /// Sea levels where nothing is submerged produce no file; the
    /// first level at which the whole tile is submerged (with no
    /// clear mask carving out a border) produces a solid-tile record
    /// and ends the loop, since every higher level would render the
    /// same fully-opaque image.
    pub fn render(
        &self,
        x: u32,
        y: u32,
        z: u32,
        clear: Option<ClearMask>,
    ) -> Result<TileOutcome, TilerError> {
        if !self.config.overwrite && self.store.has_any(z, x, y)? {
            debug!("skipping tile z:{z} x:{x} y:{y}");
            return Ok(TileOutcome::Skipped);
        }

        let raster = self.elevation_raster(x, y, z);
        let size = self.config.tile_size;
        let mut images = 0;

        for sea_level in 1..=self.config.max_sea_level {
            let threshold = f64::from(sea_level);
            let submerged = raster.iter().filter(|&&e| e <= threshold).count();
            if submerged == 0 {
                continue;
            }
            if submerged == raster.len() && clear.is_none() {
                #[allow(clippy::cast_possible_truncation)]
                self.solid.append(SolidTile {
                    z: z as u16,
                    x: x as u16,
                    y: y as u16,
                    sea_level,
                })?;
                return Ok(TileOutcome::Rendered {
                    images,
                    solid: Some(sea_level),
                });
            }
            let mut image = RgbaImage::new(size, size);
            for py in 0..size {
                for px in 0..size {
                    let below = raster[(py * size + px) as usize] <= threshold;
                    if below && clear.map_or(true, |mask| mask.contains(px, py)) {
                        image.put_pixel(px, py, self.config.overlay_color);
                    }
                }
            }
            self.store.write(z, x, y, sea_level, &image)?;
            images += 1;
        }

        Ok(TileOutcome::Rendered {
            images,
            solid: None,
        })
    }

    /// Resamples the grid into a dense per-pixel elevation raster for
    /// one tile.
    fn elevation_raster(&self, x: u32, y: u32, z: u32) -> Vec<f64> {
        let size = self.config.tile_size;
        let inc = 1.0 / f64::from(size);
        let mut raster = vec![0.0; (size * size) as usize];
        for py in 0..size {
            for px in 0..size {
                let mercator_x = f64::from(x) + inc * f64::from(px);
                let mercator_y = f64::from(y) + inc * f64::from(py);
                raster[(py * size + px) as usize] = pixel_elevation(
                    mercator_x,
                    mercator_y,
                    z,
                    inc,
                    self.grid,
                    self.config.void_policy,
                );
            }
        }
        raster
    }
}
