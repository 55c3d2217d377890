use crate::options::Preview;
use anyhow::{anyhow, Result};
use image::GrayImage;
use srtm::{ElevationGrid, VOID};
use std::fs;
use tiler::granule_window;

impl Preview {
    /// Composes the named range's elevation grid and writes it as a
    /// grayscale image, values stretched over the full byte range and
    /// voids rendered black. A debugging aid, not part of the tile
    /// pipeline.
    pub fn run(&self) -> Result<()> {
        let text = fs::read_to_string(&self.ranges)?;
        let spec = tiler::parse_ranges(&text)?
            .into_iter()
            .find(|spec| spec.dataset == self.dataset)
            .ok_or_else(|| anyhow!("no range named {} in {:?}", self.dataset, self.ranges))?;

        let window = granule_window(&spec);
        let grid = ElevationGrid::compose(&self.srtm_dir, window.lats, window.lons)?;

        #[allow(clippy::cast_possible_truncation)]
        let mut image = GrayImage::new(grid.width() as u32, grid.height() as u32);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let value = grid.sample(y as usize, x as usize);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let luma = if value == VOID {
                0
            } else {
                (f32::from(value) * 2.55) as u8
            };
            *pixel = image::Luma([luma]);
        }
        image.save(&self.out)?;
        Ok(())
    }
}
