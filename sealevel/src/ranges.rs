use crate::options::Ranges;
use anyhow::Result;
use std::fs;
use tiler::{mercator, BASE_ZOOM};

impl Ranges {
    /// Prints each range's geographic center and latitude/longitude
    /// span, for sanity-checking tile rectangles against a map.
    pub fn run(&self) -> Result<()> {
        let text = fs::read_to_string(&self.ranges)?;
        for spec in tiler::parse_ranges(&text)? {
            let center_lat = mercator::tile_latitude(
                f64::from(spec.min_y + spec.max_y + 1) / 2.0,
                BASE_ZOOM,
            );
            let center_lon = mercator::tile_longitude(
                f64::from(spec.min_x + spec.max_x + 1) / 2.0,
                BASE_ZOOM,
            );
            let lat_span = mercator::tile_latitude(f64::from(spec.min_y), BASE_ZOOM)
                - mercator::tile_latitude(f64::from(spec.max_y + 1), BASE_ZOOM);
            let lon_span = mercator::tile_longitude(f64::from(spec.max_x + 1), BASE_ZOOM)
                - mercator::tile_longitude(f64::from(spec.min_x), BASE_ZOOM);
            println!(
                "{:>22}: {center_lat:11.6}, {center_lon:11.6}, {lat_span:.3}, {lon_span:.3}",
                spec.dataset
            );
        }
        Ok(())
    }
}
