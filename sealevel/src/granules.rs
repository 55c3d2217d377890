use crate::options::Granules;
use anyhow::Result;
use std::{collections::BTreeSet, fs};
use tiler::granule_window;

impl Granules {
    /// Prints the Earthdata archive name of every granule the range
    /// file's tilesets need, sorted and deduplicated. Some names may
    /// not exist on the NASA site; ocean-only granules were never
    /// published.
    pub fn run(&self) -> Result<()> {
        let text = fs::read_to_string(&self.ranges)?;
        let specs = tiler::parse_ranges(&text)?;

        let mut needed = BTreeSet::new();
        for spec in &specs {
            let window = granule_window(spec);
            for lat in window.lats.clone() {
                for lon in window.lons.clone() {
                    needed.insert((lat, lon));
                }
            }
        }
        for (lat, lon) in needed {
            println!("{}", srtm::earthdata_archive_name(lat, lon));
        }
        Ok(())
    }
}
