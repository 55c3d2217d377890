use crate::{options::Generate, progress};
use anyhow::Result;
use indicatif::{MultiProgress, ProgressDrawTarget};
use log::{info, warn};
use rayon::prelude::*;
use srtm::ElevationGrid;
use std::{fs, time::Instant};
use tiler::{
    granule_window, plan_zooms, RangeSpec, RenderConfig, SolidTable, TileRenderer, TileStore,
    VoidPolicy,
};

impl Generate {
    pub fn run(&self) -> Result<()> {
        let text = fs::read_to_string(&self.ranges)?;
        let specs = tiler::parse_ranges(&text)?;
        let config = RenderConfig {
            overwrite: self.overwrite,
            void_policy: if self.exclude_voids {
                VoidPolicy::Exclude
            } else {
                VoidPolicy::Include
            },
            ..RenderConfig::default()
        };
        for spec in &specs {
            // A tileset whose granules can't be loaded is skipped,
            // not fatal; the rest of the batch still runs.
            if let Err(e) = self.run_tileset(spec, &config) {
                warn!("skipping {} tileset: {e}", spec.dataset);
            }
        }
        Ok(())
    }

    fn run_tileset(&self, spec: &RangeSpec, config: &RenderConfig) -> Result<()> {
        let started = Instant::now();
        info!("starting {} tileset", spec.dataset);

        let window = granule_window(spec);
        let grid = ElevationGrid::compose(&self.srtm_dir, window.lats, window.lons)?;
        let store = TileStore::new(&self.out_dir, &spec.dataset);
        let solid = SolidTable::new(&self.out_dir, &spec.dataset);
        let renderer = TileRenderer::new(&grid, &store, &solid, config);

        let progress_group = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(4));
        for plan in plan_zooms(spec, config.tile_size) {
            let pb = progress_group.add(progress::bar(
                format!("{} z{}", spec.dataset, plan.zoom),
                plan.jobs.len() as u64,
            ));
            plan.jobs.par_iter().try_for_each(|job| -> Result<()> {
                renderer.render(job.x, job.y, plan.zoom, job.clear)?;
                pb.inc(1);
                Ok(())
            })?;
            pb.finish();
        }

        info!(
            "finished {} tileset in {:.0?}",
            spec.dataset,
            started.elapsed()
        );
        Ok(())
    }
}
