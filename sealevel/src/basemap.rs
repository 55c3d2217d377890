use crate::options::Basemap;
use anyhow::Result;
use image::RgbaImage;
use log::warn;
use reqwest::blocking::Client;

/// Basemap servers serve 256-pixel tiles.
const TILE_PX: u32 = 256;

/// OpenStreetMap rejects anonymous default agents, so identify
/// ourselves.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

impl Basemap {
    /// Fetches every tile of the rectangle and pastes them into one
    /// image. Useful for eyeballing which tile rectangle covers a
    /// city before committing it to a range file. A failed fetch
    /// leaves its slot blank and the loop continues.
    pub fn run(&self) -> Result<()> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let span_x = self.max_x - self.min_x + 1;
        let span_y = self.max_y - self.min_y + 1;
        let mut canvas = RgbaImage::new(span_x * TILE_PX, span_y * TILE_PX);

        for x in self.min_x..=self.max_x {
            for y in self.min_y..=self.max_y {
                let url = self
                    .server
                    .replace("{z}", &self.zoom.to_string())
                    .replace("{x}", &x.to_string())
                    .replace("{y}", &y.to_string());
                match fetch_tile(&client, &url) {
                    Ok(tile) => image::imageops::replace(
                        &mut canvas,
                        &tile,
                        i64::from((x - self.min_x) * TILE_PX),
                        i64::from((y - self.min_y) * TILE_PX),
                    ),
                    Err(e) => warn!("failed to fetch {url}: {e}"),
                }
            }
        }

        canvas.save(&self.out)?;
        Ok(())
    }
}

fn fetch_tile(client: &Client, url: &str) -> Result<RgbaImage> {
    let response = client.get(url).send()?.error_for_status()?;
    let bytes = response.bytes()?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}
