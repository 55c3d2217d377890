//! On-disk persistence: rendered tile images and the solid-tile side
//! table.

use crate::TilerError;
use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use image::RgbaImage;
use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Writes tile overlay images under
/// `<root>/<dataset>/<z>/<x>/<dataset>_z{z}x{x}y{y}e{sea_level}.png`.
///
/// Images are written once and never mutated; [`TileStore::has_any`]
/// is the renderer's resume check.
pub struct TileStore {
    root: PathBuf,
    dataset: String,
}

impl TileStore {
    pub fn new(out_dir: &Path, dataset: &str) -> Self {
        Self {
            root: out_dir.join(dataset),
            dataset: dataset.to_string(),
        }
    }

    fn tile_dir(&self, z: u32, x: u32) -> PathBuf {
        self.root.join(z.to_string()).join(x.to_string())
    }

    /// Path of the image for one `(z, x, y, sea_level)` combination.
    pub fn image_path(&self, z: u32, x: u32, y: u32, sea_level: u16) -> PathBuf {
        self.tile_dir(z, x)
            .join(format!("{}_z{z}x{x}y{y}e{sea_level}.png", self.dataset))
    }

    /// True if an image exists for the tile at any sea level.
    pub fn has_any(&self, z: u32, x: u32, y: u32) -> Result<bool, TilerError> {
        let prefix = format!("{}_z{z}x{x}y{y}e", self.dataset);
        let entries = match fs::read_dir(self.tile_dir(z, x)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let name = entry?.file_name();
            if let Some(name) = name.to_str() {
                if name.starts_with(&prefix) && name.ends_with(".png") {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Persists one overlay image, creating directories on demand.
    pub fn write(
        &self,
        z: u32,
        x: u32,
        y: u32,
        sea_level: u16,
        image: &RgbaImage,
    ) -> Result<(), TilerError> {
        fs::create_dir_all(self.tile_dir(z, x))?;
        image.save(self.image_path(z, x, y, sea_level))?;
        Ok(())
    }
}

/// One fully-submerged tile: the lowest sea level at which every
/// pixel of the tile is below water with no clear mask active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidTile {
    pub z: u16,
    pub x: u16,
    pub y: u16,
    pub sea_level: u16,
}

/// Append-only side table of [`SolidTile`] records, stored as
/// little-endian `u16` quadruples in `<root>/<dataset>/<dataset>_solid.dat`.
///
/// Each append is a single 8-byte write on a file opened in append
/// mode, behind a mutex, so records from concurrently rendered tiles
/// never interleave and the file is never rewritten in place.
pub struct SolidTable {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SolidTable {
    pub fn new(out_dir: &Path, dataset: &str) -> Self {
        Self {
            path: out_dir.join(dataset).join(format!("{dataset}_solid.dat")),
            lock: Mutex::new(()),
        }
    }

    pub fn append(&self, record: SolidTile) -> Result<(), TilerError> {
        let _guard = self.lock.lock().expect("solid table lock poisoned");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut buf = [0_u8; 8];
        {
            let mut wtr = &mut buf[..];
            wtr.write_u16::<LE>(record.z)?;
            wtr.write_u16::<LE>(record.x)?;
            wtr.write_u16::<LE>(record.y)?;
            wtr.write_u16::<LE>(record.sea_level)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buf)?;
        Ok(())
    }

    /// Reads every record; a missing table reads as empty.
    pub fn read_all(&self) -> Result<Vec<SolidTile>, TilerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut rdr = BufReader::new(file);
        let mut records = Vec::new();
        loop {
            let z = match rdr.read_u16::<LE>() {
                Ok(z) => z,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };
            records.push(SolidTile {
                z,
                x: rdr.read_u16::<LE>()?,
                y: rdr.read_u16::<LE>()?,
                sea_level: rdr.read_u16::<LE>()?,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::{SolidTable, SolidTile, TileStore};
    use image::RgbaImage;
    use std::{fs, path::PathBuf};

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("store-test-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_tile_store_layout_and_existence() {
        let out = scratch_dir("layout");
        let store = TileStore::new(&out, "atlantis");

        assert!(!store.has_any(9, 12, 34).unwrap());
        store
            .write(9, 12, 34, 7, &RgbaImage::new(4, 4))
            .unwrap();
        assert!(store.has_any(9, 12, 34).unwrap());
        assert!(out
            .join("atlantis/9/12/atlantis_z9x12y34e7.png")
            .exists());

        // Same x directory, different y: must not collide.
        assert!(!store.has_any(9, 12, 3).unwrap());
    }

    #[test]
    fn test_solid_table_round_trip() {
        let out = scratch_dir("solid");
        let table = SolidTable::new(&out, "atlantis");

        assert!(table.read_all().unwrap().is_empty());

        let first = SolidTile {
            z: 11,
            x: 1043,
            y: 674,
            sea_level: 12,
        };
        let second = SolidTile {
            z: 13,
            x: 4173,
            y: 2696,
            sea_level: 1,
        };
        table.append(first).unwrap();
        table.append(second).unwrap();
        assert_eq!(table.read_all().unwrap(), vec![first, second]);
    }
}
