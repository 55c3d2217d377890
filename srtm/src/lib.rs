//! SRTM elevation (`.hgt`) granule loading and grid composition.
//!
//! A granule is one degree of latitude/longitude of 1-arcsecond
//! elevation samples. Granules are preprocessed on load: the
//! duplicated north row and east column are dropped, samples are
//! clamped to `0..=MAX_ELEVATION`, and voids are flagged with
//! [`VOID`]. Adjacent granules then compose seamlessly into one
//! [`ElevationGrid`].
//!
//! # References
//!
//! 1. [HGT file layout](http://fileformats.archiveteam.org/index.php?title=HGT)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod error;

pub use crate::error::SrtmError;
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::Coord;
use log::warn;
use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    mem::size_of,
    ops::RangeInclusive,
    path::Path,
};

/// Samples along one axis of a raw 1-arcsecond granule.
pub const GRANULE_DIM: usize = 3601;

/// Samples along one axis of a processed granule, after the
/// duplicated north row and east column are removed.
pub const GRANULE_CELLS: usize = GRANULE_DIM - 1;

/// Void marker in raw SRTM data.
pub const VOID_RAW: i16 = -32768;

/// Void marker in processed samples. Deliberately above
/// [`MAX_ELEVATION`] so voids never read as submerged.
pub const VOID: u8 = 127;

/// Processed samples are clamped to `0..=MAX_ELEVATION` meters.
pub const MAX_ELEVATION: u8 = 100;

/// One arcsecond in degrees; the native SRTM cell span.
pub const ARCSECOND: f64 = 1.0 / 3600.0;

/// Returns the NASA file name for the granule whose southwest sample
/// center is at the given integer coordinates.
pub fn granule_file_name(lat: i16, lon: i16) -> String {
    let (n_s, lat) = {
        let n_s = if lat.is_negative() { 'S' } else { 'N' };
        (n_s, lat.abs())
    };
    let (e_w, lon) = {
        let e_w = if lon.is_negative() { 'W' } else { 'E' };
        (e_w, lon.abs())
    };
    format!("{n_s}{lat:02}{e_w}{lon:03}.hgt")
}

/// Returns the archive name the NASA Earthdata Search site uses for a
/// granule. Not every name printed corresponds to an existing archive;
/// ocean-only granules were never published.
pub fn earthdata_archive_name(lat: i16, lon: i16) -> String {
    let file_name = granule_file_name(lat, lon);
    let stem = file_name.trim_end_matches(".hgt");
    format!("{stem}.SRTMGL1.hgt.zip")
}

/// One processed SRTM granule: [`GRANULE_CELLS`]² clamped samples,
/// row 0 northernmost.
pub struct Granule {
    samples: Box<[u8]>,
}

impl Granule {
    /// Reads and processes the `.hgt` file at `path`.
    ///
    /// The raw file must hold exactly [`GRANULE_DIM`]² big-endian
    /// `i16`s; anything else is reported as [`SrtmError::HgtLen`]
    /// rather than a partially-filled granule.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SrtmError> {
        let path = path.as_ref();
        let expected_len = (GRANULE_DIM * GRANULE_DIM * size_of::<i16>()) as u64;
        let actual_len = match path.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SrtmError::Missing(path.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };
        if actual_len != expected_len {
            return Err(SrtmError::HgtLen(actual_len, path.to_owned()));
        }

        let mut rdr = BufReader::new(File::open(path)?);

        // The north row duplicates the south row of the granule above;
        // skip it so composed granules don't double-count the seam.
        for _ in 0..GRANULE_DIM {
            rdr.read_i16::<BE>()?;
        }

        let mut samples = vec![0_u8; GRANULE_CELLS * GRANULE_CELLS].into_boxed_slice();
        let mut voids = 0_usize;
        for row in 0..GRANULE_CELLS {
            for col in 0..GRANULE_DIM {
                let raw = rdr.read_i16::<BE>()?;
                // The east column duplicates the west column of the
                // granule to the right.
                if col == GRANULE_CELLS {
                    continue;
                }
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                let sample = if raw == VOID_RAW {
                    voids += 1;
                    VOID
                } else {
                    raw.clamp(0, i16::from(MAX_ELEVATION)) as u8
                };
                samples[row * GRANULE_CELLS + col] = sample;
            }
        }
        if voids > 0 {
            warn!("{}: contains {voids} voids", path.display());
        }

        Ok(Self { samples })
    }

    /// Sample at `(row, col)`, row 0 northernmost.
    pub fn value(&self, row: usize, col: usize) -> u8 {
        assert!(row < GRANULE_CELLS && col < GRANULE_CELLS);
        self.samples[row * GRANULE_CELLS + col]
    }

    fn row(&self, row: usize) -> &[u8] {
        &self.samples[row * GRANULE_CELLS..(row + 1) * GRANULE_CELLS]
    }
}

/// A rectangular elevation grid composed of one or more granules.
///
/// Anchored at the geographic coordinate of the *center* of its
/// southwest cell; every cell spans one arcsecond of latitude and
/// longitude. Samples are stored row-major with row 0 northernmost,
/// and all access goes through the top-left-corner index arithmetic
/// rather than any assumed global offset.
pub struct ElevationGrid {
    /// Center of the southwest cell.
    anchor: Coord<f64>,
    width: usize,
    height: usize,
    samples: Box<[u8]>,
}

impl ElevationGrid {
    /// Builds a grid directly from samples, row 0 northernmost.
    pub fn from_samples(anchor: Coord<f64>, width: usize, height: usize, samples: Vec<u8>) -> Self {
        assert_eq!(samples.len(), width * height);
        Self {
            anchor,
            width,
            height,
            samples: samples.into_boxed_slice(),
        }
    }

    /// Loads every granule in the inclusive integer-degree ranges from
    /// `dir` and composes them into one grid anchored at
    /// `(min lat, min lon)`.
    ///
    /// A missing or malformed granule fails the whole composition;
    /// zeros are never substituted for absent data.
    pub fn compose(
        dir: &Path,
        lats: RangeInclusive<i16>,
        lons: RangeInclusive<i16>,
    ) -> Result<Self, SrtmError> {
        let blocks_wide = (lons.end() - lons.start() + 1) as usize;
        let blocks_tall = (lats.end() - lats.start() + 1) as usize;
        let width = blocks_wide * GRANULE_CELLS;
        let height = blocks_tall * GRANULE_CELLS;
        let mut samples = vec![0_u8; width * height];

        for (block_row, lat) in lats.clone().rev().enumerate() {
            for (block_col, lon) in lons.clone().enumerate() {
                let path = dir.join(granule_file_name(lat, lon));
                let granule = Granule::load(&path)?;
                for row in 0..GRANULE_CELLS {
                    let dst_row = block_row * GRANULE_CELLS + row;
                    let dst_col = block_col * GRANULE_CELLS;
                    samples[dst_row * width + dst_col..][..GRANULE_CELLS]
                        .copy_from_slice(granule.row(row));
                }
            }
        }

        let anchor = Coord {
            x: f64::from(*lons.start()),
            y: f64::from(*lats.start()),
        };
        Ok(Self {
            anchor,
            width,
            height,
            samples: samples.into_boxed_slice(),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Center of the southwest cell.
    pub fn anchor(&self) -> Coord<f64> {
        self.anchor
    }

    /// Geographic coordinate of the outer top-left corner of the
    /// grid's coverage.
    ///
    /// The anchor denotes a cell center, so the corner sits half a
    /// cell west of it and half a cell above the top row's centers.
    /// This corner, not the anchor, is the origin for all index math.
    pub fn top_left_corner(&self) -> Coord<f64> {
        #[allow(clippy::cast_precision_loss)]
        Coord {
            x: self.anchor.x - ARCSECOND / 2.0,
            y: self.anchor.y + self.height as f64 * ARCSECOND - ARCSECOND / 2.0,
        }
    }

    /// Index of the cell covering `coord`, as (row, col). Either may
    /// be negative or past the grid edge for coordinates outside the
    /// coverage area; callers clamp before sampling.
    pub fn cell_containing(&self, coord: Coord<f64>) -> (isize, isize) {
        let top_left = self.top_left_corner();
        #[allow(clippy::cast_possible_truncation)]
        let row = ((top_left.y - coord.y) / ARCSECOND).floor() as isize;
        #[allow(clippy::cast_possible_truncation)]
        let col = ((coord.x - top_left.x) / ARCSECOND).floor() as isize;
        (row, col)
    }

    /// Raw sample at `(row, col)`.
    ///
    /// Out-of-range indices are a caller bug, not a runtime
    /// condition: silently clamping here would corrupt resampled
    /// averages, so this panics instead.
    pub fn sample(&self, row: usize, col: usize) -> u8 {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.height,
            self.width,
        );
        self.samples[row * self.width + col]
    }
}
