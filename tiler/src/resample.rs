//! Area-weighted elevation resampling.
//!
//! One output pixel's footprint in geographic space usually straddles
//! several 1-arcsecond cells, none of which align with it. Rather
//! than picking a nearest sample or bilinearly blending four, each
//! overlapped cell contributes its value weighted by the exact
//! overlap area, treating cells as flat lat/lon rectangles. The
//! flat-rectangle treatment loses accuracy as pixels grow to span
//! many cells at low zoom levels; from roughly zoom 12 upward a pixel
//! covers a small fraction of an arcsecond and the error vanishes.

use crate::mercator;
use geo::Coord;
use srtm::{ElevationGrid, ARCSECOND, VOID};

/// How VOID samples participate in the weighted average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoidPolicy {
    /// Voids contribute their sentinel value like any other sample.
    /// A single void cell can pull an otherwise-valid average toward
    /// the sentinel; this matches the data pipeline's established
    /// output.
    #[default]
    Include,

    /// Voids are excluded and the average renormalized over the
    /// remaining area. A footprint with no non-void coverage
    /// resamples to the sentinel itself.
    Exclude,
}

/// Relative share of a pixel's area below which the non-void
/// remainder is considered empty under [`VoidPolicy::Exclude`].
const MIN_COVERED_FRACTION: f64 = 1e-12;

/// Average elevation over the footprint of the pixel whose top-left
/// corner is at fractional tile coordinates `(px, py)` at zoom `z`.
///
/// `inc` is the pixel's edge length in tile units (1 / tile size).
pub fn pixel_elevation(
    px: f64,
    py: f64,
    z: u32,
    inc: f64,
    grid: &ElevationGrid,
    policy: VoidPolicy,
) -> f64 {
    let p_lat = mercator::tile_latitude(py, z);
    let p_lon = mercator::tile_longitude(px, z);
    // Tile Y grows southward, so the next pixel corner is the lower
    // latitude and both spans come out positive.
    let d_lat = p_lat - mercator::tile_latitude(py + inc, z);
    let d_lon = mercator::tile_longitude(px + inc, z) - p_lon;
    footprint_average(p_lat, p_lon, d_lat, d_lon, grid, policy)
}

/// Integrates grid cells over a geographic rectangle whose top-left
/// corner is `(lat, lon)` and which extends `d_lat` south and `d_lon`
/// east.
fn footprint_average(
    lat: f64,
    lon: f64,
    d_lat: f64,
    d_lon: f64,
    grid: &ElevationGrid,
    policy: VoidPolicy,
) -> f64 {
    let top_left = grid.top_left_corner();

    // Candidate cell range the footprint's bounding box could
    // overlap: the cell containing the top-left corner on the near
    // edge, ceil on the far edge. Over-covering is fine since the
    // per-cell overlap below refines exact bounds. The clamp to the
    // grid keeps sample() in contract; area outside the grid
    // contributes nothing.
    let (min_row, min_col) = grid.cell_containing(Coord { x: lon, y: lat });
    #[allow(clippy::cast_possible_truncation)]
    let (max_row, max_col) = (
        ((top_left.y - (lat - d_lat)) / ARCSECOND).ceil() as isize,
        (((lon + d_lon) - top_left.x) / ARCSECOND).ceil() as isize,
    );
    let clamp_row = |row: isize| row.clamp(0, grid.height() as isize) as usize;
    let clamp_col = |col: isize| col.clamp(0, grid.width() as isize) as usize;
    let (min_row, max_row) = (clamp_row(min_row), clamp_row(max_row));
    let (min_col, max_col) = (clamp_col(min_col), clamp_col(max_col));

    let pixel_area = d_lat * d_lon;
    let mut total = 0.0;
    let mut area = pixel_area;
    for col in min_col..max_col {
        #[allow(clippy::cast_precision_loss)]
        let cell_west = top_left.x + col as f64 * ARCSECOND;
        let overlap_lon = ((lon + d_lon).min(cell_west + ARCSECOND) - lon.max(cell_west)).max(0.0);
        for row in min_row..max_row {
            #[allow(clippy::cast_precision_loss)]
            let cell_north = top_left.y - row as f64 * ARCSECOND;
            let overlap_lat =
                (lat.min(cell_north) - (lat - d_lat).max(cell_north - ARCSECOND)).max(0.0);
            let value = grid.sample(row, col);
            if policy == VoidPolicy::Exclude && value == VOID {
                area -= overlap_lat * overlap_lon;
            } else {
                total += overlap_lat * overlap_lon * f64::from(value);
            }
        }
    }

    if area <= pixel_area * MIN_COVERED_FRACTION {
        return f64::from(VOID);
    }
    total / area
}

#[cfg(test)]
mod tests {
    use super::{footprint_average, pixel_elevation, VoidPolicy};
    use crate::mercator;
    use assert_approx_eq::assert_approx_eq;
    use geo::Coord;
    use srtm::{ElevationGrid, ARCSECOND, VOID};

    fn grid_2x2(values: [u8; 4]) -> ElevationGrid {
        // Anchored at (10°N, 20°E); row 0 is the north row.
        ElevationGrid::from_samples(Coord { x: 20.0, y: 10.0 }, 2, 2, values.to_vec())
    }

    #[test]
    fn test_half_and_half_split() {
        let grid = grid_2x2([10, 20, 30, 40]);
        let top_left = grid.top_left_corner();
        // A footprint exactly covering the top two cells.
        let average = footprint_average(
            top_left.y,
            top_left.x,
            ARCSECOND,
            2.0 * ARCSECOND,
            &grid,
            VoidPolicy::Include,
        );
        assert_approx_eq!(average, 15.0, 1e-9);
    }

    #[test]
    fn test_seventy_thirty_split() {
        let grid = grid_2x2([10, 20, 30, 40]);
        let top_left = grid.top_left_corner();
        // One arcsecond square shifted 0.3 cells east: 70% over the
        // 10 cell, 30% over the 20 cell. Area weighting gives 13; a
        // bilinear blend of cell centers would give 15.
        let average = footprint_average(
            top_left.y,
            top_left.x + 0.3 * ARCSECOND,
            ARCSECOND,
            ARCSECOND,
            &grid,
            VoidPolicy::Include,
        );
        assert_approx_eq!(average, 13.0, 1e-9);
    }

    #[test]
    fn test_quarter_split_covers_all_four_cells() {
        let grid = grid_2x2([10, 20, 30, 40]);
        let top_left = grid.top_left_corner();
        let average = footprint_average(
            top_left.y - 0.5 * ARCSECOND,
            top_left.x + 0.5 * ARCSECOND,
            ARCSECOND,
            ARCSECOND,
            &grid,
            VoidPolicy::Include,
        );
        assert_approx_eq!(average, 25.0, 1e-9);
    }

    #[test]
    fn test_uniform_grid_any_alignment() {
        let grid = ElevationGrid::from_samples(
            Coord { x: 20.0, y: 10.0 },
            3600,
            3600,
            vec![42; 3600 * 3600],
        );
        for z in [9, 11, 13] {
            let px = mercator::tile_x(20.5, z);
            let py = mercator::tile_y(10.5, z);
            let inc = 1.0 / 256.0;
            assert_approx_eq!(
                pixel_elevation(px, py, z, inc, &grid, VoidPolicy::Include),
                42.0,
                1e-9
            );
        }
    }

    #[test]
    fn test_footprint_outside_grid_reads_zero() {
        let grid = grid_2x2([10, 20, 30, 40]);
        let top_left = grid.top_left_corner();
        let average = footprint_average(
            top_left.y + 10.0,
            top_left.x + 10.0,
            ARCSECOND,
            ARCSECOND,
            &grid,
            VoidPolicy::Include,
        );
        assert_approx_eq!(average, 0.0, 1e-12);
    }

    #[test]
    fn test_void_included_by_default() {
        let grid = grid_2x2([VOID, 20, 30, 40]);
        let top_left = grid.top_left_corner();
        let average = footprint_average(
            top_left.y,
            top_left.x,
            ARCSECOND,
            2.0 * ARCSECOND,
            &grid,
            VoidPolicy::Include,
        );
        // The sentinel averages in numerically: (127 + 20) / 2.
        assert_approx_eq!(average, 73.5, 1e-9);
    }

    #[test]
    fn test_void_excluded_renormalizes() {
        let grid = grid_2x2([VOID, 20, 30, 40]);
        let top_left = grid.top_left_corner();
        let average = footprint_average(
            top_left.y,
            top_left.x,
            ARCSECOND,
            2.0 * ARCSECOND,
            &grid,
            VoidPolicy::Exclude,
        );
        assert_approx_eq!(average, 20.0, 1e-9);
    }

    #[test]
    fn test_all_void_footprint_resamples_to_sentinel() {
        let grid = grid_2x2([VOID, VOID, VOID, VOID]);
        let top_left = grid.top_left_corner();
        let average = footprint_average(
            top_left.y,
            top_left.x,
            2.0 * ARCSECOND,
            2.0 * ARCSECOND,
            &grid,
            VoidPolicy::Exclude,
        );
        assert_approx_eq!(average, f64::from(VOID), 1e-9);
    }
}
