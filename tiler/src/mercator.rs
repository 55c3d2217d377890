//! Web Mercator tile-grid projection.
//!
//! Converts between geographic degrees and fractional slippy-map tile
//! coordinates at a zoom level. Tile X grows eastward from the
//! antimeridian, tile Y grows southward from the north pole, and one
//! unit is one tile edge, so `floor` of a fractional coordinate is
//! the containing tile's index.
//!
//! These are total functions: latitudes at the projection's polar
//! singularity produce non-finite values rather than panicking.

use std::f64::consts::PI;

/// Fractional tile X for a longitude in degrees at zoom `z`.
pub fn tile_x(longitude: f64, z: u32) -> f64 {
    f64::exp2(f64::from(z)) * (longitude / 360.0 + 0.5)
}

/// Fractional tile Y for a latitude in degrees at zoom `z`.
pub fn tile_y(latitude: f64, z: u32) -> f64 {
    (f64::exp2(f64::from(z) - 1.0) / PI) * (PI - (PI * (0.25 + latitude / 360.0)).tan().ln())
}

/// Latitude in degrees of a fractional tile Y at zoom `z`. Exact
/// inverse of [`tile_y`] up to floating-point rounding.
pub fn tile_latitude(y: f64, z: u32) -> f64 {
    360.0 * ((PI * (1.0 - y * f64::exp2(1.0 - f64::from(z)))).exp().atan() / PI - 0.25)
}

/// Longitude in degrees of a fractional tile X at zoom `z`. Exact
/// inverse of [`tile_x`] up to floating-point rounding.
pub fn tile_longitude(x: f64, z: u32) -> f64 {
    360.0 * (x / f64::exp2(f64::from(z)) - 0.5)
}

#[cfg(test)]
mod tests {
    use super::{tile_latitude, tile_longitude, tile_x, tile_y};

    /// Relative tolerance per round-trip contract.
    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs().max(1.0) * 1e-9;
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_longitude_round_trip() {
        for z in [0, 9, 13, 20] {
            for lon in [-179.9, 0.0, 179.9] {
                assert_close(tile_longitude(tile_x(lon, z), z), lon);
            }
        }
    }

    #[test]
    fn test_latitude_round_trip() {
        for z in [0, 9, 13, 20] {
            for lat in [-85.0, 0.0, 85.0] {
                assert_close(tile_latitude(tile_y(lat, z), z), lat);
            }
        }
    }

    #[test]
    fn test_known_tile_origins() {
        // Zoom 0 is a single tile spanning the world.
        assert_close(tile_x(-180.0, 0), 0.0);
        assert_close(tile_x(0.0, 0), 0.5);
        assert_close(tile_y(0.0, 0), 0.5);
        // One tile eastward per 360/2^z degrees.
        assert_close(tile_x(30.9375, 9), 300.0);
        assert_close(tile_longitude(300.0, 9), 30.9375);
    }

    #[test]
    fn test_poles_do_not_panic() {
        // The projection is singular at the poles; non-finite results
        // are acceptable, NaN propagation from a panic is not.
        assert!(!tile_y(90.0, 9).is_nan());
        assert!(!tile_y(-90.0, 9).is_nan());
    }
}
