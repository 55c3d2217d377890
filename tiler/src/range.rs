//! Tileset range definitions.

use crate::TilerError;
use std::str::FromStr;

/// One requested tileset: a dataset name plus the inclusive zoom-11
/// tile rectangle it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub dataset: String,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl FromStr for RangeSpec {
    type Err = TilerError;

    /// Parses a `name,min_x,max_x,min_y,max_y` line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mk_err = |reason| TilerError::Range {
            line: s.to_string(),
            reason,
        };
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            return Err(mk_err("expected 5 comma-separated fields"));
        }
        let dataset = fields[0].to_string();
        if dataset.is_empty() {
            return Err(mk_err("empty dataset name"));
        }
        let mut bounds = [0_u32; 4];
        for (bound, field) in bounds.iter_mut().zip(&fields[1..]) {
            *bound = field
                .parse()
                .map_err(|_| mk_err("tile bound is not a non-negative integer"))?;
        }
        let [min_x, max_x, min_y, max_y] = bounds;
        if min_x > max_x || min_y > max_y {
            return Err(mk_err("range minimum exceeds maximum"));
        }
        Ok(Self {
            dataset,
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }
}

/// Parses a whole range file. Blank lines are allowed; a malformed
/// line fails the parse rather than being skipped.
pub fn parse_ranges(text: &str) -> Result<Vec<RangeSpec>, TilerError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(RangeSpec::from_str)
        .collect()
}
