use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::prelude::{CoreError, CoreResult};

/// Sparse visit counts keyed by `"x,y"` grid cell.
///
/// Unvisited cells have no entry and stored counts are at least 1. Keys
/// stay in their wire form so the map deserializes straight off the
/// upstream payload; `BTreeMap` keeps iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupancyHistogram {
    cells: BTreeMap<String, u32>,
}

/// One decoded histogram cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub x: f64,
    pub y: f64,
    pub count: u32,
}

impl OccupancyHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buckets raw positions onto the facility grid and counts visits.
    ///
    /// Cell keys snap to the nearest `bucket` multiple on both axes, the
    /// upstream producer's grouping rule.
    pub fn from_points<I>(points: I, bucket: f64) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let bucket = if bucket > 0.0 { bucket } else { 1.0 };
        let mut cells = BTreeMap::new();
        for (x, y) in points {
            // Collapse negative zero so "-0" and "0" share a key.
            let bucket_x = (x / bucket).round() * bucket + 0.0;
            let bucket_y = (y / bucket).round() * bucket + 0.0;
            let key = format!("{},{}", bucket_x, bucket_y);
            *cells.entry(key).or_insert(0) += 1;
        }
        Self { cells }
    }

    /// Decodes every cell, skipping bad entries so one malformed key
    /// does not abort the whole render.
    pub fn cells(&self) -> Vec<HeatCell> {
        self.cells
            .iter()
            .filter_map(|(key, &count)| match decode_cell(key, count) {
                Ok(cell) => Some(cell),
                Err(err) => {
                    warn!("skipping histogram entry: {}", err);
                    None
                }
            })
            .collect()
    }

    /// Largest visit count in the current histogram, 0 when empty.
    pub fn max_count(&self) -> u32 {
        self.cells.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Zone keys in wire form, the report's `zones_visited` list.
    pub fn zones(&self) -> Vec<String> {
        self.cells.keys().cloned().collect()
    }

    #[cfg(test)]
    pub fn insert_raw(&mut self, key: &str, count: u32) {
        self.cells.insert(key.to_string(), count);
    }
}

fn decode_cell(key: &str, count: u32) -> CoreResult<HeatCell> {
    if count == 0 {
        return Err(CoreError::InvalidInput(format!(
            "zero count for cell '{}'",
            key
        )));
    }
    let (x, y) = key
        .split_once(',')
        .ok_or_else(|| CoreError::MalformedRecord(format!("histogram key '{}'", key)))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| CoreError::MalformedRecord(format!("histogram key '{}'", key)))?;
    let y = y
        .trim()
        .parse()
        .map_err(|_| CoreError::MalformedRecord(format!("histogram key '{}'", key)))?;
    Ok(HeatCell { x, y, count })
}
