//! Range queries over a fixed dataset.
//!
//! A [`NeighborIndex`] answers "which points lie within `eps` of point `i`?" for one
//! run. Every implementation must return the same set: positions `j != i` with
//! `distance(data[i], data[j]) <= eps`, sorted ascending. The expansion engine's
//! border tie-breaking follows neighbor order, so equal sets in equal order keep
//! results identical across indexes.
//!
//! - [`BruteForce`] scans the whole dataset, O(n) per query.
//! - [`GridIndex`] buckets points into a uniform grid and only scans adjacent cells.
//!   It needs a metric that bounds per-axis differences (see
//!   [`Distance::bounds_coordinates`]) and `eps > 0`.

use std::collections::HashMap;

use log::debug;

use super::distance::Distance;
use crate::error::{Error, Result};

/// Range-query interface used by the expansion engine.
pub trait NeighborIndex {
    /// Number of indexed points.
    fn len(&self) -> usize;

    /// `true` if no points are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positions within `eps` of `idx`, excluding `idx`, in ascending order.
    fn neighbors(&self, idx: usize) -> Vec<usize>;
}

/// How the engine finds neighborhoods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexStrategy {
    /// Scan every point for every query.
    #[default]
    BruteForce,
    /// Uniform grid. Rejected when the metric or `eps` does not allow it.
    Grid,
    /// Grid when allowed and the dimension is small, brute force otherwise.
    Auto,
}

/// Highest dimension for which [`IndexStrategy::Auto`] picks the grid.
pub const AUTO_GRID_MAX_DIM: usize = 4;

/// Exhaustive scan over the dataset.
#[derive(Debug)]
pub struct BruteForce<'a, D: ?Sized> {
    data: &'a [Vec<f32>],
    metric: &'a D,
    eps: f32,
}

impl<'a, D: Distance + ?Sized> BruteForce<'a, D> {
    /// Index `data` for queries of radius `eps` under `metric`.
    pub fn new(data: &'a [Vec<f32>], metric: &'a D, eps: f32) -> Self {
        Self { data, metric, eps }
    }
}

impl<D: Distance + ?Sized> NeighborIndex for BruteForce<'_, D> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn neighbors(&self, idx: usize) -> Vec<usize> {
        let point = &self.data[idx];
        self.data
            .iter()
            .enumerate()
            .filter(|(other_idx, other)| {
                *other_idx != idx && self.metric.distance(point, other) <= self.eps
            })
            .map(|(other_idx, _)| other_idx)
            .collect()
    }
}

// Cells are slightly wider than eps so that rounding in an f32 distance can never
// place two neighbors more than one cell apart on any axis.
const CELL_SLACK: f64 = 1e-3;

type CellKey = Vec<i64>;

/// Uniform grid with cells of width just above `eps`.
///
/// Neighbors of a point can only live in its own cell or one of the `3^d` adjacent
/// cells. When `3^d` exceeds the number of occupied cells, occupied cells are scanned
/// directly instead of enumerating offsets.
#[derive(Debug)]
pub struct GridIndex<'a, D: ?Sized> {
    data: &'a [Vec<f32>],
    metric: &'a D,
    eps: f32,
    width: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    offsets: Option<Vec<Vec<i64>>>,
}

impl<'a, D: Distance + ?Sized> GridIndex<'a, D> {
    /// Build a grid over `data`.
    ///
    /// Fails with [`Error::InvalidParameter`] if `eps` is not a positive finite number
    /// or the metric does not bound per-axis differences.
    pub fn new(data: &'a [Vec<f32>], metric: &'a D, eps: f32) -> Result<Self> {
        if !(eps > 0.0 && eps.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "grid index needs a positive finite radius",
            });
        }
        if !metric.bounds_coordinates() {
            return Err(Error::InvalidParameter {
                name: "index",
                message: "grid index needs a metric that bounds per-axis differences",
            });
        }

        let width = f64::from(eps) * (1.0 + CELL_SLACK);
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (idx, point) in data.iter().enumerate() {
            cells.entry(cell_of(point, width)).or_default().push(idx);
        }

        let dim = data.first().map_or(0, Vec::len);
        let offsets = neighbor_offsets(dim, cells.len());
        debug!(
            "grid index: {} points in {} cells, dim {}, offset enumeration {}",
            data.len(),
            cells.len(),
            dim,
            offsets.is_some()
        );

        Ok(Self {
            data,
            metric,
            eps,
            width,
            cells,
            offsets,
        })
    }

    /// Number of occupied cells.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    fn candidates(&self, key: &[i64]) -> Vec<usize> {
        let mut out = Vec::new();
        match &self.offsets {
            Some(offsets) => {
                let mut probe = key.to_vec();
                for offset in offsets {
                    for (slot, (&k, &o)) in probe.iter_mut().zip(key.iter().zip(offset)) {
                        *slot = k.saturating_add(o);
                    }
                    if let Some(members) = self.cells.get(&probe) {
                        out.extend_from_slice(members);
                    }
                }
            }
            None => {
                for (cell, members) in &self.cells {
                    let adjacent = cell
                        .iter()
                        .zip(key)
                        .all(|(&a, &b)| a.abs_diff(b) <= 1);
                    if adjacent {
                        out.extend_from_slice(members);
                    }
                }
            }
        }
        out
    }
}

impl<D: Distance + ?Sized> NeighborIndex for GridIndex<'_, D> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn neighbors(&self, idx: usize) -> Vec<usize> {
        let point = &self.data[idx];
        let key = cell_of(point, self.width);
        let mut out: Vec<usize> = self
            .candidates(&key)
            .into_iter()
            .filter(|&other_idx| {
                other_idx != idx && self.metric.distance(point, &self.data[other_idx]) <= self.eps
            })
            .collect();
        // Saturated keys at the edge of i64 can probe the same cell twice.
        out.sort_unstable();
        out.dedup();
        out
    }
}

/// Whether `strategy` resolves to the grid for this dataset and metric.
///
/// `Grid` is an error when the grid cannot be used.
pub(crate) fn use_grid<D: Distance + ?Sized>(
    strategy: IndexStrategy,
    metric: &D,
    eps: f32,
    dim: usize,
) -> Result<bool> {
    let allowed = metric.bounds_coordinates() && eps > 0.0 && eps.is_finite();
    match strategy {
        IndexStrategy::BruteForce => Ok(false),
        IndexStrategy::Grid if !allowed => Err(Error::InvalidParameter {
            name: "index",
            message: "grid index needs a coordinate-bounding metric and a positive finite eps",
        }),
        IndexStrategy::Grid => Ok(true),
        IndexStrategy::Auto => Ok(allowed && dim >= 1 && dim <= AUTO_GRID_MAX_DIM),
    }
}

fn cell_of(point: &[f32], width: f64) -> CellKey {
    // `as` saturates out-of-range values and maps NaN to 0; such points are still
    // filtered by the exact distance check.
    point
        .iter()
        .map(|&c| (f64::from(c) / width).floor() as i64)
        .collect()
}

/// All offsets in `{-1, 0, 1}^dim`, or `None` when there are more of them than
/// occupied cells.
fn neighbor_offsets(dim: usize, n_cells: usize) -> Option<Vec<Vec<i64>>> {
    let count = u32::try_from(dim)
        .ok()
        .and_then(|d| 3usize.checked_pow(d))?;
    if count > n_cells {
        return None;
    }
    let mut offsets: Vec<Vec<i64>> = vec![Vec::with_capacity(dim)];
    for _ in 0..dim {
        offsets = offsets
            .into_iter()
            .flat_map(|prefix| {
                [-1i64, 0, 1].into_iter().map(move |o| {
                    let mut next = prefix.clone();
                    next.push(o);
                    next
                })
            })
            .collect();
    }
    Some(offsets)
}
