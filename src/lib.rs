//! Density-based spatial clustering.
//!
//! `dbscan` groups points that sit in dense regions into clusters and labels points
//! in sparse regions as noise (DBSCAN, Ester et al. 1996).
//!
//! The primary public API is under [`cluster`], which provides:
//! - a pluggable [`Distance`] (Euclidean by default)
//! - brute-force and grid [`NeighborIndex`] implementations
//! - the [`Dbscan`] expansion engine, with flat labels, per-point roles and grouped output

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    checked_distance, dbscan, BruteForce, Clustering, Clusters, Dbscan, DbscanExt, DbscanFit,
    DbscanParams, Distance, Euclidean, GridIndex, IndexStrategy, Label, NeighborIndex, PointKind,
    AUTO_GRID_MAX_DIM, NOISE,
};
pub use error::{Error, Result};
