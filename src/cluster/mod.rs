//! Density-based clustering of dense vectors.
//!
//! ## Pieces
//!
//! - [`Distance`]: scalar dissimilarity between two vectors. [`Euclidean`] by default;
//!   any `Fn(&[f32], &[f32]) -> f32` closure works too.
//! - [`NeighborIndex`]: answers "which points are within `eps` of point `i`?".
//!   [`BruteForce`] scans everything, [`GridIndex`] buckets low-dimensional data.
//! - [`Dbscan`]: the expansion engine. It visits each point once, seeds a cluster at
//!   every unclaimed core point and grows it breadth-first.
//!
//! ## Hard assignments
//!
//! Every point ends up in exactly one bucket: a cluster, or noise. A border point
//! that is reachable from two clusters belongs to whichever reached it first.
//!
//! ## Usage
//!
//! ```rust
//! use dbscan::cluster::{Clustering, Dbscan, IndexStrategy, Label, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![8.0, 8.0],
//!     vec![8.0, 9.0],
//!     vec![20.0, 20.0],
//! ];
//!
//! // Flat labels, noise as `NOISE`
//! let labels = Dbscan::new(1.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1, NOISE]);
//!
//! // Original vectors grouped by cluster
//! let clusters = Dbscan::new(1.5, 2)
//!     .with_index(IndexStrategy::Auto)
//!     .cluster(&data)
//!     .unwrap();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters.get(Label::Noise), &[vec![20.0f32, 20.0]]);
//! ```

mod clusters;
mod dbscan;
mod distance;
mod index;
mod state;
mod traits;

pub use clusters::Clusters;
pub use dbscan::{dbscan, Dbscan, DbscanExt, DbscanFit, DbscanParams};
pub use distance::{checked_distance, Distance, Euclidean};
pub use index::{BruteForce, GridIndex, IndexStrategy, NeighborIndex, AUTO_GRID_MAX_DIM};
pub use state::{Label, PointKind, NOISE};
pub use traits::Clustering;
