//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN is a density-based clustering algorithm that groups points based on
//! neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors (inclusive).
//! - **MinPts**: Minimum number of points within ε, *the point itself included*, for a
//!   point to be "core".
//! - **Core point**: Has at least MinPts points within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. For each unvisited point P, in input order:
//!    - Mark P visited and query its neighbors within ε
//!    - If P is not core, leave it unassigned (it may become a border point later)
//!    - Else P seeds a new cluster, which is grown from its neighbors
//!
//! 2. Expansion works through a FIFO queue:
//!    - An unvisited point is visited and queried; if core, its unassigned,
//!      never-queued neighbors join the queue
//!    - An unassigned point joins the cluster; an assigned one is left alone
//!
//! 3. Whatever is still unassigned after the scan is noise.
//!
//! The first cluster to reach a border point keeps it, so clusters are disjoint.
//! Which cluster that is can depend on input order; the clusters' core points do not.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) with [`IndexStrategy::BruteForce`]; the grid index brings this
//!   close to O(n) for well-spread low-dimensional data.
//! - **Space**: O(n) for run state.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;
use std::fmt;

use log::{debug, log, Level};

use super::clusters::Clusters;
use super::distance::{Distance, Euclidean};
use super::index::{self, BruteForce, GridIndex, IndexStrategy, NeighborIndex};
use super::state::{Label, PointKind, RunState, NOISE};
use super::traits::Clustering;
use crate::error::{Error, Result};

/// DBSCAN parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DbscanParams {
    /// Maximum distance for two points to be neighbors. Must be non-negative;
    /// zero makes only coincident points neighbors.
    pub eps: f32,

    /// Minimum number of points within `eps`, the point itself included, for a core
    /// point. Must be at least 1; with 1 every point is core.
    pub min_pts: usize,

    /// Neighbor search strategy. Does not affect results.
    pub index: IndexStrategy,

    /// Log every point's classification at `debug` level instead of `trace`.
    pub verbose: bool,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_pts: 5,
            index: IndexStrategy::BruteForce,
            verbose: false,
        }
    }
}

impl DbscanParams {
    fn validate(&self) -> Result<()> {
        if self.eps.is_nan() || self.eps < 0.0 {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be non-negative",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// DBSCAN clustering algorithm.
///
/// The value only holds configuration. Every run allocates its own state, so one
/// instance can be reused across datasets.
#[derive(Debug, Clone)]
pub struct Dbscan<D = Euclidean> {
    params: DbscanParams,
    metric: D,
}

/// Outcome of one DBSCAN run, indexed by input position.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanFit {
    labels: Vec<Label>,
    kinds: Vec<PointKind>,
    n_clusters: usize,
}

#[derive(Debug, Clone, Copy)]
enum Visit {
    Seed,
    Core,
    Border,
    Noise,
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visit::Seed => "seed",
            Visit::Core => "core",
            Visit::Border => "border",
            Visit::Noise => "noise",
        })
    }
}

impl Dbscan<Euclidean> {
    /// Create a new DBSCAN clusterer with Euclidean distance.
    ///
    /// # Arguments
    ///
    /// * `eps` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points (itself included) to form a dense region.
    ///
    /// # Typical Values
    ///
    /// - `eps`: Often determined by k-distance plot (k = min_pts - 1).
    /// - `min_pts`: 2 * dimension is a common heuristic.
    pub fn new(eps: f32, min_pts: usize) -> Self {
        Self::from_params(DbscanParams {
            eps,
            min_pts,
            ..DbscanParams::default()
        })
    }

    /// Create a clusterer from a full parameter set.
    pub fn from_params(params: DbscanParams) -> Self {
        Self {
            params,
            metric: Euclidean,
        }
    }
}

impl Default for Dbscan<Euclidean> {
    fn default() -> Self {
        Self::from_params(DbscanParams::default())
    }
}

impl<D: Distance> Dbscan<D> {
    /// Set eps (neighborhood radius).
    pub fn with_epsilon(mut self, eps: f32) -> Self {
        self.params.eps = eps;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.params.min_pts = min_pts;
        self
    }

    /// Set the neighbor search strategy.
    pub fn with_index(mut self, index: IndexStrategy) -> Self {
        self.params.index = index;
        self
    }

    /// Log per-point classifications at `debug` level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.params.verbose = verbose;
        self
    }

    /// Replace the distance function.
    pub fn with_distance<D2: Distance>(self, metric: D2) -> Dbscan<D2> {
        Dbscan {
            params: self.params,
            metric,
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &DbscanParams {
        &self.params
    }

    /// Cluster `data`.
    ///
    /// All points must share one dimension. Parameters and dimensions are checked
    /// before any work is done; an empty dataset yields an empty fit.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<DbscanFit> {
        self.params.validate()?;
        if data.is_empty() {
            return Ok(DbscanFit::empty());
        }

        let dim = data[0].len();
        for point in data.iter().skip(1) {
            if point.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: point.len(),
                });
            }
        }

        let eps = self.params.eps;
        if index::use_grid(self.params.index, &self.metric, eps, dim)? {
            let grid = GridIndex::new(data, &self.metric, eps)?;
            Ok(self.run(&grid, "grid"))
        } else {
            Ok(self.run(&BruteForce::new(data, &self.metric, eps), "brute-force"))
        }
    }

    /// Cluster `data` and return the original vectors grouped by label.
    pub fn cluster(&self, data: &[Vec<f32>]) -> Result<Clusters> {
        let fit = self.fit(data)?;
        Ok(Clusters::from_labels(data, &fit.labels, fit.n_clusters))
    }

    /// Run the expansion over a caller-supplied index.
    ///
    /// The index defines both the dataset size and the neighborhood relation, so
    /// the configured `eps`, metric and index strategy are not consulted beyond
    /// validation.
    pub fn fit_with_index<I: NeighborIndex + ?Sized>(&self, index: &I) -> Result<DbscanFit> {
        self.params.validate()?;
        Ok(self.run(index, "custom"))
    }

    /// Core test. `neighbors` excludes the point itself, `min_pts` includes it.
    #[inline]
    fn is_core(&self, neighbors: usize) -> bool {
        neighbors + 1 >= self.params.min_pts
    }

    fn report(&self, idx: usize, visit: Visit, state: &RunState) {
        let level = if self.params.verbose {
            Level::Debug
        } else {
            Level::Trace
        };
        log!(
            level,
            "point {idx}: {visit} ({} clusters so far)",
            state.n_clusters()
        );
    }

    fn run<I: NeighborIndex + ?Sized>(&self, index: &I, index_name: &str) -> DbscanFit {
        let n = index.len();
        let mut state = RunState::new(n);

        for point_idx in 0..n {
            if !state.visit(point_idx) {
                continue;
            }

            let neighbors = index.neighbors(point_idx);
            if !self.is_core(neighbors.len()) {
                // Provisional: a later cluster may still claim it as a border point.
                self.report(point_idx, Visit::Noise, &state);
                continue;
            }

            let cluster_id = state.new_cluster();
            state.mark_core(point_idx);
            state.assign(point_idx, cluster_id);
            self.report(point_idx, Visit::Seed, &state);
            self.expand_cluster(index, &mut state, cluster_id, neighbors);
        }

        let (labels, kinds, n_clusters) = state.finish();
        let fit = DbscanFit {
            labels,
            kinds,
            n_clusters,
        };
        debug!(
            "dbscan: {} points, eps {}, min_pts {}, {} index: {} clusters, {} noise",
            n,
            self.params.eps,
            self.params.min_pts,
            index_name,
            fit.n_clusters,
            fit.noise_count()
        );
        fit
    }

    /// Grow `cluster_id` breadth-first from the seed's neighborhood.
    fn expand_cluster<I: NeighborIndex + ?Sized>(
        &self,
        index: &I,
        state: &mut RunState,
        cluster_id: usize,
        seeds: Vec<usize>,
    ) {
        let mut queue: VecDeque<usize> = VecDeque::with_capacity(seeds.len());
        for idx in seeds {
            if state.enqueue(idx) {
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            // Points visited earlier were already found not to be core.
            if state.visit(idx) {
                let neighbors = index.neighbors(idx);
                if self.is_core(neighbors.len()) {
                    state.mark_core(idx);
                    for neighbor in neighbors {
                        if state.enqueue(neighbor) {
                            queue.push_back(neighbor);
                        }
                    }
                }
            }

            if state.assign(idx, cluster_id) {
                let visit = if state.is_core(idx) {
                    Visit::Core
                } else {
                    Visit::Border
                };
                self.report(idx, visit, state);
            }
        }
    }
}

impl DbscanFit {
    fn empty() -> Self {
        Self {
            labels: Vec::new(),
            kinds: Vec::new(),
            n_clusters: 0,
        }
    }

    /// One label per input point.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Core/border/noise role per input point.
    pub fn kinds(&self) -> &[PointKind] {
        &self.kinds
    }

    /// Number of clusters found.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Number of points the fit covers.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// `true` for a fit over an empty dataset.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Positions of core points, ascending.
    pub fn core_indices(&self) -> Vec<usize> {
        self.indices_of(PointKind::Core)
    }

    /// Positions of noise points, ascending.
    pub fn noise_indices(&self) -> Vec<usize> {
        self.indices_of(PointKind::Noise)
    }

    /// Number of noise points.
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_noise()).count()
    }

    /// Member count per cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for label in &self.labels {
            if let Label::Cluster(c) = label {
                sizes[*c] += 1;
            }
        }
        sizes
    }

    /// Group `data`, the dataset this fit was computed on, by label.
    pub fn into_clusters(self, data: &[Vec<f32>]) -> Result<Clusters> {
        if data.len() != self.labels.len() {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "length differs from the fitted dataset",
            });
        }
        Ok(Clusters::from_labels(data, &self.labels, self.n_clusters))
    }

    fn indices_of(&self, kind: PointKind) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl<D: Distance> Clustering for Dbscan<D> {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let fit = self.fit(data)?;
        Ok(fit.labels.into_iter().map(Label::as_usize).collect())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    ///
    /// To get the actual number of clusters, use [`Dbscan::fit`].
    fn n_clusters(&self) -> usize {
        0 // Unknown until fit
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: usize) -> bool {
        label == NOISE
    }
}

impl<D: Distance> DbscanExt for Dbscan<D> {
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        let fit = self.fit(data)?;
        Ok(fit.labels.into_iter().map(Label::cluster).collect())
    }
}

/// Cluster `data` with Euclidean distance and brute-force neighbor search.
///
/// ```rust
/// let data = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![8.0, 8.0]];
/// let clusters = dbscan::dbscan(&data, 1.5, 2).unwrap();
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters.noise(), &[vec![8.0f32, 8.0]]);
/// ```
pub fn dbscan(data: &[Vec<f32>], eps: f32, min_pts: usize) -> Result<Clusters> {
    Dbscan::new(eps, min_pts).cluster(data)
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn params_round_trip_through_json() {
        let params = DbscanParams {
            eps: 1.25,
            min_pts: 3,
            index: IndexStrategy::Grid,
            verbose: true,
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: DbscanParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn partial_params_fill_in_defaults() {
        let params: DbscanParams = serde_json::from_str(r#"{"eps": 2.0}"#).unwrap();
        assert_eq!(
            params,
            DbscanParams {
                eps: 2.0,
                min_pts: 5,
                index: IndexStrategy::BruteForce,
                verbose: false,
            }
        );
    }

    #[test]
    fn labels_and_kinds_round_trip_through_json() {
        for strategy in [IndexStrategy::BruteForce, IndexStrategy::Grid, IndexStrategy::Auto] {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(serde_json::from_str::<IndexStrategy>(&json).unwrap(), strategy);
        }

        let data = vec![vec![0.0], vec![0.5], vec![0.9], vec![1.3], vec![9.0]];
        let fit = Dbscan::new(0.5, 3).fit(&data).unwrap();

        let json = serde_json::to_string(fit.labels()).unwrap();
        let labels: Vec<Label> = serde_json::from_str(&json).unwrap();
        assert_eq!(labels, fit.labels());
        assert_eq!(labels[4], Label::Noise);

        let json = serde_json::to_string(fit.kinds()).unwrap();
        let kinds: Vec<PointKind> = serde_json::from_str(&json).unwrap();
        assert_eq!(kinds, fit.kinds());
        assert!(kinds.contains(&PointKind::Core));
        assert!(kinds.contains(&PointKind::Border));
    }
}
