//! Per-run membership bookkeeping.
//!
//! Points are tracked by their position in the dataset, never by coordinate value,
//! so coincident points stay distinct entities. Each position moves through
//! `Unvisited -> Unassigned -> Assigned(c)` and never backwards.

/// Flat label used by [`Clustering::fit_predict`](super::Clustering::fit_predict) for noise.
pub const NOISE: usize = usize::MAX;

/// Final membership of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    /// Member of the cluster with this id. Ids start at 0 in discovery order.
    Cluster(usize),
    /// Not density-reachable from any core point.
    Noise,
}

impl Label {
    /// `true` for [`Label::Noise`].
    pub fn is_noise(self) -> bool {
        matches!(self, Label::Noise)
    }

    /// Cluster id, or `None` for noise.
    pub fn cluster(self) -> Option<usize> {
        match self {
            Label::Cluster(c) => Some(c),
            Label::Noise => None,
        }
    }

    /// Flat encoding: the cluster id, or [`NOISE`].
    pub fn as_usize(self) -> usize {
        self.cluster().unwrap_or(NOISE)
    }
}

impl From<Label> for Option<usize> {
    fn from(label: Label) -> Self {
        label.cluster()
    }
}

/// Role a point played in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointKind {
    /// At least `min_pts` points (itself included) within `eps`.
    Core,
    /// Not core, but inside the neighborhood of a core point.
    Border,
    /// Neither core nor border.
    Noise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointState {
    Unvisited,
    /// Visited but not claimed by any cluster (provisional noise).
    Unassigned,
    Assigned(usize),
}

/// Mutable state of one clustering run. Only the expansion engine writes it.
#[derive(Debug, Clone)]
pub(crate) struct RunState {
    states: Vec<PointState>,
    core: Vec<bool>,
    queued: Vec<bool>,
    n_clusters: usize,
}

impl RunState {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            states: vec![PointState::Unvisited; n],
            core: vec![false; n],
            queued: vec![false; n],
            n_clusters: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self, idx: usize) -> PointState {
        self.states[idx]
    }

    pub(crate) fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Marks `idx` visited. Returns `false` if it already was.
    pub(crate) fn visit(&mut self, idx: usize) -> bool {
        if self.states[idx] != PointState::Unvisited {
            return false;
        }
        self.states[idx] = PointState::Unassigned;
        true
    }

    /// Assigns `idx` to `cluster` unless it already belongs to one.
    ///
    /// Returns `true` if this call made the assignment. The point must be visited.
    pub(crate) fn assign(&mut self, idx: usize, cluster: usize) -> bool {
        debug_assert!(cluster < self.n_clusters);
        match self.states[idx] {
            PointState::Unassigned => {
                self.states[idx] = PointState::Assigned(cluster);
                true
            }
            PointState::Assigned(_) => false,
            PointState::Unvisited => {
                debug_assert!(false, "assigning unvisited point {idx}");
                false
            }
        }
    }

    pub(crate) fn mark_core(&mut self, idx: usize) {
        self.core[idx] = true;
    }

    pub(crate) fn is_core(&self, idx: usize) -> bool {
        self.core[idx]
    }

    /// Claims a queue slot for `idx`.
    ///
    /// Fails for points already queued or already assigned. A queued point is always
    /// assigned when popped, so every point enters a work queue at most once per run.
    pub(crate) fn enqueue(&mut self, idx: usize) -> bool {
        if self.queued[idx] || matches!(self.states[idx], PointState::Assigned(_)) {
            return false;
        }
        self.queued[idx] = true;
        true
    }

    pub(crate) fn new_cluster(&mut self) -> usize {
        let id = self.n_clusters;
        self.n_clusters += 1;
        id
    }

    /// Finalizes every unassigned point as noise.
    pub(crate) fn finish(self) -> (Vec<Label>, Vec<PointKind>, usize) {
        let mut labels = Vec::with_capacity(self.states.len());
        let mut kinds = Vec::with_capacity(self.states.len());
        for (state, core) in self.states.into_iter().zip(self.core) {
            match state {
                PointState::Assigned(c) => {
                    labels.push(Label::Cluster(c));
                    kinds.push(if core { PointKind::Core } else { PointKind::Border });
                }
                PointState::Unvisited | PointState::Unassigned => {
                    labels.push(Label::Noise);
                    kinds.push(PointKind::Noise);
                }
            }
        }
        (labels, kinds, self.n_clusters)
    }
}
