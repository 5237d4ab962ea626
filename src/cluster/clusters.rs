//! Grouped output: original input vectors bucketed by cluster, plus noise.

use std::collections::BTreeMap;

use super::state::Label;

/// Original input vectors grouped by cluster, plus a noise bucket.
///
/// Every input vector lands in exactly one bucket, in input order within the bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clusters {
    clusters: Vec<Vec<Vec<f32>>>,
    noise: Vec<Vec<f32>>,
}

impl Clusters {
    pub(crate) fn from_labels(data: &[Vec<f32>], labels: &[Label], n_clusters: usize) -> Self {
        debug_assert_eq!(data.len(), labels.len());
        let mut clusters = vec![Vec::new(); n_clusters];
        let mut noise = Vec::new();
        for (point, label) in data.iter().zip(labels) {
            match label {
                Label::Cluster(c) => clusters[*c].push(point.clone()),
                Label::Noise => noise.push(point.clone()),
            }
        }
        Self { clusters, noise }
    }

    /// Number of clusters, not counting noise.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// `true` if no cluster was found (there may still be noise).
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Members of the bucket for `label`; empty for unknown cluster ids.
    pub fn get(&self, label: Label) -> &[Vec<f32>] {
        match label {
            Label::Cluster(c) => self.clusters.get(c).map(Vec::as_slice).unwrap_or(&[]),
            Label::Noise => &self.noise,
        }
    }

    /// The noise bucket.
    pub fn noise(&self) -> &[Vec<f32>] {
        &self.noise
    }

    /// Buckets in cluster id order, followed by noise when it is non-empty.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &[Vec<f32>])> + '_ {
        let noise = (!self.noise.is_empty()).then_some((Label::Noise, self.noise.as_slice()));
        self.clusters
            .iter()
            .enumerate()
            .map(|(c, members)| (Label::Cluster(c), members.as_slice()))
            .chain(noise)
    }

    /// Member count per cluster id.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Vec::len).collect()
    }

    /// Total number of vectors across all buckets.
    pub fn total(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum::<usize>() + self.noise.len()
    }

    /// Label-keyed map. Noise is present only when non-empty.
    pub fn into_map(self) -> BTreeMap<Label, Vec<Vec<f32>>> {
        let mut map: BTreeMap<Label, Vec<Vec<f32>>> = self
            .clusters
            .into_iter()
            .enumerate()
            .map(|(c, members)| (Label::Cluster(c), members))
            .collect();
        if !self.noise.is_empty() {
            map.insert(Label::Noise, self.noise);
        }
        map
    }
}
