use super::assign::{Cluster, Partition};
use super::centroid::Centroid;
use super::record::Dataset;

/// Mean of the cluster's members, or the cluster's own centroid when it has
/// no members.
pub fn average(data: &Dataset, cluster: &Cluster) -> Centroid {
    if cluster.is_empty() {
        return cluster.centroid.clone();
    }
    let mut sums = vec![0.0; data.dim()];
    for record in cluster.records(data) {
        for (s, &v) in sums.iter_mut().zip(record.values()) {
            *s += v;
        }
    }
    let count = cluster.len() as f64;
    if sums.iter().all(|s| s.is_finite()) {
        return Centroid::new(sums.into_iter().map(|s| s / count).collect());
    }

    // the plain sum overflowed; scale each value first
    let mut means = vec![0.0; data.dim()];
    for record in cluster.records(data) {
        for (m, &v) in means.iter_mut().zip(record.values()) {
            *m += v / count;
        }
    }
    Centroid::new(means)
}

/// Builds the next centroid generation, one centroid per cluster in
/// partition order. The number of centroids never changes.
pub fn relocate(data: &Dataset, partition: &Partition) -> Vec<Centroid> {
    partition
        .clusters()
        .iter()
        .map(|cluster| average(data, cluster))
        .collect()
}
