use rayon::prelude::*;

use super::centroid::Centroid;
use super::distance::DistanceMetric;
use super::record::{Dataset, FeatureRecord};

/// One centroid and the indices of the records currently nearest to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cluster {
    pub centroid: Centroid,
    /// Indices into the dataset, in input order.
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn new(centroid: Centroid) -> Self {
        Self {
            centroid,
            members: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// The member records, resolved against `data`.
    pub fn records<'a>(&'a self, data: &'a Dataset) -> impl Iterator<Item = &'a FeatureRecord> + 'a {
        self.members.iter().map(move |&i| &data.records()[i])
    }
}

/// The assignment of every record to exactly one centroid of a generation.
///
/// Clusters keep the order of the centroid generation they were built from,
/// so a partition always holds one entry per centroid even when two
/// centroids coincide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Partition {
    clusters: Vec<Cluster>,
}

impl Partition {
    pub fn from_clusters(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    pub fn centroids(&self) -> impl Iterator<Item = &Centroid> {
        self.clusters.iter().map(|c| &c.centroid)
    }

    /// Number of clusters, including empty ones.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total number of assigned records across all clusters.
    pub fn total_members(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    pub fn empty_clusters(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_empty()).count()
    }

    /// Cluster index of every record, for a dataset of `n` records.
    /// Records missing from the partition map to `None`.
    pub fn labels(&self, n: usize) -> Vec<Option<usize>> {
        let mut labels = vec![None; n];
        for (ci, cluster) in self.clusters.iter().enumerate() {
            for &m in &cluster.members {
                if let Some(slot) = labels.get_mut(m) {
                    *slot = Some(ci);
                }
            }
        }
        labels
    }

    /// True when `previous` has the same centroids in the same order and
    /// every centroid kept exactly the same members. An empty `previous`
    /// never matches a non-empty partition.
    pub fn is_stable_against(&self, previous: &Partition) -> bool {
        self.clusters.len() == previous.clusters.len()
            && self
                .clusters
                .iter()
                .zip(&previous.clusters)
                .all(|(a, b)| a.centroid == b.centroid && a.members == b.members)
    }
}

/// Index of the centroid nearest to `point`.
///
/// The first centroid is the initial best and only a strictly smaller
/// distance displaces it, so ties go to the earliest centroid. Returns `None`
/// only when `centroids` is empty.
pub fn nearest_centroid<D>(point: &[f64], centroids: &[Centroid], metric: &D) -> Option<usize>
where
    D: DistanceMetric + ?Sized,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = metric.distance(point, centroid.coordinates());
        let closer = match best {
            None => true,
            Some((_, min)) => d < min,
        };
        if closer {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Builds the partition of `data` over `centroids`, scanning records in
/// input order.
pub fn assign<D>(data: &Dataset, centroids: Vec<Centroid>, metric: &D) -> Partition
where
    D: DistanceMetric + ?Sized,
{
    let nearest: Vec<Option<usize>> = data
        .records()
        .iter()
        .map(|r| nearest_centroid(r.values(), &centroids, metric))
        .collect();
    build_partition(centroids, &nearest)
}

/// Same result as [`assign`], with the nearest-centroid search spread over
/// the rayon thread pool. Members are still collected in input order.
pub fn assign_parallel<D>(data: &Dataset, centroids: Vec<Centroid>, metric: &D) -> Partition
where
    D: DistanceMetric + ?Sized,
{
    let nearest: Vec<Option<usize>> = data
        .records()
        .par_iter()
        .map(|r| nearest_centroid(r.values(), &centroids, metric))
        .collect();
    build_partition(centroids, &nearest)
}

fn build_partition(centroids: Vec<Centroid>, nearest: &[Option<usize>]) -> Partition {
    let mut clusters: Vec<Cluster> = centroids.into_iter().map(Cluster::new).collect();
    for (record, winner) in nearest.iter().enumerate() {
        if let Some(ci) = *winner {
            clusters[ci].members.push(record);
        }
    }
    Partition { clusters }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::distance::Euclidean;
    use crate::cluster::record::FeatureSchema;

    fn data(points: &[[f64; 3]]) -> Dataset {
        let records = points
            .iter()
            .map(|p| FeatureRecord::new(format!("{:?}", p), p.to_vec()))
            .collect();
        Dataset::new(FeatureSchema::rgb(), records).unwrap()
    }

    #[test]
    fn test_nearest_first_wins_on_tie() {
        let centroids = vec![
            Centroid::new(vec![0.0, 0.0, 0.0]),
            Centroid::new(vec![10.0, 0.0, 0.0]),
            Centroid::new(vec![0.0, 0.0, 0.0]),
        ];
        // equidistant from the first two; the duplicate at index 2 never wins
        assert_eq!(nearest_centroid(&[5.0, 0.0, 0.0], &centroids, &Euclidean), Some(0));
        assert_eq!(nearest_centroid(&[1.0, 0.0, 0.0], &centroids, &Euclidean), Some(0));
        assert_eq!(nearest_centroid(&[9.0, 0.0, 0.0], &centroids, &Euclidean), Some(1));
        assert_eq!(nearest_centroid(&[1.0, 0.0, 0.0], &[], &Euclidean), None);
    }

    #[test]
    fn test_nearest_with_infinite_distances() {
        let centroids = vec![Centroid::new(vec![0.0]), Centroid::new(vec![1.0])];
        let always_far = |_: &[f64], _: &[f64]| f64::INFINITY;
        assert_eq!(nearest_centroid(&[0.5], &centroids, &always_far), Some(0));
    }

    #[test]
    fn test_assign_every_record_once() {
        let data = data(&[
            [0.0, 0.0, 0.0],
            [250.0, 250.0, 250.0],
            [5.0, 5.0, 5.0],
            [240.0, 255.0, 250.0],
            [128.0, 0.0, 0.0],
        ]);
        let centroids = vec![
            Centroid::new(vec![0.0, 0.0, 0.0]),
            Centroid::new(vec![255.0, 255.0, 255.0]),
            Centroid::new(vec![999.0, 999.0, 999.0]),
        ];
        let partition = assign(&data, centroids, &Euclidean);
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.total_members(), data.len());
        assert_eq!(partition.clusters()[0].members, vec![0, 2, 4]);
        assert_eq!(partition.clusters()[1].members, vec![1, 3]);
        assert!(partition.clusters()[2].is_empty());
        assert_eq!(partition.empty_clusters(), 1);
        assert_eq!(
            partition.labels(data.len()),
            vec![Some(0), Some(1), Some(0), Some(1), Some(0)]
        );

        let labels: Vec<&str> = partition.clusters()[1]
            .records(&data)
            .map(|r| r.label())
            .collect();
        assert_eq!(labels, vec!["[250.0, 250.0, 250.0]", "[240.0, 255.0, 250.0]"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let points: Vec<[f64; 3]> = (0..500)
            .map(|i| {
                let i = i as f64;
                [(i * 7.0) % 256.0, (i * 13.0) % 256.0, (i * 29.0) % 256.0]
            })
            .collect();
        let data = data(&points);
        let centroids = vec![
            Centroid::new(vec![0.0, 0.0, 0.0]),
            Centroid::new(vec![128.0, 128.0, 128.0]),
            Centroid::new(vec![255.0, 0.0, 255.0]),
            Centroid::new(vec![0.0, 255.0, 0.0]),
        ];
        let seq = assign(&data, centroids.clone(), &Euclidean);
        let par = assign_parallel(&data, centroids, &Euclidean);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_stability_check() {
        let data = data(&[[0.0, 0.0, 0.0], [255.0, 255.0, 255.0]]);
        let centroids = vec![
            Centroid::new(vec![0.0, 0.0, 0.0]),
            Centroid::new(vec![255.0, 255.0, 255.0]),
        ];
        let a = assign(&data, centroids.clone(), &Euclidean);
        let b = assign(&data, centroids, &Euclidean);
        assert!(a.is_stable_against(&b));
        assert!(!a.is_stable_against(&Partition::default()));

        // same members but a moved centroid is not stable
        let moved = assign(
            &data,
            vec![
                Centroid::new(vec![1.0, 0.0, 0.0]),
                Centroid::new(vec![255.0, 255.0, 255.0]),
            ],
            &Euclidean,
        );
        assert!(!a.is_stable_against(&moved));
    }
}
