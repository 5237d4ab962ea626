use dbscan::cluster::{
    Clustering, Dbscan, Distance, Euclidean, IndexStrategy, Label, PointKind, NOISE,
};
use proptest::prelude::*;

// Half-unit lattice coordinates: plenty of coincident points and exact eps ties.
fn dataset(max_len: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(
        prop::collection::vec((-8i32..8).prop_map(|v| v as f32 * 0.5), 2),
        0..max_len,
    )
}

fn within(data: &[Vec<f32>], i: usize, j: usize, eps: f32) -> bool {
    Euclidean.distance(&data[i], &data[j]) <= eps
}

proptest! {
    #[test]
    fn prop_every_point_in_exactly_one_bucket(
        data in dataset(40),
        eps in 0.0f32..3.0,
        min_pts in 1usize..6
    ) {
        let model = Dbscan::new(eps, min_pts);
        let fit = model.fit(&data).unwrap();
        prop_assert_eq!(fit.len(), data.len());

        let sizes = fit.cluster_sizes();
        prop_assert_eq!(sizes.len(), fit.n_clusters());
        prop_assert!(sizes.iter().all(|&s| s > 0));
        prop_assert_eq!(sizes.iter().sum::<usize>() + fit.noise_count(), data.len());

        let clusters = model.cluster(&data).unwrap();
        prop_assert_eq!(clusters.total(), data.len());
        prop_assert_eq!(clusters.sizes(), sizes);

        let labels = model.fit_predict(&data).unwrap();
        for (flat, label) in labels.iter().zip(fit.labels()) {
            prop_assert_eq!(*flat, label.as_usize());
            prop_assert!(*flat == NOISE || *flat < fit.n_clusters());
        }
    }

    #[test]
    fn prop_rerun_is_identical(
        data in dataset(30),
        eps in 0.0f32..3.0,
        min_pts in 1usize..5
    ) {
        let model = Dbscan::new(eps, min_pts);
        prop_assert_eq!(model.fit(&data).unwrap(), model.fit(&data).unwrap());
    }

    #[test]
    fn prop_core_reachable_points_are_never_noise(
        data in dataset(40),
        eps in 0.0f32..3.0,
        min_pts in 1usize..6
    ) {
        let fit = Dbscan::new(eps, min_pts).fit(&data).unwrap();
        let labels = fit.labels();
        let kinds = fit.kinds();

        for a in 0..data.len() {
            let neighbors = (0..data.len()).filter(|&b| b != a && within(&data, a, b, eps)).count();
            prop_assert_eq!(kinds[a] == PointKind::Core, neighbors + 1 >= min_pts);

            if kinds[a] != PointKind::Core {
                continue;
            }
            for b in 0..data.len() {
                if b == a || !within(&data, a, b, eps) {
                    continue;
                }
                prop_assert!(!labels[b].is_noise());
                if kinds[b] == PointKind::Core {
                    prop_assert_eq!(labels[a], labels[b]);
                }
            }
        }

        // Border points hang off a core point of their own cluster.
        for b in 0..data.len() {
            if kinds[b] == PointKind::Border {
                let anchored = (0..data.len()).any(|a| {
                    kinds[a] == PointKind::Core && labels[a] == labels[b] && within(&data, a, b, eps)
                });
                prop_assert!(anchored);
            }
        }
    }

    #[test]
    fn prop_core_partition_ignores_input_order(
        (data, perm) in dataset(30).prop_flat_map(|data| {
            let n = data.len();
            (Just(data), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        }),
        eps in 0.0f32..3.0,
        min_pts in 1usize..5
    ) {
        let model = Dbscan::new(eps, min_pts);
        let fit = model.fit(&data).unwrap();

        let shuffled: Vec<Vec<f32>> = perm.iter().map(|&i| data[i].clone()).collect();
        let shuffled_fit = model.fit(&shuffled).unwrap();
        prop_assert_eq!(fit.n_clusters(), shuffled_fit.n_clusters());

        // Map the shuffled run back to original positions.
        let n = data.len();
        let mut labels = vec![Label::Noise; n];
        let mut kinds = vec![PointKind::Noise; n];
        for (pos, &orig) in perm.iter().enumerate() {
            labels[orig] = shuffled_fit.labels()[pos];
            kinds[orig] = shuffled_fit.kinds()[pos];
        }

        for i in 0..n {
            prop_assert_eq!(kinds[i] == PointKind::Core, fit.kinds()[i] == PointKind::Core);
            prop_assert_eq!(labels[i].is_noise(), fit.labels()[i].is_noise());
        }
        for i in 0..n {
            for j in 0..n {
                if fit.kinds()[i] == PointKind::Core && fit.kinds()[j] == PointKind::Core {
                    prop_assert_eq!(
                        fit.labels()[i] == fit.labels()[j],
                        labels[i] == labels[j]
                    );
                }
            }
        }
    }

    #[test]
    fn prop_growing_eps_never_splits_clusters(
        data in dataset(30),
        eps in 0.0f32..2.0,
        extra in 0.0f32..2.0,
        min_pts in 1usize..5
    ) {
        let small = Dbscan::new(eps, min_pts).fit(&data).unwrap();
        let large = Dbscan::new(eps + extra, min_pts).fit(&data).unwrap();
        for i in 0..data.len() {
            if !small.labels()[i].is_noise() {
                prop_assert!(!large.labels()[i].is_noise());
            }
            if small.kinds()[i] != PointKind::Core {
                continue;
            }
            prop_assert_eq!(large.kinds()[i], PointKind::Core);
            for j in 0..data.len() {
                if small.kinds()[j] == PointKind::Core && small.labels()[i] == small.labels()[j] {
                    prop_assert_eq!(large.labels()[i], large.labels()[j]);
                }
            }
        }
    }

    #[test]
    fn prop_grid_matches_brute_force(
        data in dataset(50),
        eps in 0.05f32..3.0,
        min_pts in 1usize..6
    ) {
        let brute = Dbscan::new(eps, min_pts).fit(&data).unwrap();
        let grid = Dbscan::new(eps, min_pts)
            .with_index(IndexStrategy::Grid)
            .fit(&data)
            .unwrap();
        prop_assert_eq!(brute, grid);
    }

    #[test]
    fn prop_min_pts_one_has_no_noise(data in dataset(30), eps in 0.0f32..3.0) {
        let fit = Dbscan::new(eps, 1).fit(&data).unwrap();
        prop_assert_eq!(fit.noise_count(), 0);
        prop_assert!(fit.kinds().iter().all(|k| *k == PointKind::Core));
    }

    #[test]
    fn prop_verbose_mode_is_observational(
        data in dataset(30),
        eps in 0.0f32..3.0,
        min_pts in 1usize..5
    ) {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();

        let quiet = Dbscan::new(eps, min_pts).fit(&data).unwrap();
        let verbose = Dbscan::new(eps, min_pts).with_verbose(true).fit(&data).unwrap();
        prop_assert_eq!(quiet, verbose);
    }
}
