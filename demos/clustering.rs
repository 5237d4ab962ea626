//! DBSCAN on a small 2D dataset.
//!
//! Run with `RUST_LOG=debug` to see every point's classification.

use dbscan::{Clustering, Dbscan, IndexStrategy, Label, PointKind, NOISE};

fn main() {
    env_logger::init();

    // Three well-separated clusters in 2D, a bridge point and two outliers.
    let data: Vec<Vec<f32>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
        // Border of A
        vec![0.9, 0.0],
        // Outliers
        vec![20.0, 20.0],
        vec![-7.0, 3.0],
    ];

    // --- Flat labels (eps=1.0, min_pts=3) ---
    let model = Dbscan::new(1.0, 3).with_verbose(true);
    let labels = model.fit_predict(&data).unwrap();
    println!("=== DBSCAN (eps=1.0, min_pts=3) ===");
    for (i, label) in labels.iter().enumerate() {
        let tag = if *label == NOISE {
            "NOISE".to_string()
        } else {
            format!("cluster {}", label)
        };
        println!("  point {:2} ({:5.1}, {:5.1}) => {}", i, data[i][0], data[i][1], tag);
    }

    // --- Point roles ---
    let fit = model.fit(&data).unwrap();
    println!("\n=== Roles ===");
    for (i, kind) in fit.kinds().iter().enumerate() {
        let role = match kind {
            PointKind::Core => "core",
            PointKind::Border => "border",
            PointKind::Noise => "noise",
        };
        println!("  point {:2} => {}", i, role);
    }

    // --- Grouped output, grid index ---
    let clusters = model
        .with_index(IndexStrategy::Grid)
        .cluster(&data)
        .unwrap();
    println!("\n=== Clusters ===");
    for (label, members) in clusters.iter() {
        match label {
            Label::Cluster(c) => println!("--- cluster {} ({} points)", c, members.len()),
            Label::Noise => println!("--- noise ({} points)", members.len()),
        }
        for point in members {
            println!("  {:?}", point);
        }
    }
}
