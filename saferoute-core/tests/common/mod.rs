#![allow(dead_code)]

use saferoute_core::model::{PointFeature, SegmentInput, StreetNetwork};

pub const SPACING_DEG: f64 = 0.001;

const CLASSES: [&str; 4] = ["primary", "residential", "tertiary", "motorway"];

/// Node id of grid cell `(row, col)`
pub fn grid_id(size: usize, row: usize, col: usize) -> i64 {
    (row * size + col) as i64 + 1
}

/// Square grid of two-way streets around (-78.9, 36.0) with mixed road
/// classes
pub fn grid_network(size: usize) -> StreetNetwork {
    let mut network = StreetNetwork::new();
    for row in 0..size {
        for col in 0..size {
            network.add_node(
                grid_id(size, row, col),
                -78.9 + col as f64 * SPACING_DEG,
                36.0 + row as f64 * SPACING_DEG,
            );
        }
    }

    let mut connect = |a: i64, b: i64, class: &str| {
        let segment = SegmentInput::default().with_highway(class);
        network.add_segment(a, b, segment.clone()).unwrap();
        network.add_segment(b, a, segment).unwrap();
    };

    for row in 0..size {
        for col in 0..size {
            let here = grid_id(size, row, col);
            if col + 1 < size {
                connect(here, grid_id(size, row, col + 1), CLASSES[(row + col) % 4]);
            }
            if row + 1 < size {
                connect(here, grid_id(size, row + 1, col), CLASSES[(row * 3 + col) % 4]);
            }
        }
    }
    network
}

/// Lights placed on every third intersection of the grid
pub fn grid_lights(size: usize) -> Vec<PointFeature> {
    (0..size * size)
        .filter(|index| index % 3 == 0)
        .map(|index| {
            let (row, col) = (index / size, index % size);
            PointFeature::new(
                36.0 + row as f64 * SPACING_DEG,
                -78.9 + col as f64 * SPACING_DEG + 0.0002,
            )
        })
        .collect()
}
