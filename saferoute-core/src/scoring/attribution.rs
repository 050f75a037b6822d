//! Spatial join of point features onto nearby street segments
//!
//! A point credits every segment within the proximity radius, not only the
//! nearest one: a light at an intersection illuminates all adjacent streets.

use geo::{BoundingRect, Distance, Euclidean, LineString, Point};
use hashbrown::HashMap;
use log::{debug, warn};
use petgraph::graph::EdgeIndex;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

use crate::model::{PointFeature, Projection};

/// Reference proximity radius in meters
pub const DEFAULT_PROXIMITY_RADIUS_M: f64 = 15.0;

type SegmentEnvelope = GeomWithData<Rectangle<[f64; 2]>, EdgeIndex>;

/// Outcome of attributing point features to segments
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    /// Points within the radius of each edge; absent edges have zero
    pub counts: HashMap<EdgeIndex, u32>,
    /// Malformed points that were ignored
    pub skipped_points: usize,
    /// Segments without a usable geometry that were left out of the index
    pub skipped_segments: usize,
    /// The index could not be built and every count is zero
    pub degraded: bool,
    /// Distances were measured in projected meters rather than degrees
    pub projected: bool,
}

impl Attribution {
    pub fn count(&self, edge: EdgeIndex) -> u32 {
        self.counts.get(&edge).copied().unwrap_or(0)
    }
}

/// Single-use R-tree over segment envelopes, keyed by edge index
struct SegmentIndex {
    tree: RTree<SegmentEnvelope>,
    geometries: HashMap<EdgeIndex, LineString<f64>>,
    skipped: usize,
}

impl SegmentIndex {
    fn build(segments: impl IntoIterator<Item = (EdgeIndex, LineString<f64>)>) -> Option<Self> {
        let mut envelopes = Vec::new();
        let mut geometries = HashMap::new();
        let mut skipped = 0;
        let mut total = 0;

        for (edge, line) in segments {
            total += 1;
            let finite = line.coords().all(|c| c.x.is_finite() && c.y.is_finite());
            match line.bounding_rect() {
                Some(rect) if finite => {
                    envelopes.push(SegmentEnvelope::new(
                        Rectangle::from_corners(
                            [rect.min().x, rect.min().y],
                            [rect.max().x, rect.max().y],
                        ),
                        edge,
                    ));
                    geometries.insert(edge, line);
                }
                _ => {
                    debug!("Skipping segment {} with unusable geometry", edge.index());
                    skipped += 1;
                }
            }
        }

        if envelopes.is_empty() && total > 0 {
            return None;
        }

        Some(Self {
            tree: RTree::bulk_load(envelopes),
            geometries,
            skipped,
        })
    }

    /// Edges whose geometry lies within `radius` of `point`
    fn edges_within(&self, point: Point<f64>, radius: f64) -> impl Iterator<Item = EdgeIndex> + '_ {
        let envelope = AABB::from_corners(
            [point.x() - radius, point.y() - radius],
            [point.x() + radius, point.y() + radius],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(move |candidate| {
                let line = self.geometries.get(&candidate.data)?;
                (Euclidean.distance(&point, line) <= radius).then_some(candidate.data)
            })
    }
}

/// Counts point features within `radius_m` of each segment
///
/// `segments` must already be in the coordinate system of `projection`.
/// Malformed points are skipped one by one; if no segment can be indexed at
/// all, every count degrades to zero instead of failing the pipeline.
pub fn attribute_points(
    segments: impl IntoIterator<Item = (EdgeIndex, LineString<f64>)>,
    points: &[PointFeature],
    projection: &Projection,
    radius_m: f64,
) -> Attribution {
    let projected = projection.is_projected();
    if !projected {
        warn!(
            "No planar projection available; measuring light proximity in degrees, \
            distances are approximate"
        );
    }

    let Some(index) = SegmentIndex::build(segments) else {
        warn!("Segment index could not be built; all light counts set to 0");
        return Attribution {
            degraded: true,
            projected,
            ..Attribution::default()
        };
    };

    let radius = projection.distance_units(radius_m);
    let mut counts: HashMap<EdgeIndex, u32> = HashMap::new();
    let mut skipped_points = 0;

    for feature in points {
        if !feature.is_valid() {
            skipped_points += 1;
            continue;
        }
        let location: Point<f64> = projection.project(feature.lon, feature.lat).into();
        for edge in index.edges_within(location, radius) {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }

    if skipped_points > 0 {
        warn!("Skipped {skipped_points} malformed point features");
    }

    let skipped_segments = index.skipped;
    if skipped_segments > 0 {
        warn!("Skipped {skipped_segments} segments with unusable geometry");
    }
    // The index is only needed while attributing
    drop(index);

    Attribution {
        counts,
        skipped_points,
        skipped_segments,
        degraded: false,
        projected,
    }
}
