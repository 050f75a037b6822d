//! Street network import from a `GeoJSON` edge export
//!
//! Edges are `LineString` features with `u` and `v` node ids, the shape
//! produced by common OSM graph exporters. Optional `Point` features with an
//! `osmid` (or `id`) property pin node coordinates; otherwise nodes sit at
//! the endpoints of their first edge. An optional `key` tells parallel edges
//! apart; a feature repeating the key of an earlier edge between the same
//! nodes is skipped.

use std::fs;
use std::path::Path;

use geo::{Geometry, LineString};
use geojson::{Feature, GeoJson};
use log::{debug, info, warn};
use serde_json::Value;

use crate::model::{SegmentInput, StreetNetwork};
use crate::{Error, NodeId};

/// Network read from `GeoJSON` and the number of features that were skipped
#[derive(Debug, Default)]
pub struct NetworkImport {
    pub network: StreetNetwork,
    pub skipped_features: usize,
}

/// # Errors
///
/// Returns an error if the file cannot be read or is not a `GeoJSON`
/// `FeatureCollection`.
pub fn load_network_geojson(path: &Path) -> Result<NetworkImport, Error> {
    let text = fs::read_to_string(path)?;
    let import = parse_network_geojson(&text)?;
    info!(
        "Loaded street network from {}: {} nodes, {} edges",
        path.display(),
        import.network.node_count(),
        import.network.edge_count()
    );
    Ok(import)
}

/// # Errors
///
/// Returns [`Error::GeoJsonError`] if `text` is not a `FeatureCollection`.
/// Malformed features are skipped and counted.
pub fn parse_network_geojson(text: &str) -> Result<NetworkImport, Error> {
    let collection = match text
        .parse::<GeoJson>()
        .map_err(|e| Error::GeoJsonError(e.to_string()))?
    {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(Error::GeoJsonError(
                "street network must be a FeatureCollection".to_string(),
            ));
        }
    };

    let mut import = NetworkImport::default();
    let mut edges = Vec::with_capacity(collection.features.len());

    for feature in &collection.features {
        match feature_geometry(feature) {
            Some(Geometry::Point(point)) => match node_id(feature, &["osmid", "id"]) {
                Some(id) => {
                    import.network.add_node(id, point.x(), point.y());
                }
                None => import.skipped_features += 1,
            },
            Some(Geometry::LineString(line)) => match edge_from_feature(feature, line) {
                Some(edge) => edges.push(edge),
                None => import.skipped_features += 1,
            },
            _ => import.skipped_features += 1,
        }
    }

    for EdgeFeature {
        from,
        to,
        key,
        segment,
    } in edges
    {
        let (Some(first), Some(last)) = (
            segment.geometry.as_ref().and_then(|line| line.0.first().copied()),
            segment.geometry.as_ref().and_then(|line| line.0.last().copied()),
        ) else {
            import.skipped_features += 1;
            continue;
        };
        import.network.add_node(from, first.x, first.y);
        import.network.add_node(to, last.x, last.y);
        match key {
            Some(key) => {
                if let Err(e) = import.network.add_keyed_segment(from, to, key, segment) {
                    debug!("Skipping street network feature: {e}");
                    import.skipped_features += 1;
                }
            }
            None => {
                import.network.add_segment(from, to, segment)?;
            }
        }
    }

    if import.skipped_features > 0 {
        warn!(
            "Skipped {} malformed street network features",
            import.skipped_features
        );
    }
    Ok(import)
}

fn feature_geometry(feature: &Feature) -> Option<Geometry<f64>> {
    let geometry = feature.geometry.clone()?;
    geometry
        .try_into()
        .map_err(|e: geojson::Error| debug!("Skipping feature geometry: {e}"))
        .ok()
}

/// Edge read from a `LineString` feature, before its endpoints are known
struct EdgeFeature {
    from: NodeId,
    to: NodeId,
    /// Provider key telling parallel edges apart; assigned when absent
    key: Option<u32>,
    segment: SegmentInput,
}

fn edge_from_feature(feature: &Feature, line: LineString<f64>) -> Option<EdgeFeature> {
    if line.0.len() < 2 {
        return None;
    }
    let from = node_id(feature, &["u"])?;
    let to = node_id(feature, &["v"])?;
    let key = match feature.property("key") {
        None | Some(Value::Null) => None,
        Some(value) => Some(edge_key(value)?),
    };

    let segment = SegmentInput {
        geometry: Some(line),
        length: feature.property("length").and_then(as_f64),
        highway: feature
            .property("highway")
            .map(string_list)
            .unwrap_or_default(),
        speed_kph: feature.property("speed_kph").and_then(as_f64),
        maxspeed: feature
            .property("maxspeed")
            .map(string_list)
            .filter(|values| !values.is_empty())
            .map(|values| values.join(";")),
        name: feature
            .property("name")
            .map(string_list)
            .and_then(|names| names.into_iter().next()),
    };
    Some(EdgeFeature {
        from,
        to,
        key,
        segment,
    })
}

fn edge_key(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|key| u32::try_from(key).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn node_id(feature: &Feature, keys: &[&str]) -> Option<NodeId> {
    keys.iter()
        .find_map(|key| feature.property(key))
        .and_then(|value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// A property that may be a single value or a list of values
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Number(number) => vec![number.to_string()],
        Value::Array(items) => items.iter().flat_map(string_list).collect(),
        _ => Vec::new(),
    }
}
