use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use petgraph::visit::EdgeRef;
use serde_json::json;

use super::{ScoredEdge, ScoredNetwork};
use crate::Error;

impl ScoredNetwork {
    /// Exports every edge as a `LineString` feature carrying its scores
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .graph()
            .edge_references()
            .map(|edge| {
                let source = self.graph()[edge.source()].id;
                let target = self.graph()[edge.target()].id;
                edge_feature(source, target, edge.weight())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn edge_feature(source: i64, target: i64, edge: &ScoredEdge) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&edge.geometry));
    let scores = &edge.scores;
    let safety_per_length = (edge.length > 0.0).then(|| scores.safety_score / edge.length);

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "u": source,
            "v": target,
            "key": edge.key,
            "name": edge.name,
            "length": edge.length,
            "speed_kph": edge.speed_kph,
            "travel_time": edge.travel_time,
            "light_count": scores.light_count,
            "curve_score": scores.curve_score,
            "darkness_score": scores.darkness_score,
            "highway_risk": scores.highway_risk,
            "highway_tag": scores.highway_tag,
            "land_risk": scores.land_risk,
            "land_label": scores.land_label,
            "safety_score": scores.safety_score,
            "safety_per_length": safety_per_length,
            "optimized_weight": scores.optimized_weight,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
