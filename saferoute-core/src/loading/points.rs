//! Point feature (street light) loading from CSV and JSON

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Error;
use crate::model::PointFeature;

#[derive(Debug, Deserialize)]
struct PointRecord {
    #[serde(alias = "latitude", alias = "LAT", alias = "Latitude")]
    lat: f64,
    #[serde(
        alias = "lng",
        alias = "longitude",
        alias = "LON",
        alias = "Longitude"
    )]
    lon: f64,
}

/// Loads point features from a `.csv` or `.json` file, picked by extension
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid CSV/JSON.
/// Individual malformed entries are skipped.
pub fn load_points(path: &Path) -> Result<Vec<PointFeature>, Error> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let points = match extension.as_deref() {
        Some("csv") => read_points_csv(File::open(path)?)?,
        Some("json" | "geojson") => {
            let value: Value = serde_json::from_reader(BufReader::new(File::open(path)?))
                .map_err(|e| Error::InvalidData(format!("{}: {e}", path.display())))?;
            parse_points_json(&value)
        }
        _ => {
            return Err(Error::InvalidData(format!(
                "Unsupported point file format: {}",
                path.display()
            )));
        }
    };

    info!("Loaded {} point features from {}", points.len(), path.display());
    Ok(points)
}

/// Reads `lat`/`lon` columns from CSV, skipping rows that do not parse
///
/// # Errors
///
/// Returns an error if the CSV header cannot be read.
pub fn read_points_csv(reader: impl Read) -> Result<Vec<PointFeature>, Error> {
    let mut reader = csv::Reader::from_reader(reader);
    reader.headers()?;

    let mut skipped = 0_usize;
    let points: Vec<PointFeature> = reader
        .deserialize::<PointRecord>()
        .filter_map(|record| match record {
            Ok(record) => Some(PointFeature::new(record.lat, record.lon)),
            Err(e) => {
                skipped += 1;
                debug!("Skipping point row: {e}");
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!("Skipped {skipped} malformed point rows");
    }
    Ok(points)
}

/// Extracts points from loosely shaped JSON
///
/// Accepts a list (or an object wrapping one under `data` or `results`) of
/// objects with `latitude`/`longitude` or `lat` and `lng`/`lon` keys, or of
/// two-element `[lat, lon]` arrays. A pair is read as `[lat, lon]` whenever
/// its values fit that order and as `[lon, lat]` only when the first value is
/// out of latitude range, so ambiguous pairs stay `[lat, lon]`. A GeoJSON
/// `FeatureCollection` of points is read as well.
pub fn parse_points_json(value: &Value) -> Vec<PointFeature> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(object) => match ["data", "results", "features"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array))
        {
            Some(items) => items.as_slice(),
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let points: Vec<PointFeature> = items.iter().filter_map(parse_point).collect();
    if points.len() < items.len() {
        warn!(
            "Skipped {} malformed point entries",
            items.len() - points.len()
        );
    }
    points
}

fn parse_point(item: &Value) -> Option<PointFeature> {
    match item {
        Value::Object(object) => parse_point_object(object),
        Value::Array(pair) if pair.len() >= 2 => {
            let a = number(&pair[0])?;
            let b = number(&pair[1])?;
            if (-90.0..=90.0).contains(&a) && (-180.0..=180.0).contains(&b) {
                Some(PointFeature::new(a, b))
            } else if (-90.0..=90.0).contains(&b) && (-180.0..=180.0).contains(&a) {
                Some(PointFeature::new(b, a))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_point_object(object: &Map<String, Value>) -> Option<PointFeature> {
    let field = |name: &str| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| number(value))
    };

    if let (Some(lat), Some(lon)) = (field("latitude"), field("longitude")) {
        return Some(PointFeature::new(lat, lon));
    }
    if let Some(lat) = field("lat")
        && let Some(lon) = field("lng").or_else(|| field("lon"))
    {
        return Some(PointFeature::new(lat, lon));
    }

    // GeoJSON point feature
    let coordinates = object
        .get("geometry")?
        .get("coordinates")?
        .as_array()?;
    let lon = number(coordinates.first()?)?;
    let lat = number(coordinates.get(1)?)?;
    Some(PointFeature::new(lat, lon))
}

fn number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    number.filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_wrapped_objects_with_mixed_case_keys() {
        let value = json!({
            "data": [
                {"Latitude": 35.99, "Longitude": -78.90},
                {"lat": "36.0", "lng": -78.91},
                {"lat": 36.1, "lon": -78.92},
                {"name": "no coordinates"}
            ]
        });

        let points = parse_points_json(&value);
        assert_eq!(
            points,
            vec![
                PointFeature::new(35.99, -78.90),
                PointFeature::new(36.0, -78.91),
                PointFeature::new(36.1, -78.92),
            ]
        );
    }

    #[test]
    fn infers_pair_order_from_ranges() {
        let value = json!([[35.5, -78.9], [-122.4, 37.7], [200.0, 300.0]]);
        let points = parse_points_json(&value);
        assert_eq!(
            points,
            vec![
                PointFeature::new(35.5, -78.9),
                PointFeature::new(37.7, -122.4)
            ]
        );
    }

    #[test]
    fn ambiguous_pairs_are_lat_lon() {
        let value = json!([[-78.9, 35.5]]);
        assert_eq!(parse_points_json(&value), vec![PointFeature::new(-78.9, 35.5)]);
    }

    #[test]
    fn reads_geojson_points() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-78.9, 35.9]}, "properties": {}}
            ]
        });
        assert_eq!(parse_points_json(&value), vec![PointFeature::new(35.9, -78.9)]);
    }

    #[test]
    fn unsupported_shapes_yield_nothing() {
        assert!(parse_points_json(&json!({"other": []})).is_empty());
        assert!(parse_points_json(&json!(42)).is_empty());
    }

    #[test]
    fn csv_skips_bad_rows() {
        let data = "lat,lon\n35.9,-78.9\nnot,a number\n36.0,-79.0\n";
        let points = read_points_csv(data.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], PointFeature::new(36.0, -79.0));
    }
}
