//! Travel speed assignment for segments without a usable speed

use super::components::normalize_tag;
use super::config::SpeedTable;
use crate::model::SegmentInput;

const KPH_PER_MPH: f64 = 1.609_344;

/// Speed in km/h: explicit speed, then `maxspeed`, then the class default,
/// then the fallback
pub fn resolve_speed(segment: &SegmentInput, class: Option<&str>, table: &SpeedTable) -> f64 {
    if let Some(speed) = segment.speed_kph.filter(|s| s.is_finite() && *s > 0.0) {
        return speed;
    }
    if let Some(speed) = segment.maxspeed.as_deref().and_then(parse_maxspeed) {
        return speed;
    }
    class
        .map(normalize_tag)
        .and_then(|class| table.class_kph.get(&class).copied())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(table.fallback_kph)
}

/// Parses OSM `maxspeed` values such as `"50"`, `"35 mph"` or `"50;60"`
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let first = raw.split(';').next()?.trim().to_lowercase();
    let (number, factor) = match first.strip_suffix("mph") {
        Some(number) => (number.trim(), KPH_PER_MPH),
        None => (first.strip_suffix("km/h").unwrap_or(&first).trim(), 1.0),
    };
    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .map(|value| value * factor)
}

/// Seconds needed to cover `length` meters at `speed_kph`
pub fn travel_time(length: f64, speed_kph: f64) -> f64 {
    if length <= 0.0 || speed_kph <= 0.0 {
        return 0.0;
    }
    length / (speed_kph / 3.6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_maxspeed_forms() {
        assert_eq!(parse_maxspeed("50"), Some(50.0));
        assert_eq!(parse_maxspeed("50;60"), Some(50.0));
        assert_eq!(parse_maxspeed("60 km/h"), Some(60.0));
        assert!((parse_maxspeed("35 mph").unwrap() - 56.327_04).abs() < 1e-9);
        assert_eq!(parse_maxspeed("none"), None);
        assert_eq!(parse_maxspeed("signals"), None);
        assert_eq!(parse_maxspeed("-5"), None);
    }

    #[test]
    fn speed_resolution_order() {
        let table = SpeedTable::default();
        let explicit = SegmentInput {
            speed_kph: Some(42.0),
            maxspeed: Some("80".into()),
            ..SegmentInput::default()
        };
        assert_eq!(resolve_speed(&explicit, Some("motorway"), &table), 42.0);

        let tagged = SegmentInput {
            maxspeed: Some("80".into()),
            ..SegmentInput::default()
        };
        assert_eq!(resolve_speed(&tagged, Some("motorway"), &table), 80.0);

        let bare = SegmentInput::default();
        assert_eq!(resolve_speed(&bare, Some("motorway_link"), &table), 110.0);
        assert_eq!(resolve_speed(&bare, Some("bridleway"), &table), 40.0);
        assert_eq!(resolve_speed(&bare, None, &table), 40.0);
    }

    #[test]
    fn travel_time_from_length_and_speed() {
        assert!((travel_time(100.0, 36.0) - 10.0).abs() < 1e-12);
        assert_eq!(travel_time(0.0, 36.0), 0.0);
    }
}
