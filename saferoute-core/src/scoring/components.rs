//! Independent per-edge risk components

use super::land_cover::NlcdClass;

/// Reference multiplier for lights per meter in the darkness score
pub const DEFAULT_DENSITY_SCALE: f64 = 50.0;

/// Straight-line distances below this are degenerate and get no curve penalty
const MIN_STRAIGHT_DISTANCE_M: f64 = 1.0;

/// Land risk for unmapped or unavailable land cover
pub const DEFAULT_LAND_RISK: f64 = 0.6;

pub const UNKNOWN_LAND_LABEL: &str = "Unknown";

/// The four risk components of one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub curve: f64,
    pub darkness: f64,
    pub highway: f64,
    pub land: f64,
}

/// Excess sinuosity: `max(0, actual / straight - 1)`
///
/// Returns 0 when the endpoints are closer than one meter or the actual
/// length is unusable.
pub fn curve_score(actual_length: f64, straight_distance: f64) -> f64 {
    if !straight_distance.is_finite() || straight_distance < MIN_STRAIGHT_DISTANCE_M {
        return 0.0;
    }
    if !actual_length.is_finite() || actual_length <= 0.0 {
        return 0.0;
    }
    (actual_length / straight_distance - 1.0).max(0.0)
}

/// `1 / (1 + lights_per_meter * density_scale)`, exactly 1 without lights
pub fn darkness_score(light_count: u32, length: f64, density_scale: f64) -> f64 {
    let lights_per_meter = if length > 0.0 && length.is_finite() {
        f64::from(light_count) / length
    } else {
        0.0
    };
    1.0 / (1.0 + lights_per_meter * density_scale)
}

/// Risk of an edge's road class and the class that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct HighwayRisk {
    pub risk: f64,
    pub tag: Option<String>,
}

/// Road classes ordered from safest to least safe
#[derive(Debug, Clone)]
pub struct HighwayRanking {
    order: Vec<String>,
}

impl HighwayRanking {
    pub fn new<S: AsRef<str>>(order: &[S]) -> Self {
        Self {
            order: order.iter().map(|tag| normalize_tag(tag.as_ref())).collect(),
        }
    }

    fn rank_risk(&self, tag: &str) -> Option<f64> {
        let rank = self.order.iter().position(|known| known == tag)?;
        if self.order.len() < 2 {
            return Some(0.0);
        }
        #[allow(clippy::cast_precision_loss)]
        Some(rank as f64 / (self.order.len() - 1) as f64)
    }

    /// Risk in [0, 1] for the tags of one edge
    ///
    /// Several tags resolve to the safest recognized one. A single
    /// unrecognized tag is kept for display but scores 1; missing tags or a
    /// list without any recognized tag score 1 with no tag.
    pub fn risk<S: AsRef<str>>(&self, tags: &[S]) -> HighwayRisk {
        match tags {
            [] => HighwayRisk {
                risk: 1.0,
                tag: None,
            },
            [single] => {
                let tag = normalize_tag(single.as_ref());
                HighwayRisk {
                    risk: self.rank_risk(&tag).unwrap_or(1.0),
                    tag: Some(tag),
                }
            }
            many => many
                .iter()
                .map(|tag| normalize_tag(tag.as_ref()))
                .filter_map(|tag| {
                    self.rank_risk(&tag).map(|risk| HighwayRisk {
                        risk,
                        tag: Some(tag),
                    })
                })
                .min_by(|a, b| a.risk.total_cmp(&b.risk))
                .unwrap_or(HighwayRisk {
                    risk: 1.0,
                    tag: None,
                }),
        }
    }
}

/// Lowercases a class and folds link/ramp variants into their base class
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    match tag.strip_suffix("_link") {
        Some(base) => base.to_string(),
        None => tag,
    }
}

/// Land risk tier and label for a sampled land-cover class
pub fn land_risk(class: Option<NlcdClass>) -> (f64, &'static str) {
    match class {
        Some(class) => (class.risk(), class.label()),
        None => (DEFAULT_LAND_RISK, UNKNOWN_LAND_LABEL),
    }
}
