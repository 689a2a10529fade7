use serde::{Deserialize, Serialize};

use geom::Distance;

/// Tunable geometry thresholds for normalization and classification. All angles are in degrees.
/// The defaults suit typical street-level map digitization; override them when importing maps
/// with unusual density.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Joining-road corrections only apply when the downstream intersection is closer than this;
    /// past it, a driver sees two separate decision points.
    pub joining_road_distance: Distance,
    /// Guard margin when clamping a joining-road offset against the neighboring candidate's
    /// angular territory.
    pub no_turn_deviation: f64,
    /// Deviation from straight ahead under which a road still just "goes straight".
    pub fuzzy_angle: f64,
    /// Deviation from straight ahead beyond which a continuation stops being obvious.
    pub narrow_turn_angle: f64,
    /// How many times more the competing road must deviate from straight for the other one to be
    /// the obvious continuation.
    pub distinction_ratio: f64,
    /// Two adjacent classified roads closer together than this must never be announced with the
    /// same modifier.
    pub min_distinct_angle: f64,
    /// Maximum angular separation between the two branches of a fork.
    pub fork_angle: f64,
    /// Maximum angular separation accepted by the default segregated-carriageway detector.
    pub merge_angle: f64,
}

impl Default for GuidanceConfig {
    fn default() -> GuidanceConfig {
        GuidanceConfig {
            joining_road_distance: Distance::const_meters(30.0),
            no_turn_deviation: 3.0,
            fuzzy_angle: 15.0,
            narrow_turn_angle: 25.0,
            distinction_ratio: 2.0,
            min_distinct_angle: 15.0,
            fork_angle: 60.0,
            merge_angle: 60.0,
        }
    }
}
