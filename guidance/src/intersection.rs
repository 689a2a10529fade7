use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::graph::EdgeID;
use crate::turn::TurnInstruction;

/// One outgoing road considered as a possible maneuver, as perceived from the incoming road.
#[derive(Clone, Debug, Serialize)]
pub struct ConnectedRoad {
    pub edge: EdgeID,
    /// Turn angle in degrees in `[0, 360)`, relative to the back-bearing: 0 reverses onto the
    /// road just traveled, 180 continues straight, below 180 turns right, above 180 left.
    pub angle: f64,
    /// Compass bearing in degrees in `[0, 360)`, independent of the angle.
    pub bearing: f64,
    /// Whether traffic may legally proceed onto this road.
    pub entry_allowed: bool,
    /// Assigned by the turn handler.
    pub instruction: Option<TurnInstruction>,
}

impl ConnectedRoad {
    pub fn new(edge: EdgeID, angle: f64, bearing: f64, entry_allowed: bool) -> ConnectedRoad {
        let road = ConnectedRoad {
            edge,
            angle,
            bearing,
            entry_allowed,
            instruction: None,
        };
        road.assert_valid();
        road
    }

    pub fn assert_valid(&self) {
        assert!(
            (0.0..360.0).contains(&self.angle),
            "turn angle {} out of range for {}",
            self.angle,
            self.edge
        );
        assert!(
            (0.0..360.0).contains(&self.bearing),
            "bearing {} out of range for {}",
            self.bearing,
            self.edge
        );
    }
}

/// The ordered candidate roads observable from one incoming road at one graph node, sorted
/// ascending by angle. Index 0 always holds the back-bearing (u-turn) entry at angle 0.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Intersection {
    pub roads: Vec<ConnectedRoad>,
}

impl Intersection {
    pub fn new(roads: Vec<ConnectedRoad>) -> Intersection {
        Intersection { roads }
    }

    /// The number of candidate roads, including the back-bearing entry.
    pub fn degree(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn sort_by_angle(&mut self) {
        self.roads.sort_by_key(|r| OrderedFloat(r.angle));
    }

    pub fn is_sorted_by_angle(&self) -> bool {
        self.roads.windows(2).all(|pair| pair[0].angle <= pair[1].angle)
    }

    pub fn assert_valid(&self) {
        for road in &self.roads {
            road.assert_valid();
        }
        if let Some(first) = self.roads.first() {
            assert_eq!(
                first.angle, 0.0,
                "the back-bearing entry must stay at angle 0"
            );
        }
    }
}
