use log::warn;

use crate::graph::{EdgeID, NodeID, RoadGraph};
use crate::intersection::{ConnectedRoad, Intersection};

/// The one-hop lookahead seam: builds the raw, unmerged, unclassified candidate set for the
/// intersection reached by following `via` from `from`. Both the normalizer and the turn handler
/// depend on this to look one intersection ahead.
pub trait IntersectionProvider {
    fn intersection_at(&self, from: NodeID, via: EdgeID) -> Intersection;
}

/// Builds intersections straight from graph coordinates: every adjacent arc becomes a candidate,
/// with its compass bearing from the forward azimuth and its turn angle measured clockwise-
/// negative from the back-bearing, so the u-turn lands at angle 0 and straight ahead near 180.
pub struct IntersectionGenerator<'a> {
    graph: &'a RoadGraph,
}

impl<'a> IntersectionGenerator<'a> {
    pub fn new(graph: &'a RoadGraph) -> IntersectionGenerator<'a> {
        IntersectionGenerator { graph }
    }
}

impl IntersectionProvider for IntersectionGenerator<'_> {
    fn intersection_at(&self, from: NodeID, via: EdgeID) -> Intersection {
        debug_assert_eq!(self.graph.edge(via).src, from);
        let node = self.graph.target(via);
        let origin = self.graph.coordinate(node);
        let back = self.graph.edge(via).twin;
        let back_bearing = origin.forward_azimuth(self.graph.coordinate(from));
        if origin == self.graph.coordinate(from) {
            warn!("zero-length arc {} into {}; bearings are arbitrary", via, node);
        }

        let mut roads = Vec::new();
        for &e in self.graph.adjacent_edges(node) {
            let entry_allowed = !self.graph.edge_data(e).wrong_way;
            if e == back {
                roads.push(ConnectedRoad::new(e, 0.0, back_bearing, entry_allowed));
                continue;
            }
            let bearing = origin.forward_azimuth(self.graph.coordinate(self.graph.target(e)));
            let angle = (back_bearing - bearing).rem_euclid(360.0);
            roads.push(ConnectedRoad::new(e, angle, bearing, entry_allowed));
        }

        let mut intersection = Intersection::new(roads);
        intersection.sort_by_angle();
        // a candidate angle can tie with the back-bearing at exactly 0
        if let Some(pos) = intersection.roads.iter().position(|r| r.edge == back) {
            if pos != 0 {
                let road = intersection.roads.remove(pos);
                intersection.roads.insert(0, road);
            }
        }
        intersection.assert_valid();
        intersection
    }
}
