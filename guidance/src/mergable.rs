use geom::angular_deviation;

use crate::config::GuidanceConfig;
use crate::graph::{NodeID, RoadGraph};
use crate::intersection::ConnectedRoad;

/// Authoritative geometric judgment of whether two candidate roads are the two halves of one
/// physical road digitized as opposing one-way carriageways. The normalizer treats this as a
/// black box; name and topology vetoes happen before it's consulted.
pub trait MergableRoadDetector {
    fn can_merge_road(&self, node: NodeID, first: &ConnectedRoad, second: &ConnectedRoad) -> bool;
}

/// The shipped heuristic: both arcs belong to oneway roads, one flows towards the intersection
/// and one away, and they leave within a bounded angular separation of each other.
pub struct SegregatedCarriagewayDetector<'a> {
    graph: &'a RoadGraph,
    config: &'a GuidanceConfig,
}

impl<'a> SegregatedCarriagewayDetector<'a> {
    pub fn new(graph: &'a RoadGraph, config: &'a GuidanceConfig) -> SegregatedCarriagewayDetector<'a> {
        SegregatedCarriagewayDetector { graph, config }
    }
}

impl MergableRoadDetector for SegregatedCarriagewayDetector<'_> {
    fn can_merge_road(&self, _node: NodeID, first: &ConnectedRoad, second: &ConnectedRoad) -> bool {
        if !self.graph.edge_data(first.edge).oneway || !self.graph.edge_data(second.edge).oneway {
            return false;
        }
        // one carriageway carries traffic in, the other out
        if first.entry_allowed == second.entry_allowed {
            return false;
        }
        angular_deviation(first.angle, second.angle) <= self.config.merge_angle
    }
}
