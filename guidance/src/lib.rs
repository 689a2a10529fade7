//! Transforms a raw, node-based road graph into a driver-legible model of intersections for
//! turn-by-turn guidance. For every (node, incoming edge) pair, the raw candidate set is
//! normalized (segregated dual carriageways merged back into single perceived roads, angles
//! re-based and corrected for nearby joining roads) and then every remaining candidate is
//! classified into a turn operation.
//!
//! The engine is a pure function per intersection; it holds no mutable state and performs no
//! writes to the graph, so distinct nodes can be processed concurrently without synchronization
//! as long as the collaborators stay read-only for the batch.

mod config;
mod generator;
mod graph;
mod intersection;
mod mergable;
mod names;
mod normalizer;
mod turn;
mod turn_handler;

pub use crate::config::GuidanceConfig;
pub use crate::generator::{IntersectionGenerator, IntersectionProvider};
pub use crate::graph::{Edge, EdgeData, EdgeID, NameID, NodeID, RoadGraph};
pub use crate::intersection::{ConnectedRoad, Intersection};
pub use crate::mergable::{MergableRoadDetector, SegregatedCarriagewayDetector};
pub use crate::names::{requires_name_announced, SuffixTable};
pub use crate::normalizer::IntersectionNormalizer;
pub use crate::turn::{Modifier, TurnInstruction, TurnKind};
pub use crate::turn_handler::TurnHandler;

/// The full pipeline for one approach: generate the raw candidate set, normalize it, classify
/// it. Stateless; one instance can serve any number of (node, edge) pairs.
pub struct GuidanceEngine<'a> {
    graph: &'a RoadGraph,
    suffixes: &'a SuffixTable,
    detector: &'a dyn MergableRoadDetector,
    lookahead: &'a dyn IntersectionProvider,
    config: &'a GuidanceConfig,
}

impl<'a> GuidanceEngine<'a> {
    pub fn new(
        graph: &'a RoadGraph,
        suffixes: &'a SuffixTable,
        detector: &'a dyn MergableRoadDetector,
        lookahead: &'a dyn IntersectionProvider,
        config: &'a GuidanceConfig,
    ) -> GuidanceEngine<'a> {
        GuidanceEngine {
            graph,
            suffixes,
            detector,
            lookahead,
            config,
        }
    }

    /// The classified intersection reached by following `via` from `from`.
    pub fn process(&self, from: NodeID, via: EdgeID) -> Intersection {
        let node = self.graph.target(via);
        let raw = self.lookahead.intersection_at(from, via);
        let normalizer = IntersectionNormalizer::new(
            self.graph,
            self.suffixes,
            self.detector,
            self.lookahead,
            self.config,
        );
        let normalized = normalizer.normalize(node, raw);
        let handler = TurnHandler::new(self.graph, self.suffixes, self.config);
        if handler.can_process(node, via, &normalized) {
            handler.classify(node, via, normalized)
        } else {
            normalized
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;

    use crate::graph::{EdgeID, NodeID};
    use crate::intersection::{ConnectedRoad, Intersection};
    use crate::{IntersectionProvider, MergableRoadDetector};

    pub struct AlwaysMerge;
    impl MergableRoadDetector for AlwaysMerge {
        fn can_merge_road(&self, _: NodeID, _: &ConnectedRoad, _: &ConnectedRoad) -> bool {
            true
        }
    }

    pub struct NeverMerge;
    impl MergableRoadDetector for NeverMerge {
        fn can_merge_road(&self, _: NodeID, _: &ConnectedRoad, _: &ConnectedRoad) -> bool {
            false
        }
    }

    pub struct NoLookahead;
    impl IntersectionProvider for NoLookahead {
        fn intersection_at(&self, _: NodeID, _: EdgeID) -> Intersection {
            Intersection::default()
        }
    }

    pub struct FixedLookahead(pub HashMap<(NodeID, EdgeID), Intersection>);
    impl IntersectionProvider for FixedLookahead {
        fn intersection_at(&self, from: NodeID, via: EdgeID) -> Intersection {
            self.0.get(&(from, via)).cloned().unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::LonLat;

    use super::*;

    /// A trunk road arriving from the south at a cross of two segregated one-way carriageways
    /// with the same name; after normalization the driver sees a plain four-way intersection.
    #[test]
    fn end_to_end_segregated_cross() {
        let mut graph = RoadGraph::new();
        let south = graph.add_node(LonLat::new(0.0, -0.01));
        let center = graph.add_node(LonLat::new(0.0, 0.0));
        let north = graph.add_node(LonLat::new(0.0, 0.01));
        // the dual carriageway splits only a sliver east and west of the center line
        let east_in = graph.add_node(LonLat::new(0.01, 0.00002));
        let east_out = graph.add_node(LonLat::new(0.01, -0.00002));
        let (via, _) = graph.add_road(south, center, Some("Main Street"), false, false);
        let (to_north, _) = graph.add_road(center, north, Some("Main Street"), false, false);
        let (to_east, _) = graph.add_road(center, east_out, Some("Cross Street"), true, false);
        graph.add_road(east_in, center, Some("Cross Street"), true, false);

        let suffixes = SuffixTable::default();
        let config = GuidanceConfig::default();
        let generator = IntersectionGenerator::new(&graph);
        let detector = SegregatedCarriagewayDetector::new(&graph, &config);
        let engine = GuidanceEngine::new(&graph, &suffixes, &detector, &generator, &config);

        let result = engine.process(south, via);

        // the two Cross Street arcs merged into one perceived road
        assert_eq!(result.degree(), 3);
        assert!(result.is_sorted_by_angle());
        assert_eq!(result.roads[0].angle, 0.0);

        let cross = result
            .roads
            .iter()
            .find(|r| r.edge == to_east)
            .expect("the enterable Cross Street half survives the merge");
        assert!(cross.entry_allowed);
        assert!((cross.angle - 90.0).abs() < 1.0);
        assert_eq!(cross.instruction.unwrap().modifier, Modifier::Right);

        let straight = result.roads.iter().find(|r| r.edge == to_north).unwrap();
        assert_eq!(straight.instruction.unwrap().kind, TurnKind::Continue);
    }

    /// No mergable pairs anywhere: normalization is the identity and classification still runs.
    #[test]
    fn end_to_end_plain_t() {
        let mut graph = RoadGraph::new();
        let south = graph.add_node(LonLat::new(0.0, -0.01));
        let center = graph.add_node(LonLat::new(0.0, 0.0));
        let east = graph.add_node(LonLat::new(0.01, 0.0));
        let west = graph.add_node(LonLat::new(-0.01, 0.0));
        let (via, _) = graph.add_road(south, center, Some("Main Street"), false, false);
        let (to_east, _) = graph.add_road(center, east, Some("Cross Street"), false, false);
        let (to_west, _) = graph.add_road(center, west, Some("Cross Street"), false, false);

        let suffixes = SuffixTable::default();
        let config = GuidanceConfig::default();
        let generator = IntersectionGenerator::new(&graph);
        let detector = SegregatedCarriagewayDetector::new(&graph, &config);
        let engine = GuidanceEngine::new(&graph, &suffixes, &detector, &generator, &config);

        let result = engine.process(south, via);
        assert_eq!(result.degree(), 3);

        let right = result.roads.iter().find(|r| r.edge == to_east).unwrap();
        assert_eq!(right.instruction.unwrap().modifier, Modifier::Right);
        let left = result.roads.iter().find(|r| r.edge == to_west).unwrap();
        assert_eq!(left.instruction.unwrap().modifier, Modifier::Left);
    }
}
