use log::debug;

use geom::{adjust_angle, angular_deviation, combine_angles};

use crate::config::GuidanceConfig;
use crate::generator::IntersectionProvider;
use crate::graph::{NodeID, RoadGraph};
use crate::intersection::{ConnectedRoad, Intersection};
use crate::mergable::MergableRoadDetector;
use crate::names::{requires_name_announced, SuffixTable};

/// Rewrites a raw intersection into the form a driver actually perceives: merges segregated
/// carriageways back into single roads, then re-angles candidates that resolve into a nearby
/// downstream merge. Runs before any turn classification.
pub struct IntersectionNormalizer<'a> {
    graph: &'a RoadGraph,
    suffixes: &'a SuffixTable,
    detector: &'a dyn MergableRoadDetector,
    lookahead: &'a dyn IntersectionProvider,
    config: &'a GuidanceConfig,
}

impl<'a> IntersectionNormalizer<'a> {
    pub fn new(
        graph: &'a RoadGraph,
        suffixes: &'a SuffixTable,
        detector: &'a dyn MergableRoadDetector,
        lookahead: &'a dyn IntersectionProvider,
        config: &'a GuidanceConfig,
    ) -> IntersectionNormalizer<'a> {
        IntersectionNormalizer {
            graph,
            suffixes,
            detector,
            lookahead,
            config,
        }
    }

    /// The two passes must run in this order; the joining-road adjustment assumes angles are
    /// already re-based around merged carriageways.
    pub fn normalize(&self, node: NodeID, intersection: Intersection) -> Intersection {
        let result =
            self.adjust_for_joining_roads(node, self.merge_segregated_roads(node, intersection));
        result.assert_valid();
        result
    }

    /// Whether two candidates represent the same physical road split into opposing one-way
    /// carriageways. All rules must pass:
    ///
    /// 1. Degree two never merges; that's a bollard, a traffic light, or a roundabout entry.
    /// 2. Both roads must be named.
    /// 3. The names must match modulo suffix variants.
    /// 4. The geometric detector must independently confirm the merge.
    pub fn can_merge(
        &self,
        node: NodeID,
        intersection: &Intersection,
        first_index: usize,
        second_index: usize,
    ) -> bool {
        self.mergable(
            node,
            intersection.degree(),
            &intersection.roads[first_index],
            &intersection.roads[second_index],
        )
    }

    fn mergable(
        &self,
        node: NodeID,
        degree: usize,
        first: &ConnectedRoad,
        second: &ConnectedRoad,
    ) -> bool {
        if degree <= 2 {
            return false;
        }

        let first_name = self.graph.edge_data(first.edge).name;
        let second_name = self.graph.edge_data(second.edge).name;
        let (first_name, second_name) = match (first_name, second_name) {
            (Some(a), Some(b)) => (a, b),
            // name-based matching is meaningless without names
            _ => return false,
        };
        if requires_name_announced(
            self.graph.name(first_name),
            self.graph.name(second_name),
            self.suffixes,
        ) {
            return false;
        }

        self.detector.can_merge_road(node, first, second)
    }

    /// The merged road keeps the edge and attributes of whichever input is legally enterable;
    /// angle and bearing become the circular midpoints.
    fn merge(first: &ConnectedRoad, second: &ConnectedRoad) -> ConnectedRoad {
        let mut result = if first.entry_allowed {
            first.clone()
        } else {
            second.clone()
        };
        result.angle = combine_angles(first.angle, second.angle);
        result.bearing = combine_angles(first.bearing, second.bearing);
        result.assert_valid();
        result
    }

    /// Segregated roads often meet an intersection as two separate candidates:
    ///
    /// ```text
    ///         b<b<b<b(1)<b<b<b
    /// aaaaa-b
    ///         b>b>b>b(2)>b>b>b
    /// ```
    ///
    /// Going from a to (2) would look like a slight turn, and (1) to (2) like a sharp one, even
    /// though a driver sees one plain road. This pass collapses each mergable pair into a single
    /// candidate.
    ///
    /// A merge involving the back-bearing entry moves the perceived location of the incoming road
    /// itself, so every other angle is re-based around the new straight-ahead first; only then
    /// does the general pass fold the remaining pairs together.
    pub fn merge_segregated_roads(&self, node: NodeID, mut intersection: Intersection) -> Intersection {
        if intersection.degree() <= 1 {
            return intersection;
        }
        debug_assert!(intersection.is_sorted_by_angle());

        let is_connected_to_roundabout = intersection
            .roads
            .iter()
            .any(|road| self.graph.edge_data(road.edge).roundabout);

        // Both back-bearing merges consume index 0, so at most one of them can fire.
        let last = intersection.degree() - 1;
        let mut merged_back = false;
        if self.can_merge(node, &intersection, 0, last) {
            merged_back = true;
            // the incoming road moves counter-clockwise; everything else shifts with it
            let correction = (360.0 - intersection.roads[last].angle) / 2.0;
            for road in &mut intersection.roads[1..last] {
                road.angle += correction;
                road.assert_valid();
            }
            let merged = Self::merge(&intersection.roads[0], &intersection.roads[last]);
            intersection.roads[0] = merged;
            intersection.roads[0].angle = 0.0;
            intersection.roads.pop();
        } else if self.can_merge(node, &intersection, 0, 1) {
            merged_back = true;
            let correction = intersection.roads[1].angle / 2.0;
            for road in &mut intersection.roads[2..] {
                road.angle -= correction;
                road.assert_valid();
            }
            let merged = Self::merge(&intersection.roads[0], &intersection.roads[1]);
            intersection.roads[0] = merged;
            intersection.roads[0].angle = 0.0;
            intersection.roads.remove(1);
        }

        if merged_back && is_connected_to_roundabout {
            // The u-turn was merged against the flow of a roundabout. Never offer it, even
            // without an explicit restriction.
            intersection.roads[0].entry_allowed = false;
        }

        // General pass: fold each remaining candidate onto its counter-clockwise neighbor.
        // Building a fresh sequence still catches chained merges; after a merge, the next
        // candidate compares against the merged result. Indices 0 and 1 were settled above.
        if intersection.degree() > 2 {
            let mut degree = intersection.degree();
            let input = std::mem::take(&mut intersection.roads);
            let mut roads: Vec<ConnectedRoad> = Vec::with_capacity(input.len());
            for (index, road) in input.into_iter().enumerate() {
                if index < 2 {
                    roads.push(road);
                    continue;
                }
                let neighbor = roads.last().unwrap();
                if self.mergable(node, degree, neighbor, &road) {
                    let merged = Self::merge(neighbor, &road);
                    *roads.last_mut().unwrap() = merged;
                    degree -= 1;
                } else {
                    roads.push(road);
                }
            }
            intersection.roads = roads;
        }

        intersection.sort_by_angle();
        intersection
    }

    /// Joining roads can be digitized with very steep local angles:
    ///
    /// ```text
    ///        x
    ///        |
    ///        v __________c
    ///       /
    /// a ---d
    ///       \ __________b
    /// ```
    ///
    /// With c->d and d->b as oneways that merge just past d, the turn from x towards d is really
    /// a turn towards a. When the downstream intersection is close enough to read as the same
    /// decision point, bias this candidate's angle towards the merged direction, clamped so it
    /// never crosses into a neighboring turn's angular territory.
    pub fn adjust_for_joining_roads(
        &self,
        node: NodeID,
        mut intersection: Intersection,
    ) -> Intersection {
        // nothing to correct at a dead end
        if intersection.degree() <= 1 {
            return intersection;
        }

        let at = self.graph.coordinate(node);
        let degree = intersection.degree();
        // never adjust the back-bearing entry
        for index in 1..degree {
            let road = intersection.roads[index].clone();
            let next_intersection = self.lookahead.intersection_at(node, road.edge);
            if next_intersection.degree() <= 1 {
                debug!("no usable lookahead from {} via {}", node, road.edge);
                continue;
            }

            let next_node = self.graph.target(road.edge);
            if at.gps_dist_meters(self.graph.coordinate(next_node))
                > self.config.joining_road_distance
            {
                continue;
            }

            // a single road beyond the back-bearing can't read as a joining fork
            if next_intersection.degree() <= 2 {
                continue;
            }

            let half_gap = |a: &ConnectedRoad, b: &ConnectedRoad| {
                0.5 * angular_deviation(a.angle, b.angle)
            };
            // Cap the offset so this turn never overtakes the neighboring one
            let corrected = |offset: f64, neighbor: &ConnectedRoad| {
                let limit = angular_deviation(road.angle, neighbor.angle);
                if offset + self.config.no_turn_deviation > limit {
                    0.5 * limit
                } else {
                    offset
                }
            };

            let next_last = next_intersection.degree() - 1;
            if self.can_merge(next_node, &next_intersection, 0, 1) {
                // the downstream merge pulls to the right, so the perceived turn shifts left
                let offset = half_gap(&next_intersection.roads[0], &next_intersection.roads[1]);
                let offset = corrected(offset, &intersection.roads[(index + 1) % degree]);
                let road = &mut intersection.roads[index];
                road.angle = adjust_angle(road.angle, offset);
                road.bearing = adjust_angle(road.bearing, offset);
                road.assert_valid();
            } else if self.can_merge(next_node, &next_intersection, 0, next_last) {
                // merged to the left; shift this turn to the right
                let offset = half_gap(
                    &next_intersection.roads[0],
                    &next_intersection.roads[next_last],
                );
                let offset = corrected(offset, &intersection.roads[index - 1]);
                let road = &mut intersection.roads[index];
                road.angle = adjust_angle(road.angle, -offset);
                road.bearing = adjust_angle(road.bearing, -offset);
                road.assert_valid();
            }
        }
        intersection
    }
}
