use ordered_float::OrderedFloat;

use geom::{angular_deviation, combine_angles, deviation_from_straight, STRAIGHT_ANGLE};

use crate::config::GuidanceConfig;
use crate::graph::{EdgeID, NodeID, RoadGraph};
use crate::intersection::{ConnectedRoad, Intersection};
use crate::names::{requires_name_announced, SuffixTable};
use crate::turn::{Modifier, TurnInstruction, TurnKind};

/// Classifies every candidate of a normalized intersection into a turn operation. Dispatch is
/// purely a function of the normalized degree. `can_process` must be checked before `classify`;
/// classifying an intersection this handler can't process is a contract violation, not a
/// recoverable condition.
pub struct TurnHandler<'a> {
    graph: &'a RoadGraph,
    suffixes: &'a SuffixTable,
    config: &'a GuidanceConfig,
}

impl<'a> TurnHandler<'a> {
    pub fn new(
        graph: &'a RoadGraph,
        suffixes: &'a SuffixTable,
        config: &'a GuidanceConfig,
    ) -> TurnHandler<'a> {
        TurnHandler {
            graph,
            suffixes,
            config,
        }
    }

    pub fn can_process(&self, _node: NodeID, _via: EdgeID, intersection: &Intersection) -> bool {
        !intersection.is_empty()
    }

    pub fn classify(
        &self,
        node: NodeID,
        via: EdgeID,
        mut intersection: Intersection,
    ) -> Intersection {
        assert!(
            self.can_process(node, via, &intersection),
            "classify called at {} on an intersection the turn handler can't process",
            node
        );

        if intersection.roads[0].entry_allowed {
            intersection.roads[0].instruction = Some(TurnInstruction::uturn());
        }

        let result = match intersection.degree() {
            // dead end; reversing is the only option
            1 => intersection,
            2 => self.handle_one_way(intersection),
            3 => self.handle_two_way(via, intersection),
            4 => self.handle_three_way(via, intersection),
            _ => self.handle_complex(intersection),
        };
        result.assert_valid();
        result
    }

    /// The sole forward candidate is the only legal move; it reads as a continuation no matter
    /// the geometry.
    fn handle_one_way(&self, mut intersection: Intersection) -> Intersection {
        let road = &mut intersection.roads[1];
        if road.entry_allowed {
            road.instruction = Some(TurnInstruction {
                kind: TurnKind::Continue,
                modifier: Modifier::forward(road.angle),
            });
        }
        intersection
    }

    /// Two forward candidates: either one of them is the obvious way to keep going, or both get
    /// announced as real turns.
    fn handle_two_way(&self, via: EdgeID, mut intersection: Intersection) -> Intersection {
        let first_obvious =
            self.is_obvious_of_two(via, &intersection.roads[1], &intersection.roads[2]);
        let second_obvious =
            self.is_obvious_of_two(via, &intersection.roads[2], &intersection.roads[1]);
        match (first_obvious, second_obvious) {
            (true, false) => {
                Self::assign_continue(&mut intersection.roads[1]);
                Self::assign_turn(&mut intersection.roads[2]);
            }
            (false, true) => {
                Self::assign_continue(&mut intersection.roads[2]);
                Self::assign_turn(&mut intersection.roads[1]);
            }
            _ => {
                Self::assign_turn(&mut intersection.roads[1]);
                Self::assign_turn(&mut intersection.roads[2]);
                let (head, tail) = intersection.roads.split_at_mut(2);
                self.handle_distinct_conflict(&mut tail[0], &mut head[1]);
            }
        }
        intersection
    }

    /// Three forward candidates: either two of them fork around straight ahead, or one dominant
    /// through-road carries on while the branches are ordinary turns.
    fn handle_three_way(&self, via: EdgeID, mut intersection: Intersection) -> Intersection {
        if let Some((right, left)) = self.find_fork(&intersection) {
            Self::assign_fork(&mut intersection.roads[right], Modifier::SlightRight);
            Self::assign_fork(&mut intersection.roads[left], Modifier::SlightLeft);
            for index in 1..intersection.degree() {
                if index != right && index != left {
                    Self::assign_turn(&mut intersection.roads[index]);
                }
            }
            return intersection;
        }

        let best = (1..intersection.degree())
            .min_by_key(|&i| OrderedFloat(deviation_from_straight(intersection.roads[i].angle)))
            .unwrap();
        let best_is_obvious = (1..intersection.degree()).filter(|&i| i != best).all(|i| {
            self.is_obvious_of_two(via, &intersection.roads[best], &intersection.roads[i])
        });
        for index in 1..intersection.degree() {
            if index == best && best_is_obvious {
                Self::assign_continue(&mut intersection.roads[index]);
            } else {
                Self::assign_turn(&mut intersection.roads[index]);
            }
        }
        // side branches announced identically would be ambiguous
        for index in 2..intersection.degree() {
            let (head, tail) = intersection.roads.split_at_mut(index);
            self.handle_distinct_conflict(&mut tail[0], &mut head[index - 1]);
        }
        intersection
    }

    /// Four or more forward candidates: partition at the straight-ahead axis and walk each group
    /// outward, assigning severity by angle and forcing near-duplicates apart.
    fn handle_complex(&self, mut intersection: Intersection) -> Intersection {
        self.assign_right_turns(&mut intersection);
        self.assign_left_turns(&mut intersection);
        intersection
    }

    /// A candidate is the obvious continuation if it stays close to straight while the
    /// alternative clearly turns away, or if it carries the incoming road's name onward and the
    /// alternative deviates at least `distinction_ratio` times as much.
    fn is_obvious_of_two(&self, via: EdgeID, road: &ConnectedRoad, other: &ConnectedRoad) -> bool {
        if !road.entry_allowed {
            return false;
        }
        let deviation = deviation_from_straight(road.angle);
        let other_deviation = deviation_from_straight(other.angle);

        if deviation < self.config.fuzzy_angle && other_deviation > self.config.narrow_turn_angle {
            return !self.name_changes(via, road.edge);
        }
        !self.name_changes(via, road.edge)
            && deviation <= self.config.narrow_turn_angle
            && deviation * self.config.distinction_ratio <= other_deviation
    }

    fn name_changes(&self, via: EdgeID, onto: EdgeID) -> bool {
        match (
            self.graph.edge_data(via).name,
            self.graph.edge_data(onto).name,
        ) {
            (Some(from), Some(to)) => {
                requires_name_announced(self.graph.name(from), self.graph.name(to), self.suffixes)
            }
            // gaining or losing a name isn't a turn-worthy change on its own
            _ => false,
        }
    }

    /// Two adjacent candidates symmetric around straight ahead form a fork. Returns the
    /// (right branch, left branch) indices.
    fn find_fork(&self, intersection: &Intersection) -> Option<(usize, usize)> {
        for index in 1..intersection.degree() - 1 {
            let right = &intersection.roads[index];
            let left = &intersection.roads[index + 1];
            if !right.entry_allowed || !left.entry_allowed {
                continue;
            }
            if angular_deviation(right.angle, left.angle) > self.config.fork_angle {
                continue;
            }
            let midpoint = combine_angles(right.angle, left.angle);
            if deviation_from_straight(midpoint) > self.config.fuzzy_angle {
                continue;
            }
            return Some((index, index + 1));
        }
        None
    }

    /// Walks the candidates right of straight ahead, from straight outward, assigning severity
    /// and splitting near-duplicates.
    fn assign_right_turns(&self, intersection: &mut Intersection) {
        let last_right = (1..intersection.degree())
            .take_while(|&i| intersection.roads[i].angle <= STRAIGHT_ANGLE)
            .last();
        let last_right = match last_right {
            Some(i) => i,
            None => return,
        };
        for index in (1..=last_right).rev() {
            Self::assign_turn(&mut intersection.roads[index]);
        }
        for index in (1..last_right).rev() {
            let (head, tail) = intersection.roads.split_at_mut(index + 1);
            self.handle_distinct_conflict(&mut tail[0], &mut head[index]);
        }
    }

    /// Mirror image of `assign_right_turns` for the left of straight ahead.
    fn assign_left_turns(&self, intersection: &mut Intersection) {
        let degree = intersection.degree();
        let first_left = match (1..degree).find(|&i| intersection.roads[i].angle > STRAIGHT_ANGLE)
        {
            Some(i) => i,
            None => return,
        };
        for index in first_left..degree {
            Self::assign_turn(&mut intersection.roads[index]);
        }
        for index in first_left + 1..degree {
            let (head, tail) = intersection.roads.split_at_mut(index);
            self.handle_distinct_conflict(&mut tail[0], &mut head[index - 1]);
        }
    }

    /// Two adjacent candidates closer than `min_distinct_angle` and headed for the same
    /// announcement must land in different severity buckets: push the outer road further out, or
    /// pull the inner one towards straight if the outer bucket is already the sharpest. `left`
    /// must be the larger-angle road.
    fn handle_distinct_conflict(&self, left: &mut ConnectedRoad, right: &mut ConnectedRoad) {
        debug_assert!(left.angle >= right.angle);
        let (left_instruction, right_instruction) = match (left.instruction, right.instruction) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };
        if left_instruction.modifier != right_instruction.modifier {
            return;
        }
        if angular_deviation(left.angle, right.angle) >= self.config.min_distinct_angle {
            return;
        }

        let modifier = left_instruction.modifier;
        if modifier == Modifier::Straight {
            // both hug the straight axis; split them across it
            Self::set_modifier(right, Modifier::SlightRight);
            Self::set_modifier(left, Modifier::SlightLeft);
            return;
        }
        // on the right of straight, the smaller angle is the outer road; on the left the larger
        let (outer, inner) = if modifier.is_right() {
            (right, left)
        } else {
            (left, right)
        };
        if let Some(m) = modifier.sharper() {
            Self::set_modifier(outer, m);
        } else if let Some(m) = modifier.milder() {
            Self::set_modifier(inner, m);
        }
    }

    fn assign_turn(road: &mut ConnectedRoad) {
        if !road.entry_allowed {
            return;
        }
        let modifier = Modifier::from_angle(road.angle);
        let kind = if modifier == Modifier::Straight {
            TurnKind::Continue
        } else {
            TurnKind::Turn
        };
        road.instruction = Some(TurnInstruction { kind, modifier });
    }

    fn assign_continue(road: &mut ConnectedRoad) {
        if !road.entry_allowed {
            return;
        }
        road.instruction = Some(TurnInstruction {
            kind: TurnKind::Continue,
            modifier: Modifier::forward(road.angle),
        });
    }

    fn assign_fork(road: &mut ConnectedRoad, modifier: Modifier) {
        if !road.entry_allowed {
            return;
        }
        road.instruction = Some(TurnInstruction {
            kind: TurnKind::Fork,
            modifier,
        });
    }

    fn set_modifier(road: &mut ConnectedRoad, modifier: Modifier) {
        let kind = if modifier == Modifier::Straight {
            TurnKind::Continue
        } else {
            TurnKind::Turn
        };
        road.instruction = Some(TurnInstruction { kind, modifier });
    }
}
