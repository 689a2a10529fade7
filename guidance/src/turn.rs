use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of maneuver a classified candidate road represents. This is a closed set; `Merge` is
/// reserved for ramp-style joins, which a different handler would assign.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TurnKind {
    Turn,
    Continue,
    Fork,
    Merge,
}

/// How far a maneuver rotates, bucketed for announcement. The order follows the turn circle from
/// reversing on the right all the way around to reversing on the left.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Modifier {
    UTurn,
    SharpRight,
    Right,
    SlightRight,
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
}

impl Modifier {
    /// Buckets a turn angle in `[0, 360)`. 0 is the back-bearing, 180 dead straight.
    pub fn from_angle(angle: f64) -> Modifier {
        debug_assert!((0.0..360.0).contains(&angle), "bad turn angle {}", angle);
        if angle == 0.0 {
            Modifier::UTurn
        } else if angle < 60.0 {
            Modifier::SharpRight
        } else if angle < 140.0 {
            Modifier::Right
        } else if angle < 160.0 {
            Modifier::SlightRight
        } else if angle <= 200.0 {
            Modifier::Straight
        } else if angle <= 220.0 {
            Modifier::SlightLeft
        } else if angle <= 280.0 {
            Modifier::Left
        } else {
            Modifier::SharpLeft
        }
    }

    /// Like `from_angle`, but for a road that's the only way forward; reversing is never the
    /// answer there, so an angle right at the back-bearing counts as the sharpest turn.
    pub fn forward(angle: f64) -> Modifier {
        match Modifier::from_angle(angle) {
            Modifier::UTurn => Modifier::SharpRight,
            m => m,
        }
    }

    /// The next bucket away from straight ahead, staying on this modifier's side. The sharpest
    /// buckets have none; `Straight` doesn't know its side.
    pub fn sharper(self) -> Option<Modifier> {
        match self {
            Modifier::SlightRight => Some(Modifier::Right),
            Modifier::Right => Some(Modifier::SharpRight),
            Modifier::SlightLeft => Some(Modifier::Left),
            Modifier::Left => Some(Modifier::SharpLeft),
            _ => None,
        }
    }

    /// The next bucket towards straight ahead.
    pub fn milder(self) -> Option<Modifier> {
        match self {
            Modifier::SharpRight => Some(Modifier::Right),
            Modifier::Right => Some(Modifier::SlightRight),
            Modifier::SlightRight => Some(Modifier::Straight),
            Modifier::SharpLeft => Some(Modifier::Left),
            Modifier::Left => Some(Modifier::SlightLeft),
            Modifier::SlightLeft => Some(Modifier::Straight),
            _ => None,
        }
    }

    pub fn is_right(self) -> bool {
        matches!(
            self,
            Modifier::SharpRight | Modifier::Right | Modifier::SlightRight
        )
    }

    pub fn is_left(self) -> bool {
        matches!(
            self,
            Modifier::SharpLeft | Modifier::Left | Modifier::SlightLeft
        )
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let x = match self {
            Modifier::UTurn => "u-turn",
            Modifier::SharpRight => "sharp right",
            Modifier::Right => "right",
            Modifier::SlightRight => "slight right",
            Modifier::Straight => "straight",
            Modifier::SlightLeft => "slight left",
            Modifier::Left => "left",
            Modifier::SharpLeft => "sharp left",
        };
        write!(f, "{}", x)
    }
}

/// The classified maneuver onto one candidate road.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnInstruction {
    pub kind: TurnKind,
    pub modifier: Modifier,
}

impl TurnInstruction {
    pub fn uturn() -> TurnInstruction {
        TurnInstruction {
            kind: TurnKind::Turn,
            modifier: Modifier::UTurn,
        }
    }
}

impl fmt::Display for TurnInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TurnKind::Turn => write!(f, "turn {}", self.modifier),
            TurnKind::Continue => write!(f, "continue {}", self.modifier),
            TurnKind::Fork => write!(f, "fork {}", self.modifier),
            TurnKind::Merge => write!(f, "merge {}", self.modifier),
        }
    }
}
