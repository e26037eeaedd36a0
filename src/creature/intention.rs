use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side a creature swings towards while turning away from the arena edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnBias {
    Left,
    Right,
}

impl TurnBias {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            TurnBias::Left
        } else {
            TurnBias::Right
        }
    }

    /// Signed offset of `magnitude` degrees in this direction.
    pub fn offset(self, magnitude: f32) -> f32 {
        match self {
            TurnBias::Left => -magnitude,
            TurnBias::Right => magnitude,
        }
    }
}

/// What a creature is currently trying to do, with the state that goal needs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intention {
    #[default]
    None,
    Wander {
        target: Vec2,
        /// Distance to `target` when it was chosen.
        initial_distance: f32,
    },
    Wait {
        remaining_ticks: i32,
    },
    Turn {
        bias: TurnBias,
    },
}

impl Intention {
    pub fn kind(&self) -> IntentionKind {
        match self {
            Intention::None => IntentionKind::None,
            Intention::Wander { .. } => IntentionKind::Wander,
            Intention::Wait { .. } => IntentionKind::Wait,
            Intention::Turn { .. } => IntentionKind::Turn,
        }
    }

    pub fn wander_target(&self) -> Option<Vec2> {
        match self {
            Intention::Wander { target, .. } => Some(*target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentionKind {
    None,
    Wander,
    Wait,
    Turn,
}

impl IntentionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentionKind::None => "none",
            IntentionKind::Wander => "wander",
            IntentionKind::Wait => "wait",
            IntentionKind::Turn => "turn",
        }
    }
}

impl fmt::Display for IntentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
