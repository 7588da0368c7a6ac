//! Directional line-crossing rules for the lifecycle state machine.
//!
//! Two vertical lines split the frame into bands. Entry fires when a
//! centroid moves across the entry line from the outer side; exit fires when
//! an entered track moves across the exit line further along the same
//! direction. Each transition fires at most once per track, and a track
//! jittering around one line can only ever trigger that line's transition.

use serde::{Deserialize, Serialize};

use crate::tracker::rect::Point;
use crate::tracker::track_state::LifecycleState;

/// Direction of travel that counts as moving into the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingDirection {
    /// Entities arrive from the right edge and walk toward smaller x
    #[default]
    RightToLeft,
    LeftToRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Entry,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingLines {
    pub entry_x: f32,
    pub exit_x: f32,
    pub direction: CrossingDirection,
}

impl CrossingLines {
    pub fn new(entry_x: f32, exit_x: f32, direction: CrossingDirection) -> Self {
        Self {
            entry_x,
            exit_x,
            direction,
        }
    }

    /// The exit line must lie strictly past the entry line in the direction
    /// of travel.
    pub fn is_ordered(&self) -> bool {
        match self.direction {
            CrossingDirection::RightToLeft => self.exit_x < self.entry_x,
            CrossingDirection::LeftToRight => self.exit_x > self.entry_x,
        }
    }

    /// True when `prev -> cur` moves across `line` in the travel direction.
    fn crosses(&self, line: f32, prev: f32, cur: f32) -> bool {
        match self.direction {
            CrossingDirection::RightToLeft => prev >= line && cur < line,
            CrossingDirection::LeftToRight => prev <= line && cur > line,
        }
    }

    /// The transition a track in `state` takes for the step `prev -> cur`.
    pub fn evaluate(&self, state: LifecycleState, prev: Point, cur: Point) -> Option<Crossing> {
        match state {
            LifecycleState::Tracked if self.crosses(self.entry_x, prev.x, cur.x) => {
                Some(Crossing::Entry)
            }
            LifecycleState::Entered if self.crosses(self.exit_x, prev.x, cur.x) => {
                Some(Crossing::Exit)
            }
            _ => None,
        }
    }
}

impl Default for CrossingLines {
    fn default() -> Self {
        Self::new(480.0, 100.0, CrossingDirection::RightToLeft)
    }
}
