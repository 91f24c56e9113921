//! Settle animation for a released page corner.
//!
//! When a drag ends, the corner glides from its last live position to
//! the resolved book corner at constant velocity. The animation is a
//! plain step function driven by the host's frame loop; each tick feeds
//! the interpolated point through the same pose update path as a live
//! drag, so the settle phase reuses the drag geometry unchanged.

use crate::geometry::Vec2;

/// Default glide time from release to the resting corner, in seconds.
pub const DEFAULT_SETTLE_DURATION: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleStatus {
    InProgress,
    Done,
}

#[derive(Clone, Copy, Debug)]
pub struct SettleAnimation {
    target: Vec2,
    velocity: Vec2,
    point: Vec2,
    rightward: bool,
}

impl SettleAnimation {
    pub fn new(start: Vec2, target: Vec2, duration: f32) -> Self {
        Self {
            target,
            velocity: (target - start) / duration,
            point: start,
            rightward: (target - start).x > 0.0,
        }
    }

    /// The point to feed into the pose update for this frame.
    pub fn point(&self) -> Vec2 {
        self.point
    }

    /// Advance by `dt` seconds. Completion is sign-aware on the x axis:
    /// the animation is done once the point reaches or passes the target
    /// in its direction of travel, so it terminates for any positive
    /// `dt` granularity. A zero `dt` makes no progress and never
    /// completes.
    pub fn tick(&mut self, dt: f32) -> SettleStatus {
        if dt <= 0.0 {
            return SettleStatus::InProgress;
        }
        self.point += self.velocity * dt;
        let arrived = if self.rightward {
            self.point.x >= self.target.x
        } else {
            self.point.x <= self.target.x
        };
        if arrived {
            SettleStatus::Done
        } else {
            SettleStatus::InProgress
        }
    }
}
