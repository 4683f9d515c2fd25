use crate::math::{lerp, smoothstep, Point2d};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Progress through a single discrete move, used to ease the vehicle's
/// visual position between logical positions.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveTimer {
    /// Time spent on the current move in s.
    elapsed: f64,
    /// The duration of a move in s.
    interval: f64,
}

impl MoveTimer {
    pub fn new(interval: f64) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    /// Advances the timer. Returns `true` if the move completed, in which
    /// case the timer restarts.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Restarts the current move.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// The fraction of the move completed, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (self.elapsed / self.interval).clamp(0.0, 1.0)
    }

    /// The eased position part way between `from` and `to`.
    pub fn sample(&self, from: Point2d, to: Point2d) -> Point2d {
        lerp(from, to, smoothstep(self.fraction()))
    }
}
