use serde::{Deserialize, Serialize};
use std::time::Duration;
use xform_math::{Matrix4, TransformError};

/// Rotation speed used by the spinning demos, in degrees per second.
pub const DEFAULT_ANGLE_STEP: f32 = 45.0;

/// A coordinate axis for single-axis rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The `(x, y, z)` flags `Matrix4::set_rotate` expects.
    pub fn flags(self) -> (f32, f32, f32) {
        match self {
            Axis::X => (1.0, 0.0, 0.0),
            Axis::Y => (0.0, 1.0, 0.0),
            Axis::Z => (0.0, 0.0, 1.0),
        }
    }
}

/// Time-driven rotation angle, owned by the render loop that advances it.
///
/// Timestamps are durations since any fixed epoch the caller picks
/// (`Instant::elapsed` of a start instant, a frame counter times a fixed dt, ...).
/// The first `tick` only records the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleAnimator {
    /// Degrees per second.
    pub step_deg_per_sec: f32,
    angle: f32,
    last: Option<Duration>,
}

impl Default for AngleAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_ANGLE_STEP)
    }
}

impl AngleAnimator {
    pub fn new(step_deg_per_sec: f32) -> Self {
        Self {
            step_deg_per_sec,
            angle: 0.0,
            last: None,
        }
    }

    /// Start from a given angle instead of zero.
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle % 360.0;
        self
    }

    /// Current angle in degrees, in `(-360, 360)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance to timestamp `now` and return the new angle.
    ///
    /// A timestamp earlier than the previous one counts as zero elapsed time.
    pub fn tick(&mut self, now: Duration) -> f32 {
        let elapsed = match self.last {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.advance(elapsed)
    }

    /// Advance by `elapsed` and return the new angle.
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        let delta = self.step_deg_per_sec * elapsed.as_secs_f32();
        self.angle = (self.angle + delta) % 360.0;
        tracing::trace!(angle = self.angle, ?elapsed, "animation advanced");
        self.angle
    }

    /// Forget the last timestamp so the next `tick` starts fresh.
    pub fn reset_clock(&mut self) {
        self.last = None;
    }

    /// Model matrix rotating by the current angle about `axis`.
    pub fn model_matrix(&self, axis: Axis) -> Result<Matrix4, TransformError> {
        let (x, y, z) = axis.flags();
        Matrix4::from_rotation(self.angle, x, y, z)
    }
}
