//! Scene state: everything that changes a model matrix from frame to frame.
//!
//! # Invariants
//! - Animation and pose state live in explicit structs owned by the caller;
//!   there are no process-wide timers or angles.
//! - State updates are pure with respect to their inputs (timestamps, actions).

pub mod animation;
pub mod arm;

pub use animation::{AngleAnimator, Axis, DEFAULT_ANGLE_STEP};
pub use arm::{ARM_ANGLE_STEP, ArmAction, ArmSegment, JointedArm};

use xform_math::{StackError, TransformError};

/// Errors from evaluating scene state into matrices.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error("unknown arm action: {0}")]
    UnknownAction(String),
}

pub fn crate_info() -> &'static str {
    "xform-scene v0.1.0"
}
