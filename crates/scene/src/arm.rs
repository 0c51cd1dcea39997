use crate::SceneError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use xform_math::{Matrix4, MatrixStack};

/// Degrees a joint moves per action.
pub const ARM_ANGLE_STEP: f32 = 3.0;

const BASE_HEIGHT: f32 = 2.0;
const ARM_LENGTH: f32 = 10.0;
const PALM_LENGTH: f32 = 2.0;
const FINGER_LENGTH: f32 = 2.0;
const FINGER_OFFSET: f32 = 2.0;

const JOINT1_LIMIT: f32 = 135.0;
const FINGER_LIMIT: f32 = 60.0;

/// A discrete pose change. Input layers map their key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArmAction {
    /// Rotate the first arm about y, negative direction.
    Arm1Left,
    /// Rotate the first arm about y, positive direction.
    Arm1Right,
    /// Bend the elbow about z, positive direction (limited).
    Joint1Up,
    /// Bend the elbow about z, negative direction (limited).
    Joint1Down,
    WristLeft,
    WristRight,
    /// Spread the fingers (limited).
    FingerOpen,
    /// Close the fingers (limited).
    FingerClose,
}

impl ArmAction {
    pub const ALL: [ArmAction; 8] = [
        ArmAction::Arm1Left,
        ArmAction::Arm1Right,
        ArmAction::Joint1Up,
        ArmAction::Joint1Down,
        ArmAction::WristLeft,
        ArmAction::WristRight,
        ArmAction::FingerOpen,
        ArmAction::FingerClose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArmAction::Arm1Left => "arm1-left",
            ArmAction::Arm1Right => "arm1-right",
            ArmAction::Joint1Up => "joint1-up",
            ArmAction::Joint1Down => "joint1-down",
            ArmAction::WristLeft => "wrist-left",
            ArmAction::WristRight => "wrist-right",
            ArmAction::FingerOpen => "finger-open",
            ArmAction::FingerClose => "finger-close",
        }
    }
}

impl FromStr for ArmAction {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArmAction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| SceneError::UnknownAction(s.to_string()))
    }
}

/// One drawable box of the arm with its full model matrix (scale included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmSegment {
    pub name: &'static str,
    pub model: Matrix4,
}

/// Joint angles of the robot arm, in degrees.
///
/// The hierarchy is base, arm1 (about y), arm2 (about z), palm (about y) and
/// two fingers (about x, mirrored).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointedArm {
    arm1: f32,
    joint1: f32,
    wrist: f32,
    finger: f32,
}

impl Default for JointedArm {
    fn default() -> Self {
        Self {
            arm1: 90.0,
            joint1: 45.0,
            wrist: 0.0,
            finger: 0.0,
        }
    }
}

impl JointedArm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm1(&self) -> f32 {
        self.arm1
    }

    pub fn joint1(&self) -> f32 {
        self.joint1
    }

    pub fn wrist(&self) -> f32 {
        self.wrist
    }

    pub fn finger(&self) -> f32 {
        self.finger
    }

    /// Apply one action. Returns `false` when a joint limit blocked it.
    pub fn apply(&mut self, action: ArmAction) -> bool {
        let before = *self;
        match action {
            ArmAction::Arm1Right => self.arm1 = (self.arm1 + ARM_ANGLE_STEP) % 360.0,
            ArmAction::Arm1Left => self.arm1 = (self.arm1 - ARM_ANGLE_STEP) % 360.0,
            ArmAction::Joint1Up => {
                if self.joint1 < JOINT1_LIMIT {
                    self.joint1 += ARM_ANGLE_STEP;
                }
            }
            ArmAction::Joint1Down => {
                if self.joint1 > -JOINT1_LIMIT {
                    self.joint1 -= ARM_ANGLE_STEP;
                }
            }
            ArmAction::WristRight => self.wrist = (self.wrist + ARM_ANGLE_STEP) % 360.0,
            ArmAction::WristLeft => self.wrist = (self.wrist - ARM_ANGLE_STEP) % 360.0,
            ArmAction::FingerOpen => {
                if self.finger < FINGER_LIMIT {
                    self.finger = (self.finger + ARM_ANGLE_STEP) % 360.0;
                }
            }
            ArmAction::FingerClose => {
                if self.finger > -FINGER_LIMIT {
                    self.finger = (self.finger - ARM_ANGLE_STEP) % 360.0;
                }
            }
        }
        let changed = *self != before;
        tracing::trace!(action = action.name(), changed, "arm action");
        changed
    }

    /// Walk the hierarchy and return every box with its model matrix.
    pub fn segments(&self) -> Result<Vec<ArmSegment>, SceneError> {
        let _span = tracing::info_span!("arm_segments").entered();

        let mut out = Vec::with_capacity(6);
        let mut stack = MatrixStack::with_max_depth(1);
        let mut model = Matrix4::from_translation(0.0, -12.0, 0.0);

        push_box(&mut out, &model, "base", 10.0, BASE_HEIGHT, 10.0);

        model
            .translate(0.0, BASE_HEIGHT, 0.0)
            .rotate(self.arm1, 0.0, 1.0, 0.0)?;
        push_box(&mut out, &model, "arm1", 3.0, ARM_LENGTH, 3.0);

        model
            .translate(0.0, ARM_LENGTH, 0.0)
            .rotate(self.joint1, 0.0, 0.0, 1.0)?;
        push_box(&mut out, &model, "arm2", 4.0, ARM_LENGTH, 4.0);

        model
            .translate(0.0, ARM_LENGTH, 0.0)
            .rotate(self.wrist, 0.0, 1.0, 0.0)?;
        push_box(&mut out, &model, "palm", 3.0, PALM_LENGTH, 6.0);

        // Both fingers hang off the palm tip.
        model.translate(0.0, PALM_LENGTH, 0.0);
        stack.push(&model)?;

        model
            .translate(0.0, 0.0, FINGER_OFFSET)
            .rotate(self.finger, 1.0, 0.0, 0.0)?;
        push_box(&mut out, &model, "finger1", 1.0, FINGER_LENGTH, 1.0);

        if let Some(palm_tip) = stack.pop() {
            model = palm_tip;
        }
        model
            .translate(0.0, 0.0, -FINGER_OFFSET)
            .rotate(-self.finger, 1.0, 0.0, 0.0)?;
        push_box(&mut out, &model, "finger2", 1.0, FINGER_LENGTH, 1.0);

        tracing::debug!(segments = out.len(), "arm hierarchy evaluated");
        Ok(out)
    }
}

fn push_box(
    out: &mut Vec<ArmSegment>,
    model: &Matrix4,
    name: &'static str,
    width: f32,
    height: f32,
    depth: f32,
) {
    let mut scaled = *model;
    scaled.scale(width, height, depth);
    out.push(ArmSegment { name, model: scaled });
}
