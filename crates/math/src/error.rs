use std::fmt;

/// Why a requested transform has no well-defined matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// Zero-width, zero-height or zero-depth frustum, or a zero aspect ratio.
    NullFrustum,
    NearNotPositive,
    FarNotPositive,
    /// `sin(fovy / 2)` is zero.
    ZeroFieldOfView,
    /// The up vector is parallel to the viewing direction (or zero).
    ParallelUpVector,
    /// Eye and center coincide, so there is no viewing direction.
    CoincidentEyeAndCenter,
    /// `set_rotate` was called with every axis flag cleared.
    NoRotationAxis,
    /// The determinant is zero.
    SingularMatrix,
    /// The parameters are finite but the result overflowed.
    NonFinite,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NullFrustum => "null frustum",
            Self::NearNotPositive => "near <= 0",
            Self::FarNotPositive => "far <= 0",
            Self::ZeroFieldOfView => "zero field of view",
            Self::ParallelUpVector => "up vector is parallel to the view direction",
            Self::CoincidentEyeAndCenter => "eye and center coincide",
            Self::NoRotationAxis => "no rotation axis selected",
            Self::SingularMatrix => "matrix is singular",
            Self::NonFinite => "result is not finite",
        };
        f.write_str(msg)
    }
}

/// Errors from building or inverting a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("degenerate transform: {0}")]
    DegenerateTransform(DegenerateReason),
}

impl TransformError {
    pub fn reason(&self) -> DegenerateReason {
        match self {
            Self::DegenerateTransform(reason) => *reason,
        }
    }
}

pub(crate) fn degenerate(reason: DegenerateReason) -> TransformError {
    tracing::debug!(%reason, "rejected degenerate transform");
    TransformError::DegenerateTransform(reason)
}
