//! Yaw/pitch orientation model for the FPS camera.
//!
//! Converts a pair of Euler angles (in degrees) and a fixed world-up vector
//! into the camera's orthonormal `front`/`right`/`up` basis.

use cgmath::{Deg, InnerSpace, Rad, Vector3};

/// Largest pitch magnitude (degrees) the camera will accept.
///
/// Anything at or beyond ±90° collapses `front` onto the world-up axis and the
/// cross products below degenerate to zero-length vectors.
pub const MAX_PITCH_DEG: f32 = 89.0;

/// Clamps a pitch angle (degrees) into `[-MAX_PITCH_DEG, MAX_PITCH_DEG]`.
pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG)
}

/// Orthonormal camera basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

/// Builds the camera basis from yaw and pitch.
///
/// With `world_up = (0, 1, 0)` a yaw of 0° looks down +X and a yaw of 90°
/// looks down +Z; `right` is `front × world_up`, so yaw 0° gives a right
/// vector of +Z.
///
/// Pitch must stay strictly inside (-90°, 90°); see [`clamp_pitch`].
pub fn basis_from_angles(yaw: Deg<f32>, pitch: Deg<f32>, world_up: Vector3<f32>) -> Basis {
    let (sin_yaw, cos_yaw) = Rad::from(yaw).0.sin_cos();
    let (sin_pitch, cos_pitch) = Rad::from(pitch).0.sin_cos();

    let front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
    let right = front.cross(world_up).normalize();
    let up = right.cross(front).normalize();

    Basis { front, right, up }
}
