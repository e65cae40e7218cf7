//! Camera and muzzle poses.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation. Forward is -Z, up is +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Pose from yaw and pitch in radians. Positive yaw turns left, positive
    /// pitch looks up.
    pub fn from_yaw_pitch(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut pose = Self::from_position(position);
        pose.set_yaw_pitch(yaw, pitch);
        pose
    }

    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Rotate a local-space direction into world space.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}
