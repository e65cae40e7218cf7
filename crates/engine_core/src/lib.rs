//! Core engine types shared by the weapon simulation crates.
//!
//! This crate provides the foundational types used across the workspace:
//! - Transform for camera and muzzle poses
//! - Frame clock with deterministic stepping
//! - Health component for damageable entities

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
