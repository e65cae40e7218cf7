//! Rapier3D scene backing the weapon simulation: layered shot raycasts,
//! impulses and collider surfaces.

pub mod collision;
pub mod physics_world;
pub mod raycast;
pub mod surface;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;
pub use surface::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
