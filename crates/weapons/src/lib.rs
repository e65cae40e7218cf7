//! Weapon simulation core.
//!
//! Everything a hitscan firearm needs between the input snapshot and the
//! physics scene:
//! - ammo bookkeeping and timed reloads
//! - fire mode dispatch and bursts
//! - accuracy breathing and spread sampling
//! - ray resolution with damage falloff and single-layer penetration
//!
//! The scene is reached only through [`ShotWorld`], so the core runs the same
//! against rapier or a scripted test world.

pub mod accuracy;
pub mod ammo;
pub mod animation;
pub mod character;
pub mod curve;
pub mod error;
pub mod events;
pub mod fire_mode;
pub mod gun;
pub mod melee;
pub mod profile;
pub mod reload;
pub mod settings;
pub mod shot;
pub mod spread;
pub mod world;

#[cfg(test)]
mod testing;

pub use accuracy::AccuracyModel;
pub use ammo::AmmoState;
pub use animation::{AnimationSource, AnimationTimings};
pub use character::{CharacterState, MotionState};
pub use curve::FalloffCurve;
pub use error::WeaponError;
pub use events::WeaponEvent;
pub use fire_mode::{BurstSchedule, FireModeController, FireSlot, TriggerPull};
pub use gun::Gun;
pub use profile::{DamageMode, FireMode, ReloadMode, WeaponProfile};
pub use reload::{ReloadKind, ReloadPhase, ReloadSequencer, ReloadSession};
pub use settings::{AimStyle, GameplaySettings};
pub use shot::{FireSession, HitRecord, PelletTrace, ShotContext, ShotResolver};
pub use world::{
    BodyId, ColliderId, DecalRequest, LayerMask, ProjectileDamage, RayHit, RayQuery, RootId,
    ShotWorld, SurfaceIdentifier, SurfaceKind, SurfaceMaterial,
};
