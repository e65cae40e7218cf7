//! Collision layers and filtering.

use rapier3d::prelude::*;
use weapons::LayerMask;

/// Scene layers. The discriminant is the bit index used by a weapon's
/// [`LayerMask`].
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionLayer {
    /// Static environment (ground, walls)
    Environment = 0,
    /// The player character capsule
    Player = 1,
    /// Damageable targets
    Target = 2,
    /// Loose physics props
    Debris = 3,
    /// Triggers and sensors
    Trigger = 4,
}

impl CollisionLayer {
    pub fn bit(self) -> u32 {
        1 << self as u32
    }

    pub fn membership(self) -> Group {
        Group::from_bits_retain(self.bit())
    }

    /// Groups for a collider on this layer. Colliders accept contacts from
    /// every layer; filtering happens on the query side.
    pub fn groups(self) -> InteractionGroups {
        InteractionGroups::new(self.membership(), Group::ALL)
    }

    /// Mask with just this layer set.
    pub fn mask(self) -> LayerMask {
        LayerMask::NONE.with(self as u32)
    }
}

/// Interaction groups for a ray that should only see `layers`.
pub fn query_groups(layers: LayerMask) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_retain(layers.0))
}

/// Everything except the player's own capsule.
pub fn shootable_layers() -> LayerMask {
    LayerMask(LayerMask::ALL.0 & !CollisionLayer::Player.bit() & !CollisionLayer::Trigger.bit())
}
