//! Melee swing with the weapon stock.

use engine_core::Transform;
use glam::Vec3;

use crate::animation::AnimationTimings;
use crate::profile::WeaponProfile;
use crate::world::{ProjectileDamage, RayQuery, RootId, ShotWorld};

/// In-flight swing. Strikes once at `strike_at`, ends at `ends_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeSwing {
    strike_at: f32,
    ends_at: f32,
    struck: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeleeProgress {
    /// The strike is due this tick.
    pub strike: bool,
    pub finished: bool,
}

impl MeleeSwing {
    pub fn start(now: f32, timings: &AnimationTimings) -> Self {
        Self {
            strike_at: now + timings.melee_delay,
            ends_at: now + timings.melee.max(timings.melee_delay),
            struck: false,
        }
    }

    pub fn advance(&mut self, now: f32) -> MeleeProgress {
        let mut progress = MeleeProgress::default();
        if !self.struck && now >= self.strike_at {
            self.struck = true;
            progress.strike = true;
        }
        progress.finished = self.struck && now >= self.ends_at;
        progress
    }
}

/// Cast the short forward ray and apply the hit. Returns the impact point.
pub fn strike(
    profile: &WeaponProfile,
    camera: &Transform,
    character_radius: f32,
    shooter: RootId,
    world: &mut dyn ShotWorld,
) -> Option<Vec3> {
    let direction = camera.forward();
    let query = RayQuery {
        origin: camera.position,
        direction,
        max_distance: profile.size * 0.5 + character_radius,
        layers: profile.affected_layers,
    };
    let hit = world.raycast(&query)?;

    if let Some(body) = hit.body {
        world.apply_impulse(body, direction * profile.melee_force);
    }
    if hit.root != shooter {
        world.projectile_damage(
            hit.collider,
            &ProjectileDamage {
                amount: profile.melee_damage,
                shooter_position: camera.position,
                hit_point: hit.point,
                remaining_penetration: 0.0,
            },
        );
    }
    log::debug!("Melee hit {:?} at {:.2} m", hit.collider, hit.distance);
    Some(hit.point)
}
