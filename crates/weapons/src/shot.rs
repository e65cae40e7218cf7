//! Hitscan shot resolution: spread, damage, impulses and single-layer
//! penetration.

use engine_core::Transform;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::profile::{FireMode, WeaponProfile};
use crate::spread::sample_local_direction;
use crate::world::{
    ColliderId, DecalRequest, ProjectileDamage, RayHit, RayQuery, RootId, ShotWorld, SurfaceKind,
    SurfaceMaterial,
};

/// How far past the entry point the continuation ray starts.
pub const PENETRATION_OFFSET: f32 = 0.1;

/// One point of a pellet's hit chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub point: Vec3,
    pub collider: ColliderId,
    pub surface: Option<SurfaceKind>,
    /// Distance from the muzzle along the pellet's path.
    pub distance: f32,
    /// Damage delivered here (0 when the object belongs to the shooter).
    pub damage: f32,
    /// Penetration budget left after this hit.
    pub remaining_penetration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PelletTrace {
    /// World-space direction after spread.
    pub direction: Vec3,
    /// Ordered: entry hit first, then the object behind it.
    pub hits: Vec<HitRecord>,
}

/// Everything one trigger pull resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FireSession {
    pub mode: FireMode,
    pub pellets: Vec<PelletTrace>,
}

impl FireSession {
    pub fn hits(&self) -> impl Iterator<Item = &HitRecord> {
        self.pellets.iter().flat_map(|p| p.hits.iter())
    }

    pub fn total_damage(&self) -> f32 {
        self.hits().map(|h| h.damage).sum()
    }
}

/// Inputs for one trigger pull.
#[derive(Debug, Clone, Copy)]
pub struct ShotContext<'a> {
    pub profile: &'a WeaponProfile,
    pub mode: FireMode,
    pub accuracy: f32,
    pub camera: &'a Transform,
    pub shooter: RootId,
    pub pellets: u32,
}

/// Casts the rays for a trigger pull. Owns the spread RNG so patterns are
/// reproducible per seed.
#[derive(Debug, Clone)]
pub struct ShotResolver {
    rng: StdRng,
}

impl Default for ShotResolver {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ShotResolver {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn fire(&mut self, ctx: &ShotContext<'_>, world: &mut dyn ShotWorld) -> FireSession {
        let pellets = (0..ctx.pellets.max(1))
            .map(|_| {
                let local =
                    sample_local_direction(&mut self.rng, ctx.accuracy, ctx.profile.maximum_spread);
                let direction = ctx.camera.transform_direction(local).normalize();
                resolve_pellet(ctx, direction, world)
            })
            .collect();

        FireSession {
            mode: ctx.mode,
            pellets,
        }
    }
}

/// Trace one pellet along `direction` from the camera.
pub fn resolve_pellet(ctx: &ShotContext<'_>, direction: Vec3, world: &mut dyn ShotWorld) -> PelletTrace {
    let profile = ctx.profile;
    let origin = ctx.camera.position;
    let mut trace = PelletTrace {
        direction,
        hits: Vec::new(),
    };

    let query = RayQuery {
        origin,
        direction,
        max_distance: profile.range,
        layers: profile.affected_layers,
    };
    let Some(hit) = world.raycast(&query) else {
        return trace;
    };

    let surface = world.surface(&hit);
    let damage = profile.damage_at(hit.distance);
    if let Some(surface) = surface {
        world.bullet_decal(&decal(surface, &hit));
    }
    if let Some(body) = hit.body {
        world.apply_impulse(body, direction * profile.force);
    }
    let delivered = deliver(ctx, world, &hit, hit.point, damage, profile.penetration_power);

    trace.hits.push(HitRecord {
        point: hit.point,
        collider: hit.collider,
        surface: surface.map(|s| s.kind),
        distance: hit.distance,
        damage: delivered,
        remaining_penetration: profile.penetration_power,
    });

    if let Some(surface) = surface {
        if profile.penetrate_objects && surface.penetrable {
            let remaining_range = profile.range - hit.distance;
            if let Some(record) = penetrate(ctx, world, &hit, surface, direction, remaining_range, damage) {
                trace.hits.push(record);
            }
        }
    }
    trace
}

/// Push through the entered object and hit whatever is behind it. Only one
/// extra layer is resolved.
fn penetrate(
    ctx: &ShotContext<'_>,
    world: &mut dyn ShotWorld,
    entry: &RayHit,
    entry_surface: SurfaceMaterial,
    direction: Vec3,
    range: f32,
    damage: f32,
) -> Option<HitRecord> {
    let profile = ctx.profile;
    let power = profile.penetration_power;
    let layers = profile.affected_layers;

    let through = RayQuery {
        origin: entry.point + direction * PENETRATION_OFFSET,
        direction,
        max_distance: range,
        layers,
    };

    let Some(behind) = world.raycast(&through) else {
        // Nothing behind: only look for the exit hole.
        let back = RayQuery {
            origin: entry.point + direction * power,
            direction: -direction,
            max_distance: power,
            layers,
        };
        if let Some(exit) = world.raycast(&back) {
            if exit.collider == entry.collider {
                world.bullet_decal(&decal(entry_surface, &exit));
            }
        }
        return None;
    };

    let behind_surface = world.surface(&behind);
    let back = RayQuery {
        origin: behind.point,
        direction: -direction,
        max_distance: range,
        layers,
    };
    let exit = world.raycast(&back)?;

    let traveled = entry.point.distance(exit.point) * entry_surface.density;
    if power <= traveled {
        log::trace!("Penetration stopped: cost {:.2} vs power {:.2}", traveled, power);
        return None;
    }

    if let Some(surface) = behind_surface {
        world.bullet_decal(&decal(surface, &behind));
    }
    if exit.collider == entry.collider {
        world.bullet_decal(&decal(entry_surface, &exit));
    }
    if let Some(body) = behind.body {
        world.apply_impulse(body, direction * profile.force);
    }

    let remaining = power - traveled;
    let scaled = damage * (remaining / power);
    let delivered = deliver(ctx, world, &behind, behind.point, scaled, remaining);

    Some(HitRecord {
        point: behind.point,
        collider: behind.collider,
        surface: behind_surface.map(|s| s.kind),
        distance: entry.distance + PENETRATION_OFFSET + behind.distance,
        damage: delivered,
        remaining_penetration: remaining,
    })
}

/// Damage sink call with self-hit immunity. Returns the damage delivered.
fn deliver(
    ctx: &ShotContext<'_>,
    world: &mut dyn ShotWorld,
    hit: &RayHit,
    point: Vec3,
    amount: f32,
    remaining_penetration: f32,
) -> f32 {
    if hit.root == ctx.shooter {
        return 0.0;
    }
    world.projectile_damage(
        hit.collider,
        &ProjectileDamage {
            amount,
            shooter_position: ctx.camera.position,
            hit_point: point,
            remaining_penetration,
        },
    );
    amount
}

fn decal(surface: SurfaceMaterial, hit: &RayHit) -> DecalRequest {
    DecalRequest {
        surface: surface.kind,
        collider: hit.collider,
        point: hit.point,
        normal: hit.normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DamageMode;
    use crate::testing::{MockBox, MockWorld};
    use crate::world::{BodyId, SurfaceKind};

    const SHOOTER: RootId = RootId(999);

    fn penetrating_profile(power: f32) -> WeaponProfile {
        let mut p = WeaponProfile::assault_rifle();
        p.damage_mode = DamageMode::Constant;
        p.damage = 50.0;
        p.range = 100.0;
        p.penetrate_objects = true;
        p.penetration_power = power;
        p.force = 4.0;
        p
    }

    fn straight(profile: &WeaponProfile, camera: &Transform, world: &mut MockWorld) -> FireSession {
        let ctx = ShotContext {
            profile,
            mode: FireMode::Single,
            accuracy: 1.0,
            camera,
            shooter: SHOOTER,
            pellets: 1,
        };
        ShotResolver::with_seed(1).fire(&ctx, world)
    }

    /// Wall of `thickness` metres starting 5 m out, target 20 m out.
    fn wall_and_target(thickness: f32) -> MockWorld {
        MockWorld::new()
            .with(
                MockBox::slab(1, 5.0, 5.0 + thickness)
                    .with_surface(SurfaceMaterial::penetrable(SurfaceKind::Wood, 1.0)),
            )
            .with(
                MockBox::slab(2, 20.0, 21.0)
                    .with_surface(SurfaceMaterial::solid(SurfaceKind::Flesh))
                    .with_body(20),
            )
    }

    #[test]
    fn shot_hit_applies_damage_decal_and_impulse() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        let mut world = MockWorld::new().with(
            MockBox::slab(3, 12.0, 13.0)
                .with_surface(SurfaceMaterial::solid(SurfaceKind::Metal))
                .with_body(30),
        );
        let session = straight(&profile, &camera, &mut world);

        let hits: Vec<_> = session.hits().collect();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 12.0).abs() < 1e-4);
        assert_eq!(hits[0].surface, Some(SurfaceKind::Metal));
        assert_eq!(world.damage_to(3).len(), 1);
        assert_eq!(world.damage_to(3)[0].amount, 50.0);
        assert_eq!(world.decals_on(3), 1);
        assert_eq!(world.impulses.len(), 1);
        assert_eq!(world.impulses[0].0, BodyId(30));
        assert!((world.impulses[0].1 - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn shot_miss_resolves_empty_chain() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        let mut world = MockWorld::new();
        let session = straight(&profile, &camera, &mut world);
        assert_eq!(session.pellets.len(), 1);
        assert!(session.pellets[0].hits.is_empty());
        assert!(world.damage.is_empty());
    }

    #[test]
    fn shot_beyond_range_misses() {
        let mut profile = penetrating_profile(10.0);
        profile.range = 10.0;
        let camera = Transform::default();
        let mut world = MockWorld::new().with(MockBox::slab(3, 12.0, 13.0));
        let session = straight(&profile, &camera, &mut world);
        assert_eq!(session.hits().count(), 0);
    }

    #[test]
    fn shot_penetration_fails_when_cost_exceeds_power() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        // 12 m of density-1 wood costs 12 > 10
        let mut world = wall_and_target(12.0);
        let session = straight(&profile, &camera, &mut world);

        assert_eq!(session.hits().count(), 1);
        assert!(world.damage_to(2).is_empty());
        assert_eq!(world.decals_on(2), 0);
        assert!(world.impulses.is_empty());
    }

    #[test]
    fn shot_penetration_scales_damage_by_remaining_power() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        // 8 m costs 8 < 10, leaving 2 of 10
        let mut world = wall_and_target(8.0);
        let session = straight(&profile, &camera, &mut world);

        let hits: Vec<_> = session.hits().collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].collider, ColliderId(1));
        assert_eq!(hits[1].collider, ColliderId(2));
        assert!((hits[1].remaining_penetration - 2.0).abs() < 1e-3);

        let behind = world.damage_to(2);
        assert_eq!(behind.len(), 1);
        assert!((behind[0].amount - 50.0 * 0.2).abs() < 1e-2);
        assert!((behind[0].remaining_penetration - 2.0).abs() < 1e-3);
        // entry hole, exit hole, target
        assert_eq!(world.decals_on(1), 2);
        assert_eq!(world.decals_on(2), 1);
        assert_eq!(world.impulses.len(), 1);
    }

    #[test]
    fn shot_density_raises_penetration_cost() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        let mut world = MockWorld::new()
            .with(
                MockBox::slab(1, 5.0, 9.0)
                    .with_surface(SurfaceMaterial::penetrable(SurfaceKind::Concrete, 3.0)),
            )
            .with(MockBox::slab(2, 20.0, 21.0));
        // 4 m * density 3 = 12 > 10
        straight(&profile, &camera, &mut world);
        assert!(world.damage_to(2).is_empty());
    }

    #[test]
    fn shot_solid_surface_is_not_penetrated() {
        let profile = penetrating_profile(50.0);
        let camera = Transform::default();
        let mut world = MockWorld::new()
            .with(MockBox::slab(1, 5.0, 5.5).with_surface(SurfaceMaterial::solid(SurfaceKind::Metal)))
            .with(MockBox::slab(2, 20.0, 21.0));
        let session = straight(&profile, &camera, &mut world);
        assert_eq!(session.hits().count(), 1);
        assert!(world.damage_to(2).is_empty());
    }

    #[test]
    fn shot_penetration_disabled_on_profile() {
        let mut profile = penetrating_profile(50.0);
        profile.penetrate_objects = false;
        let camera = Transform::default();
        let mut world = wall_and_target(1.0);
        straight(&profile, &camera, &mut world);
        assert!(world.damage_to(2).is_empty());
    }

    #[test]
    fn shot_penetration_only_one_extra_layer() {
        let profile = penetrating_profile(100.0);
        let camera = Transform::default();
        let wood = SurfaceMaterial::penetrable(SurfaceKind::Wood, 0.1);
        let mut world = MockWorld::new()
            .with(MockBox::slab(1, 5.0, 6.0).with_surface(wood))
            .with(MockBox::slab(2, 10.0, 11.0).with_surface(wood))
            .with(MockBox::slab(3, 15.0, 16.0).with_surface(wood));
        let session = straight(&profile, &camera, &mut world);
        assert_eq!(session.hits().count(), 2);
        assert!(world.damage_to(3).is_empty());
    }

    #[test]
    fn shot_nothing_behind_places_exit_decal_only() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        let mut world = MockWorld::new().with(
            MockBox::slab(1, 5.0, 6.0).with_surface(SurfaceMaterial::penetrable(SurfaceKind::Wood, 1.0)),
        );
        let session = straight(&profile, &camera, &mut world);
        assert_eq!(session.hits().count(), 1);
        assert_eq!(world.decals_on(1), 2);
        assert_eq!(world.damage_to(1).len(), 1);
    }

    #[test]
    fn shot_never_damages_own_root() {
        let profile = penetrating_profile(10.0);
        let camera = Transform::default();
        let mut world = MockWorld::new().with(
            MockBox::slab(4, 2.0, 3.0)
                .with_root(SHOOTER.0)
                .with_body(40)
                .with_surface(SurfaceMaterial::solid(SurfaceKind::Metal)),
        );
        let session = straight(&profile, &camera, &mut world);
        assert!(world.damage.is_empty());
        assert_eq!(session.total_damage(), 0.0);
        // physics still reacts
        assert_eq!(world.impulses.len(), 1);
    }

    #[test]
    fn shot_respects_affected_layers() {
        let mut profile = penetrating_profile(10.0);
        profile.affected_layers = crate::world::LayerMask::NONE.with(0);
        let camera = Transform::default();
        let mut world = MockWorld::new()
            .with(MockBox::slab(1, 4.0, 5.0).on_layer(3))
            .with(MockBox::slab(2, 9.0, 10.0).on_layer(0));
        let session = straight(&profile, &camera, &mut world);
        assert_eq!(session.pellets[0].hits[0].collider, ColliderId(2));
    }

    #[test]
    fn shot_falloff_uses_distance_over_range() {
        let mut profile = penetrating_profile(0.0);
        profile.penetrate_objects = false;
        profile.damage_mode = DamageMode::DecreaseByDistance;
        profile.damage_falloff = crate::curve::FalloffCurve::new(vec![(0.0, 1.0), (1.0, 0.0)]);
        let camera = Transform::default();
        let mut world = MockWorld::new().with(MockBox::slab(1, 25.0, 26.0));
        straight(&profile, &camera, &mut world);
        assert!((world.damage_to(1)[0].amount - 37.5).abs() < 1e-3);
    }

    #[test]
    fn shot_pellets_cast_one_ray_each() {
        let mut profile = penetrating_profile(0.0);
        profile.penetrate_objects = false;
        let camera = Transform::default();
        let mut world = MockWorld::new().with(MockBox::slab(1, 10.0, 11.0));
        let ctx = ShotContext {
            profile: &profile,
            mode: FireMode::ShotgunSingle,
            accuracy: 0.5,
            camera: &camera,
            shooter: SHOOTER,
            pellets: 8,
        };
        let session = ShotResolver::with_seed(5).fire(&ctx, &mut world);
        assert_eq!(session.pellets.len(), 8);
        assert_eq!(world.rays.borrow().len(), 8);
        let distinct = session
            .pellets
            .windows(2)
            .filter(|w| w[0].direction != w[1].direction)
            .count();
        assert!(distinct > 0);
    }
}
