//! The firing range: a rapier scene with damageable dummies.
//!
//! Layout, shooter at the origin facing -Z:
//! - plywood wall 5 m out, thin enough to shoot through
//! - a dummy behind the plywood
//! - a steel plate to the right with a second dummy behind it
//! - a loose crate to the left

use std::collections::HashMap;

use engine_core::{Entity, Health, Name, Vec3, World};
use physics::{body_handle, collider_handle, CollisionLayer, ColliderHandle, PhysicsWorld, SurfaceRegistry};
use weapons::{
    BodyId, ColliderId, DecalRequest, ProjectileDamage, RayHit, RayQuery, RootId, ShotWorld,
    SurfaceIdentifier, SurfaceKind, SurfaceMaterial,
};

pub const EYE_HEIGHT: f32 = 1.6;
pub const PLYWOOD_DENSITY: f32 = 0.8;

/// Damage bookkeeping on a dummy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageTally {
    pub hits: u32,
    pub total: f32,
}

/// Summary of one dummy after a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub name: String,
    pub hits: u32,
    pub damage: f32,
    pub health: f32,
}

pub struct RangeScene {
    pub physics: PhysicsWorld,
    surfaces: SurfaceRegistry,
    targets: World,
    target_colliders: HashMap<ColliderHandle, Entity>,
    decals: Vec<DecalRequest>,
    shooter: RootId,
}

impl RangeScene {
    pub fn build() -> Self {
        let mut physics = PhysicsWorld::new();
        let mut surfaces = SurfaceRegistry::new();

        let ground = physics.add_ground_plane();
        surfaces.assign(ground, uniform(SurfaceMaterial::solid(SurfaceKind::Dirt)));

        let plywood = physics.add_static_cuboid(
            Vec3::new(0.0, 1.5, -5.0),
            Vec3::new(1.0, 1.5, 0.04),
            CollisionLayer::Environment,
        );
        surfaces.assign(
            plywood,
            uniform(SurfaceMaterial::penetrable(SurfaceKind::Wood, PLYWOOD_DENSITY)),
        );

        let steel = physics.add_static_cuboid(
            Vec3::new(3.0, 1.5, -8.0),
            Vec3::new(0.75, 0.75, 0.02),
            CollisionLayer::Environment,
        );
        surfaces.assign(steel, uniform(SurfaceMaterial::solid(SurfaceKind::Metal)));

        let crate_body = physics.add_dynamic_body(Vec3::new(-3.0, 0.5, -7.0));
        let crate_box = physics.add_box_collider(crate_body, Vec3::splat(0.5), CollisionLayer::Debris);
        surfaces.assign(crate_box, uniform(SurfaceMaterial::solid(SurfaceKind::Wood)));

        let shooter_body = physics.add_kinematic_body(Vec3::new(0.0, 0.9, 0.0));
        let shooter_capsule = physics.add_capsule_collider(shooter_body, 0.55, 0.35, CollisionLayer::Player);
        let shooter = physics.root_of(shooter_capsule);

        let mut scene = Self {
            physics,
            surfaces,
            targets: World::new(),
            target_colliders: HashMap::new(),
            decals: Vec::new(),
            shooter,
        };
        scene.add_dummy("Dummy behind plywood", Vec3::new(0.0, 1.1, -9.0));
        scene.add_dummy("Dummy behind steel", Vec3::new(3.0, 1.1, -11.0));
        scene.physics.update_query_pipeline();

        log::debug!(
            "Range built: {} surfaces, {} targets",
            scene.surfaces.len(),
            scene.target_colliders.len()
        );
        scene
    }

    /// A standing 100 hp dummy. Kinematic, so hits never push it over.
    pub fn add_dummy(&mut self, name: &str, position: Vec3) -> Entity {
        let body = self.physics.add_kinematic_body(position);
        let collider = self.physics.add_capsule_collider(body, 0.6, 0.35, CollisionLayer::Target);
        self.surfaces
            .assign(collider, uniform(SurfaceMaterial::solid(SurfaceKind::Flesh)));

        let entity = self
            .targets
            .spawn((Name(name.to_owned()), Health::new(100.0), DamageTally::default()));
        self.target_colliders.insert(collider, entity);
        entity
    }

    /// Root of the shooter's capsule; shots never damage it.
    pub fn shooter(&self) -> RootId {
        self.shooter
    }

    pub fn step(&mut self) {
        self.physics.step();
    }

    pub fn decals(&self) -> &[DecalRequest] {
        &self.decals
    }

    /// Per-dummy damage, sorted by name.
    pub fn target_reports(&self) -> Vec<TargetReport> {
        let mut reports: Vec<TargetReport> = self
            .targets
            .query::<(&Name, &Health, &DamageTally)>()
            .iter()
            .map(|(_, (name, health, tally))| TargetReport {
                name: name.0.clone(),
                hits: tally.hits,
                damage: tally.total,
                health: health.current,
            })
            .collect();
        reports.sort_by(|a, b| a.name.cmp(&b.name));
        reports
    }
}

fn uniform(material: SurfaceMaterial) -> SurfaceIdentifier {
    SurfaceIdentifier::uniform(material)
}

impl ShotWorld for RangeScene {
    fn raycast(&self, query: &RayQuery) -> Option<RayHit> {
        self.physics.cast_shot_ray(query)
    }

    fn surface(&self, hit: &RayHit) -> Option<SurfaceMaterial> {
        self.surfaces.material_at(hit)
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec3) {
        self.physics.apply_impulse(body_handle(body), impulse);
    }

    fn projectile_damage(&mut self, collider: ColliderId, damage: &ProjectileDamage) {
        let Some(&entity) = self.target_colliders.get(&collider_handle(collider)) else {
            return;
        };
        if let Ok((name, health, tally)) = self
            .targets
            .query_one_mut::<(&Name, &mut Health, &mut DamageTally)>(entity)
        {
            health.take_damage(damage.amount);
            tally.hits += 1;
            tally.total += damage.amount;
            log::debug!(
                "{} took {:.1} at {:.1} m ({:.0} hp left)",
                name.0,
                damage.amount,
                damage.shooter_position.distance(damage.hit_point),
                health.current
            );
            if health.is_dead() {
                log::info!("{} is down", name.0);
            }
        }
    }

    fn bullet_decal(&mut self, decal: &DecalRequest) {
        self.decals.push(*decal);
    }
}
