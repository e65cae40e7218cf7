//! Collaborator boundary: what the weapon core needs from the scene.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit mask of physics layers a weapon's rays can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    pub fn contains(self, layer: u32) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub fn with(self, layer: u32) -> LayerMask {
        if layer < 32 {
            LayerMask(self.0 | (1 << layer))
        } else {
            self
        }
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Opaque id of a collider in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// Opaque id of a rigid body that can receive impulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u64);

/// Id of the top-level object a collider belongs to. Shots never damage
/// the shooter's own root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootId(pub u64);

/// A ray cast request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
    pub max_distance: f32,
    pub layers: LayerMask,
}

/// Closest hit of a ray. Rays that start inside a collider do not report
/// that collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub collider: ColliderId,
    pub body: Option<BodyId>,
    pub root: RootId,
    /// Triangle (or face) index when the shape reports one.
    pub triangle: Option<u32>,
}

/// Broad material family, used to pick decals and impact effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Generic,
    Concrete,
    Metal,
    Wood,
    Glass,
    Dirt,
    Flesh,
    Water,
}

/// Material properties at one point of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    pub kind: SurfaceKind,
    pub penetrable: bool,
    /// Penetration cost per metre travelled inside the material.
    pub density: f32,
}

impl SurfaceMaterial {
    pub fn solid(kind: SurfaceKind) -> Self {
        Self {
            kind,
            penetrable: false,
            density: 1.0,
        }
    }

    pub fn penetrable(kind: SurfaceKind, density: f32) -> Self {
        Self {
            kind,
            penetrable: true,
            density,
        }
    }
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self::solid(SurfaceKind::Generic)
    }
}

/// Per-collider surface description. Meshes with several sub-meshes carry
/// one material per sub-mesh, keyed by the first triangle of each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceIdentifier {
    /// `(first_triangle, material)`, sorted by triangle.
    regions: Vec<(u32, SurfaceMaterial)>,
}

impl SurfaceIdentifier {
    /// A surface made of a single material.
    pub fn uniform(material: SurfaceMaterial) -> Self {
        Self {
            regions: vec![(0, material)],
        }
    }

    /// A surface with one material per sub-mesh. Returns `None` when
    /// `regions` is empty.
    pub fn with_submeshes(mut regions: Vec<(u32, SurfaceMaterial)>) -> Option<Self> {
        if regions.is_empty() {
            return None;
        }
        regions.sort_by_key(|(start, _)| *start);
        Some(Self { regions })
    }

    /// Material at `triangle`. Unknown triangles use the first region.
    pub fn material(&self, triangle: Option<u32>) -> SurfaceMaterial {
        let first = self.regions.first().map(|(_, m)| *m).unwrap_or_default();
        let Some(triangle) = triangle else {
            return first;
        };
        self.regions
            .iter()
            .rev()
            .find(|(start, _)| *start <= triangle)
            .map(|(_, m)| *m)
            .unwrap_or(first)
    }

    pub fn can_penetrate(&self, triangle: Option<u32>) -> bool {
        self.material(triangle).penetrable
    }

    pub fn density(&self, triangle: Option<u32>) -> f32 {
        self.material(triangle).density
    }
}

/// Damage delivered to a hit object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileDamage {
    pub amount: f32,
    pub shooter_position: Vec3,
    pub hit_point: Vec3,
    /// Penetration budget the projectile still carries.
    pub remaining_penetration: f32,
}

/// Cosmetic notification for bullet hole placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalRequest {
    pub surface: SurfaceKind,
    pub collider: ColliderId,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Scene services used by shots and melee swings.
///
/// One object implements every capability so a physics scene can be both
/// queried and mutated during a shot. The sinks are optional.
pub trait ShotWorld {
    fn raycast(&self, query: &RayQuery) -> Option<RayHit>;

    /// Surface material at the hit, if the collider carries one.
    fn surface(&self, hit: &RayHit) -> Option<SurfaceMaterial>;

    fn apply_impulse(&mut self, _body: BodyId, _impulse: Vec3) {}

    /// Deliver damage to the collider if it is damageable.
    fn projectile_damage(&mut self, _collider: ColliderId, _damage: &ProjectileDamage) {}

    fn bullet_decal(&mut self, _decal: &DecalRequest) {}
}
