//! Scripted scene for unit tests: axis-aligned boxes and recorded sinks.

use glam::Vec3;
use std::cell::RefCell;

use crate::world::{
    BodyId, ColliderId, DecalRequest, LayerMask, ProjectileDamage, RayHit, RayQuery, RootId,
    ShotWorld, SurfaceMaterial,
};

const EPS: f32 = 1e-4;

#[derive(Debug, Clone)]
pub(crate) struct MockBox {
    pub collider: ColliderId,
    pub root: RootId,
    pub body: Option<BodyId>,
    pub layer: u32,
    pub min: Vec3,
    pub max: Vec3,
    pub surface: Option<SurfaceMaterial>,
}

impl MockBox {
    /// A wide slab crossing the -Z axis between `near` and `far` metres
    /// from the origin.
    pub fn slab(id: u64, near: f32, far: f32) -> Self {
        Self {
            collider: ColliderId(id),
            root: RootId(id),
            body: None,
            layer: 0,
            min: Vec3::new(-50.0, -50.0, -far),
            max: Vec3::new(50.0, 50.0, -near),
            surface: None,
        }
    }

    pub fn with_surface(mut self, surface: SurfaceMaterial) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_body(mut self, body: u64) -> Self {
        self.body = Some(BodyId(body));
        self
    }

    pub fn with_root(mut self, root: u64) -> Self {
        self.root = RootId(root);
        self
    }

    pub fn on_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    /// Entry distance and normal, ignoring boxes that contain the origin.
    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<(f32, Vec3)> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (mut t1, mut t2) = ((lo - o) / d, (hi - o) / d);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            if t1 > t_min {
                t_min = t1;
                let mut n = Vec3::ZERO;
                n[axis] = -d.signum();
                normal = n;
            }
            t_max = t_max.min(t2);
            if t_max < t_min {
                return None;
            }
        }
        (t_min > EPS).then_some((t_min, normal))
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockWorld {
    pub boxes: Vec<MockBox>,
    pub rays: RefCell<Vec<RayQuery>>,
    pub impulses: Vec<(BodyId, Vec3)>,
    pub damage: Vec<(ColliderId, ProjectileDamage)>,
    pub decals: Vec<DecalRequest>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, b: MockBox) -> Self {
        self.boxes.push(b);
        self
    }

    pub fn damage_to(&self, collider: u64) -> Vec<ProjectileDamage> {
        self.damage
            .iter()
            .filter(|(c, _)| *c == ColliderId(collider))
            .map(|(_, d)| *d)
            .collect()
    }

    pub fn decals_on(&self, collider: u64) -> usize {
        self.decals
            .iter()
            .filter(|d| d.collider == ColliderId(collider))
            .count()
    }

    fn layer_visible(layers: LayerMask, b: &MockBox) -> bool {
        layers.contains(b.layer)
    }
}

impl ShotWorld for MockWorld {
    fn raycast(&self, query: &RayQuery) -> Option<RayHit> {
        self.rays.borrow_mut().push(*query);

        self.boxes
            .iter()
            .filter(|b| Self::layer_visible(query.layers, b))
            .filter_map(|b| {
                b.intersect(query.origin, query.direction)
                    .filter(|(t, _)| *t <= query.max_distance)
                    .map(|(t, n)| (b, t, n))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(b, t, normal)| RayHit {
                point: query.origin + query.direction * t,
                normal,
                distance: t,
                collider: b.collider,
                body: b.body,
                root: b.root,
                triangle: Some(0),
            })
    }

    fn surface(&self, hit: &RayHit) -> Option<SurfaceMaterial> {
        self.boxes
            .iter()
            .find(|b| b.collider == hit.collider)
            .and_then(|b| b.surface)
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec3) {
        self.impulses.push((body, impulse));
    }

    fn projectile_damage(&mut self, collider: ColliderId, damage: &ProjectileDamage) {
        self.damage.push((collider, *damage));
    }

    fn bullet_decal(&mut self, decal: &DecalRequest) {
        self.decals.push(*decal);
    }
}
