//! Raycasting for weapon hit detection.
//!
//! Shot rays follow the convention the weapon core expects: a ray that
//! starts inside (or on the surface of) a collider does not report it, which
//! is what lets the penetration pass cast from inside a wall.

use crate::collision::query_groups;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::parry::shape::FeatureId;
use rapier3d::prelude::*;
use weapons::{BodyId, ColliderId, RayHit, RayQuery, RootId};

/// Hits closer than this to the ray origin count as "started inside".
pub const START_INSIDE_EPSILON: f32 = 1e-4;

/// Roots of colliders without an explicit tag and without a parent body
/// live in their own id range.
const FREE_COLLIDER_ROOT: u64 = 1 << 63;

pub fn collider_id(handle: ColliderHandle) -> ColliderId {
    let (index, generation) = handle.into_raw_parts();
    ColliderId((u64::from(generation) << 32) | u64::from(index))
}

pub fn collider_handle(id: ColliderId) -> ColliderHandle {
    ColliderHandle::from_raw_parts(id.0 as u32, (id.0 >> 32) as u32)
}

pub fn body_id(handle: RigidBodyHandle) -> BodyId {
    let (index, generation) = handle.into_raw_parts();
    BodyId((u64::from(generation) << 32) | u64::from(index))
}

pub fn body_handle(id: BodyId) -> RigidBodyHandle {
    RigidBodyHandle::from_raw_parts(id.0 as u32, (id.0 >> 32) as u32)
}

impl PhysicsWorld {
    /// Closest hit for a weapon ray, honouring its layer mask.
    pub fn cast_shot_ray(&self, query: &RayQuery) -> Option<RayHit> {
        let direction = query.direction.normalize_or_zero();
        if direction == Vec3::ZERO || query.max_distance <= 0.0 {
            log::trace!("Ignoring degenerate shot ray {:?}", query);
            return None;
        }
        let ray = Ray::new(
            point![query.origin.x, query.origin.y, query.origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let filter = QueryFilter::default()
            .exclude_sensors()
            .groups(query_groups(query.layers));

        let mut best: Option<(ColliderHandle, RayIntersection)> = None;
        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            query.max_distance,
            true,
            filter,
            |collider, intersection: RayIntersection| {
                let closer = best.map_or(true, |(_, b)| intersection.time_of_impact < b.time_of_impact);
                if intersection.time_of_impact > START_INSIDE_EPSILON && closer {
                    best = Some((collider, intersection));
                }
                true // Continue searching
            },
        );

        best.map(|(collider, intersection)| self.shot_hit(&ray, collider, intersection))
    }

    /// Object a collider belongs to: explicit tag, else its body, else itself.
    pub fn root_of(&self, handle: ColliderHandle) -> RootId {
        if let Some(root) = self.explicit_root(handle) {
            return root;
        }
        match self.colliders.get(handle).and_then(|c| c.parent()) {
            Some(body) => RootId(body_id(body).0),
            None => RootId(FREE_COLLIDER_ROOT | collider_id(handle).0),
        }
    }

    fn shot_hit(&self, ray: &Ray, handle: ColliderHandle, intersection: RayIntersection) -> RayHit {
        let point = ray.point_at(intersection.time_of_impact);
        let collider = self.colliders.get(handle);
        let triangle = match (intersection.feature, collider.and_then(|c| c.shape().as_trimesh())) {
            (FeatureId::Face(face), Some(mesh)) if !mesh.indices().is_empty() => {
                Some(face % mesh.indices().len() as u32)
            }
            _ => None,
        };

        RayHit {
            point: Vec3::new(point.x, point.y, point.z),
            normal: Vec3::new(
                intersection.normal.x,
                intersection.normal.y,
                intersection.normal.z,
            ),
            distance: intersection.time_of_impact,
            collider: collider_id(handle),
            body: collider.and_then(|c| c.parent()).map(body_id),
            root: self.root_of(handle),
            triangle,
        }
    }
}
