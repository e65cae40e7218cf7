//! Collider → surface material lookup.

use std::collections::HashMap;

use rapier3d::prelude::ColliderHandle;
use weapons::{RayHit, SurfaceIdentifier, SurfaceMaterial};

use crate::raycast::collider_handle;

/// Surfaces assigned to colliders. Colliders without an entry have no
/// surface: no decal, no penetration.
#[derive(Debug, Default, Clone)]
pub struct SurfaceRegistry {
    surfaces: HashMap<ColliderHandle, SurfaceIdentifier>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, collider: ColliderHandle, surface: SurfaceIdentifier) {
        self.surfaces.insert(collider, surface);
    }

    pub fn remove(&mut self, collider: ColliderHandle) -> Option<SurfaceIdentifier> {
        self.surfaces.remove(&collider)
    }

    pub fn get(&self, collider: ColliderHandle) -> Option<&SurfaceIdentifier> {
        self.surfaces.get(&collider)
    }

    /// Material under a hit, resolved per triangle.
    pub fn material_at(&self, hit: &RayHit) -> Option<SurfaceMaterial> {
        self.get(collider_handle(hit.collider))
            .map(|surface| surface.material(hit.triangle))
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
