//! Rapier scene: bodies, colliders and the query pipeline used by shots.

use crate::collision::CollisionLayer;
use engine_core::Vec3;
use rapier3d::prelude::*;
use weapons::RootId;

/// Solver state the scene never touches outside of `step`.
struct Solver {
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
}

impl Solver {
    fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        }
    }
}

/// Bodies and colliders of the range plus the query pipeline shot rays go
/// through. The pipeline is refreshed by `step`; call
/// [`PhysicsWorld::update_query_pipeline`] after building a scene.
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub gravity: Vector<Real>,
    pub params: IntegrationParameters,
    pub query_pipeline: QueryPipeline,
    solver: Solver,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            params: IntegrationParameters::default(),
            query_pipeline: QueryPipeline::new(),
            solver: Solver::new(),
        }
    }

    /// Seconds simulated per `step`.
    pub fn set_timestep(&mut self, dt: f32) {
        self.params.dt = dt;
    }

    pub fn step(&mut self) {
        let solver = &mut self.solver;
        solver.pipeline.step(
            &self.gravity,
            &self.params,
            &mut solver.islands,
            &mut solver.broad_phase,
            &mut solver.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut solver.impulse_joints,
            &mut solver.multibody_joints,
            &mut solver.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    fn insert_body(&mut self, builder: RigidBodyBuilder, position: Vec3) -> RigidBodyHandle {
        self.bodies.insert(builder.translation(to_vector(position)).build())
    }

    /// Body that reacts to impulses and gravity.
    pub fn add_dynamic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        self.insert_body(RigidBodyBuilder::dynamic(), position)
    }

    /// Body moved only by the host (shooter, standing targets).
    pub fn add_kinematic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        self.insert_body(RigidBodyBuilder::kinematic_position_based(), position)
    }

    fn insert_collider(
        &mut self,
        builder: ColliderBuilder,
        parent: Option<RigidBodyHandle>,
        layer: CollisionLayer,
    ) -> ColliderHandle {
        let collider = builder.collision_groups(layer.groups()).build();
        match parent {
            Some(body) => self
                .colliders
                .insert_with_parent(collider, body, &mut self.bodies),
            None => self.colliders.insert(collider),
        }
    }

    pub fn add_box_collider(
        &mut self,
        body: RigidBodyHandle,
        half_extents: Vec3,
        layer: CollisionLayer,
    ) -> ColliderHandle {
        let shape = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.insert_collider(shape, Some(body), layer)
    }

    /// Upright capsule, centred on the body.
    pub fn add_capsule_collider(
        &mut self,
        body: RigidBodyHandle,
        half_height: f32,
        radius: f32,
        layer: CollisionLayer,
    ) -> ColliderHandle {
        self.insert_collider(ColliderBuilder::capsule_y(half_height, radius), Some(body), layer)
    }

    /// Floor at y = 0.
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        self.insert_collider(
            ColliderBuilder::halfspace(Vector::y_axis()),
            None,
            CollisionLayer::Environment,
        )
    }

    /// Fixed box with no body (walls, plates).
    pub fn add_static_cuboid(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        layer: CollisionLayer,
    ) -> ColliderHandle {
        let shape = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(center));
        self.insert_collider(shape, None, layer)
    }

    /// Tag a collider with the object it belongs to, for self-hit checks.
    pub fn set_root(&mut self, collider: ColliderHandle, root: RootId) {
        if let Some(c) = self.colliders.get_mut(collider) {
            c.user_data = u128::from(root.0) + 1;
        }
    }

    /// Explicit root set with [`PhysicsWorld::set_root`].
    pub fn explicit_root(&self, collider: ColliderHandle) -> Option<RootId> {
        let data = self.colliders.get(collider)?.user_data;
        (data != 0).then(|| RootId((data - 1) as u64))
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| {
            let p = body.translation();
            Vec3::new(p.x, p.y, p.z)
        })
    }

    /// Linear velocity of a body, zero if it does not exist.
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies
            .get(handle)
            .map(|body| {
                let v = body.linvel();
                Vec3::new(v.x, v.y, v.z)
            })
            .unwrap_or(Vec3::ZERO)
    }

    /// Push a dynamic body. Fixed and kinematic bodies ignore it.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        match self.bodies.get_mut(handle) {
            Some(body) if body.is_dynamic() => body.apply_impulse(to_vector(impulse), true),
            Some(_) => log::trace!("Impulse on non-dynamic body {:?} ignored", handle),
            None => {}
        }
    }
}
