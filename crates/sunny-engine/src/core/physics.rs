use glam::Vec2;

use crate::api::types::{CollisionPair, EntityId, LayerId, TileTrigger};
use crate::components::collider::{Aabb, Collider};
use crate::components::entity::Entity;
use crate::components::kinematic::{CollisionFlags, KinematicBody};
use crate::components::tilemap::{TileLayer, TileType};
use crate::config::PhysicsConfig;
use crate::core::arena::Arena;
use crate::core::scene::Scene;
use crate::core::tile_collision::{scan_triggers, sweep_x, sweep_y, Tolerances, TriggerScan};

// ---------------------------------------------------------------------------
// PhysicsEngine
// ---------------------------------------------------------------------------

/// Kinematic platformer physics over entities and tile layers held by a
/// [`Scene`].
///
/// Each update runs integrate → tile resolution (X then Y) → trigger scan →
/// world-bounds clamp for every registered body, then one object-overlap
/// pass. The two result sets are rebuilt from scratch on every update.
pub struct PhysicsEngine {
    gravity: Vec2,
    max_speed: f32,
    world_bounds: Option<Aabb>,
    slope_snap_tolerance: f32,
    ladder_top_tolerance: f32,
    max_step_height: f32,
    bodies: Vec<EntityId>,
    layers: Vec<LayerId>,
    collision_pairs: Vec<CollisionPair>,
    tile_triggers: Vec<TileTrigger>,
}

impl PhysicsEngine {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            max_speed: config.max_speed.max(0.0),
            world_bounds: config.world_bounds_aabb(),
            slope_snap_tolerance: config.slope_snap_tolerance.max(0.0),
            ladder_top_tolerance: config.ladder_top_tolerance.max(0.0),
            max_step_height: config.max_step_height.max(0.0),
            bodies: Vec::new(),
            layers: Vec::new(),
            collision_pairs: Vec::new(),
            tile_triggers: Vec::new(),
        }
    }

    // -- Registration --

    /// Start simulating an entity. Returns false if it was already registered.
    pub fn register(&mut self, id: EntityId) -> bool {
        if self.bodies.contains(&id) {
            return false;
        }
        log::debug!("Registered body {:?}", id);
        self.bodies.push(id);
        true
    }

    pub fn unregister(&mut self, id: EntityId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|&b| b != id);
        self.bodies.len() != before
    }

    pub fn is_registered(&self, id: EntityId) -> bool {
        self.bodies.contains(&id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Use a scene layer for collision. Unknown handles and malformed layers
    /// are rejected.
    pub fn register_layer(&mut self, scene: &Scene, id: LayerId) -> bool {
        let Some(layer) = scene.layer(id) else {
            log::warn!("Cannot register tile layer {:?}: not in scene", id);
            return false;
        };
        if !layer.is_valid() {
            log::warn!(
                "Cannot register tile layer {:?}: {}x{} tiles of {:?} with malformed tile data",
                id,
                layer.width,
                layer.height,
                layer.tile_size
            );
            return false;
        }
        if self.layers.contains(&id) {
            return false;
        }
        log::debug!(
            "Registered collision layer {:?} ({} collidable tiles)",
            id,
            layer.collidable_count()
        );
        self.layers.push(id);
        true
    }

    pub fn unregister_layer(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|&l| l != id);
        self.layers.len() != before
    }

    // -- Parameters --

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Negative limits are ignored.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        if max_speed < 0.0 {
            log::warn!("Ignoring negative max speed {}", max_speed);
            return;
        }
        self.max_speed = max_speed;
    }

    pub fn world_bounds(&self) -> Option<Aabb> {
        self.world_bounds
    }

    pub fn set_world_bounds(&mut self, bounds: Option<Aabb>) {
        self.world_bounds = bounds;
    }

    // -- Results --

    /// Entity pairs whose colliders overlapped during the last update.
    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.collision_pairs
    }

    /// Tile triggers raised during the last update.
    pub fn tile_triggers(&self) -> &[TileTrigger] {
        &self.tile_triggers
    }

    // -- Simulation --

    /// Advance every registered body by `dt` seconds.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) {
        self.collision_pairs.clear();
        self.tile_triggers.clear();

        let (entities, layer_arena) = scene.split_mut();
        let layers: Vec<&TileLayer> = self
            .layers
            .iter()
            .filter_map(|&id| {
                let layer = layer_arena.get(id);
                if layer.is_none() {
                    log::debug!("Skipping stale tile layer {:?}", id);
                }
                layer
            })
            .collect();

        for i in 0..self.bodies.len() {
            let id = self.bodies[i];
            let Some(entity) = entities.get_mut(id) else {
                log::debug!("Skipping stale body {:?}", id);
                continue;
            };
            if !entity.active {
                continue;
            }
            let scan = self.step_body(id, entity, &layers, dt);
            if scan.is_some_and(|s| s.hazard) {
                self.tile_triggers.push(TileTrigger {
                    entity: id,
                    tile_type: TileType::Hazard,
                });
            }
        }

        self.detect_overlaps(entities);
    }

    /// Integrate and resolve one body. Returns the trigger scan when the
    /// body took part in tile collision.
    fn step_body(
        &self,
        id: EntityId,
        entity: &mut Entity,
        layers: &[&TileLayer],
        dt: f32,
    ) -> Option<TriggerScan> {
        let Entity {
            pos,
            body,
            collider,
            ..
        } = entity;
        let Some(body) = body.as_mut() else {
            log::warn!("Registered entity {:?} has no kinematic body", id);
            return None;
        };
        if !body.enabled {
            return None;
        }

        let was_grounded = body.flags.grounded;
        body.flags = CollisionFlags::default();
        body.integrate(self.gravity, self.max_speed, dt);
        let delta = body.velocity * dt;

        let Some(collider) = collider.filter(|c| c.enabled) else {
            *pos += delta;
            self.clamp_to_bounds(pos, None, body);
            return None;
        };
        if collider.trigger {
            *pos += delta;
            self.clamp_to_bounds(pos, Some(&collider), body);
            return None;
        }

        let tol = Tolerances {
            slope_snap: self.slope_snap_tolerance,
            ladder_top: self.ladder_top_tolerance,
            step: if was_grounded && body.use_gravity {
                self.max_step_height
            } else {
                0.0
            },
        };

        let x = sweep_x(layers, collider.world_aabb(*pos), delta.x, &tol);
        pos.x += x.dx;
        if x.blocked {
            body.velocity.x = 0.0;
            if delta.x > 0.0 {
                body.flags.wall_right = true;
            } else {
                body.flags.wall_left = true;
            }
        }

        let y = sweep_y(layers, collider.world_aabb(*pos), delta.y, &tol);
        pos.y += y.dy;
        if y.grounded {
            body.flags.grounded = true;
            body.velocity.y = body.velocity.y.min(0.0);
        }
        if y.ceiling {
            body.flags.ceiling = true;
            body.velocity.y = body.velocity.y.max(0.0);
        }

        let scan = scan_triggers(layers, collider.world_aabb(*pos), &tol);
        body.flags.on_ladder = scan.on_ladder;
        body.flags.ladder_top = scan.ladder_top;

        self.clamp_to_bounds(pos, Some(&collider), body);
        Some(scan)
    }

    /// Keep a body inside the left, right and top world edges. The bottom
    /// is left open.
    fn clamp_to_bounds(&self, pos: &mut Vec2, collider: Option<&Collider>, body: &mut KinematicBody) {
        let Some(bounds) = self.world_bounds else {
            return;
        };
        let (offset, size) = collider.map_or((Vec2::ZERO, Vec2::ZERO), |c| (c.offset, c.size));

        let left = pos.x + offset.x;
        if left < bounds.left() {
            pos.x = bounds.left() - offset.x;
            body.velocity.x = body.velocity.x.max(0.0);
            body.flags.wall_left = true;
        } else if left + size.x > bounds.right() {
            pos.x = bounds.right() - size.x - offset.x;
            body.velocity.x = body.velocity.x.min(0.0);
            body.flags.wall_right = true;
        }

        if pos.y + offset.y < bounds.top() {
            pos.y = bounds.top() - offset.y;
            body.velocity.y = body.velocity.y.max(0.0);
            body.flags.ceiling = true;
        }
    }

    /// Quadratic scan over registered bodies with enabled colliders.
    fn detect_overlaps(&mut self, entities: &Arena<Entity>) {
        let boxes: Vec<(EntityId, Aabb)> = self
            .bodies
            .iter()
            .filter_map(|&id| {
                let entity = entities.get(id)?;
                if !entity.active || entity.body.is_none() {
                    return None;
                }
                let collider = entity.collider.filter(|c| c.enabled)?;
                Some((id, collider.world_aabb(entity.pos)))
            })
            .collect();

        for (i, (a, box_a)) in boxes.iter().enumerate() {
            for (b, box_b) in &boxes[i + 1..] {
                if box_a.intersects(box_b) {
                    self.collision_pairs.push(CollisionPair {
                        entity_a: *a,
                        entity_b: *b,
                    });
                }
            }
        }
    }
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tilemap::{layer_from_ascii, TileInfo};

    const DT: f32 = 1.0 / 60.0;

    fn world(rows: &[&str]) -> (Scene, PhysicsEngine) {
        let mut scene = Scene::new();
        let mut physics = PhysicsEngine::default();
        let layer = scene.add_layer(layer_from_ascii(rows, 16.0));
        assert!(physics.register_layer(&scene, layer));
        (scene, physics)
    }

    fn spawn_box(scene: &mut Scene, physics: &mut PhysicsEngine, pos: Vec2, body: KinematicBody) -> EntityId {
        let id = scene.spawn(
            Entity::new()
                .with_pos(pos)
                .with_body(body)
                .with_collider(Collider::new(Vec2::splat(12.0))),
        );
        physics.register(id);
        id
    }

    fn body(scene: &Scene, id: EntityId) -> &KinematicBody {
        scene.get(id).and_then(|e| e.body.as_ref()).unwrap()
    }

    #[test]
    fn resting_on_solid_stays_grounded() {
        let (mut scene, mut physics) = world(&["....", "....", "####"]);
        let id = spawn_box(&mut scene, &mut physics, Vec2::new(4.0, 20.0), KinematicBody::new());

        for _ in 0..30 {
            physics.update(&mut scene, DT);
            let b = body(&scene, id);
            assert!(b.flags.grounded);
            assert_eq!(b.velocity.y, 0.0);
            let bottom = scene.get(id).unwrap().aabb().unwrap().bottom();
            assert!((bottom - 32.0).abs() < 1e-4);
        }
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let (mut scene, mut physics) = world(&["....", "....", "....", "####"]);
        let id = spawn_box(&mut scene, &mut physics, Vec2::new(4.0, 0.0), KinematicBody::new());

        for _ in 0..60 {
            physics.update(&mut scene, DT);
        }
        let e = scene.get(id).unwrap();
        assert!(e.body.as_ref().unwrap().flags.grounded);
        assert!((e.aabb().unwrap().bottom() - 48.0).abs() < 1e-4);
    }

    #[test]
    fn jump_leaves_ground_next_update() {
        let (mut scene, mut physics) = world(&["....", "....", "####"]);
        let id = spawn_box(&mut scene, &mut physics, Vec2::new(4.0, 20.0), KinematicBody::new());
        physics.update(&mut scene, DT);
        assert!(body(&scene, id).flags.grounded);

        scene.get_mut(id).unwrap().body.as_mut().unwrap().velocity.y = -350.0;
        physics.update(&mut scene, DT);
        let b = body(&scene, id);
        assert!(!b.flags.grounded);
        assert!(b.velocity.y < 0.0);
    }

    #[test]
    fn wall_sets_side_flag_and_zeroes_velocity() {
        let (mut scene, mut physics) = world(&["....#", "....#", "#####"]);
        let id = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(50.0, 20.0),
            KinematicBody::new().with_velocity(Vec2::new(300.0, 0.0)),
        );
        physics.update(&mut scene, DT);
        let b = body(&scene, id);
        assert!(b.flags.wall_right);
        assert_eq!(b.velocity.x, 0.0);
        assert!((scene.get(id).unwrap().pos.x - 52.0).abs() < 1e-4);
    }

    #[test]
    fn one_way_platform_passes_upward_and_catches_downward() {
        let (mut scene, mut physics) = world(&["....", "====", "....", "...."]);
        let id = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(4.0, 40.0),
            KinematicBody::new()
                .with_gravity(false)
                .with_velocity(Vec2::new(0.0, -120.0)),
        );

        for _ in 0..20 {
            physics.update(&mut scene, DT);
            assert!(!body(&scene, id).flags.ceiling);
        }
        assert!(scene.get(id).unwrap().pos.y.abs() < 1e-3);

        {
            let b = scene.get_mut(id).unwrap().body.as_mut().unwrap();
            b.velocity = Vec2::ZERO;
            b.use_gravity = true;
        }
        for _ in 0..30 {
            physics.update(&mut scene, DT);
        }
        let e = scene.get(id).unwrap();
        assert!(e.body.as_ref().unwrap().flags.grounded);
        assert!((e.aabb().unwrap().bottom() - 16.0).abs() < 1e-4);
    }

    #[test]
    fn walks_up_slope_and_onto_adjoining_block() {
        let (mut scene, mut physics) = world(&["......", "../###", "######"]);
        let id = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(4.0, 20.0),
            KinematicBody::new().with_velocity(Vec2::new(60.0, 0.0)),
        );

        for _ in 0..60 {
            physics.update(&mut scene, DT);
            assert!(!body(&scene, id).flags.wall_right);
        }
        let e = scene.get(id).unwrap();
        let b = e.aabb().unwrap();
        assert!(e.body.as_ref().unwrap().flags.grounded);
        assert!(b.left() > 48.0);
        assert!((b.bottom() - 16.0).abs() < 1e-3);
    }

    #[test]
    fn walks_down_slope_without_leaving_the_ground() {
        let (mut scene, mut physics) = world(&["......", "#\\....", "######"]);
        let id = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(2.0, 4.0),
            KinematicBody::new().with_velocity(Vec2::new(120.0, 0.0)),
        );

        for frame in 0..20 {
            physics.update(&mut scene, DT);
            assert!(body(&scene, id).flags.grounded, "airborne on frame {}", frame);
        }
        let b = scene.get(id).unwrap().aabb().unwrap();
        assert!(b.left() > 38.0);
        assert!((b.bottom() - 32.0).abs() < 1e-3);
    }

    #[test]
    fn hazard_reports_one_trigger_without_touching_velocity() {
        let (mut scene, mut physics) = world(&["^^^^^^^^"]);
        let id = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(4.0, 2.0),
            KinematicBody::new()
                .with_gravity(false)
                .with_velocity(Vec2::new(30.0, 0.0)),
        );

        for _ in 0..3 {
            physics.update(&mut scene, DT);
            assert_eq!(
                physics.tile_triggers(),
                &[TileTrigger {
                    entity: id,
                    tile_type: TileType::Hazard
                }]
            );
            assert_eq!(body(&scene, id).velocity, Vec2::new(30.0, 0.0));
        }
    }

    #[test]
    fn ladder_flags_follow_overlap() {
        let (mut scene, mut physics) = world(&[".H..", ".H..", "####"]);
        let id = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(18.0, 20.0),
            KinematicBody::new(),
        );
        physics.update(&mut scene, DT);
        let b = body(&scene, id);
        assert!(b.flags.on_ladder);
        assert!(b.flags.grounded);
    }

    #[test]
    fn result_sets_are_replaced_each_update() {
        let (mut scene, mut physics) = world(&["....", "....", "####"]);
        let free = KinematicBody::new().with_gravity(false);
        let a = spawn_box(&mut scene, &mut physics, Vec2::new(0.0, 0.0), free.clone());
        let b = spawn_box(&mut scene, &mut physics, Vec2::new(6.0, 0.0), free);

        physics.update(&mut scene, DT);
        assert_eq!(
            physics.collision_pairs(),
            &[CollisionPair {
                entity_a: a,
                entity_b: b
            }]
        );
        physics.update(&mut scene, DT);
        assert_eq!(physics.collision_pairs().len(), 1);

        scene.get_mut(b).unwrap().pos.x = 40.0;
        physics.update(&mut scene, DT);
        assert!(physics.collision_pairs().is_empty());
        assert!(physics.tile_triggers().is_empty());
    }

    #[test]
    fn disabled_collider_moves_freely_and_never_overlaps() {
        let (mut scene, mut physics) = world(&["....", "####", "####"]);
        let id = spawn_box(&mut scene, &mut physics, Vec2::new(4.0, 0.0), KinematicBody::new());
        let other = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(4.0, 0.0),
            KinematicBody::new().with_gravity(false),
        );
        if let Some(c) = scene.get_mut(id).unwrap().collider.as_mut() {
            c.enabled = false;
        }

        for _ in 0..30 {
            physics.update(&mut scene, DT);
        }
        assert!(scene.get(id).unwrap().pos.y > 16.0);
        assert!(!body(&scene, id).flags.grounded);
        assert!(physics.collision_pairs().is_empty());
        assert!(scene.contains(other));
    }

    #[test]
    fn trigger_collider_passes_through_tiles_but_overlaps() {
        let (mut scene, mut physics) = world(&["....", "####", "####"]);
        let id = spawn_box(&mut scene, &mut physics, Vec2::new(4.0, 2.0), KinematicBody::new());
        if let Some(c) = scene.get_mut(id).unwrap().collider.as_mut() {
            c.trigger = true;
        }
        let sensor = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(4.0, 20.0),
            KinematicBody::new().with_gravity(false),
        );

        let mut overlapped = false;
        for _ in 0..30 {
            physics.update(&mut scene, DT);
            overlapped |= physics
                .collision_pairs()
                .iter()
                .any(|p| p.other(id) == Some(sensor));
            assert!(!body(&scene, id).flags.grounded);
        }
        assert!(overlapped);
        assert!(scene.get(id).unwrap().pos.y > 20.0);
    }

    #[test]
    fn world_bounds_clamp_sides_and_top_only() {
        let (mut scene, mut physics) = world(&["...."]);
        physics.set_world_bounds(Some(Aabb::new(Vec2::ZERO, Vec2::new(64.0, 64.0))));
        let left = spawn_box(
            &mut scene,
            &mut physics,
            Vec2::new(1.0, 30.0),
            KinematicBody::new()
                .with_gravity(false)
                .with_velocity(Vec2::new(-120.0, -240.0)),
        );
        let falling = spawn_box(&mut scene, &mut physics, Vec2::new(30.0, 60.0), KinematicBody::new());

        physics.update(&mut scene, DT);
        assert!(body(&scene, left).flags.wall_left);
        assert_eq!(scene.get(left).unwrap().pos.x, 0.0);

        let mut hit_top = false;
        for _ in 0..20 {
            physics.update(&mut scene, DT);
            hit_top |= body(&scene, left).flags.ceiling;
        }
        assert!(hit_top);
        assert_eq!(scene.get(left).unwrap().pos, Vec2::new(0.0, 0.0));
        assert_eq!(body(&scene, left).velocity, Vec2::ZERO);
        assert!(scene.get(falling).unwrap().pos.y > 64.0);
    }

    #[test]
    fn stale_and_incomplete_bodies_are_skipped() {
        let (mut scene, mut physics) = world(&["....", "####"]);
        let gone = spawn_box(&mut scene, &mut physics, Vec2::ZERO, KinematicBody::new());
        scene.despawn(gone);
        scene.flush_removals();

        let bare = scene.spawn(Entity::new().with_pos(Vec2::new(5.0, 5.0)));
        physics.register(bare);
        physics.update(&mut scene, DT);
        assert_eq!(scene.get(bare).unwrap().pos, Vec2::new(5.0, 5.0));
        assert!(physics.collision_pairs().is_empty());
    }

    #[test]
    fn invalid_layers_are_rejected() {
        let mut scene = Scene::new();
        let mut physics = PhysicsEngine::default();
        let broken = scene.add_layer(TileLayer::from_tiles(
            4,
            4,
            Vec2::splat(16.0),
            vec![TileInfo::default(); 3],
        ));
        assert!(!physics.register_layer(&scene, broken));
        let huge = scene.add_layer(TileLayer::from_tiles(
            70_000,
            70_000,
            Vec2::splat(16.0),
            vec![TileInfo::default(); 4],
        ));
        assert!(!physics.register_layer(&scene, huge));

        let ok = scene.add_layer(TileLayer::new(4, 4, Vec2::splat(16.0)));
        assert!(physics.register_layer(&scene, ok));
        assert!(!physics.register_layer(&scene, ok));
        assert!(physics.unregister_layer(ok));
    }

    #[test]
    fn registration_is_idempotent() {
        let mut scene = Scene::new();
        let mut physics = PhysicsEngine::default();
        let id = scene.spawn(Entity::new().with_body(KinematicBody::new()));
        assert!(physics.register(id));
        assert!(!physics.register(id));
        assert_eq!(physics.body_count(), 1);
        assert!(physics.unregister(id));
        assert!(!physics.is_registered(id));
    }

    #[test]
    fn negative_max_speed_is_ignored() {
        let mut physics = PhysicsEngine::default();
        physics.set_max_speed(-1.0);
        assert_eq!(physics.max_speed(), 500.0);
        physics.set_max_speed(200.0);
        assert_eq!(physics.max_speed(), 200.0);
    }
}
