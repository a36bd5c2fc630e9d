use crate::api::types::{EntityId, LayerId};
use crate::components::entity::Entity;
use crate::components::tilemap::TileLayer;
use crate::config::GameConfig;
use crate::core::physics::PhysicsEngine;
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use crate::events::bus::{EventBus, GameEvent};
use crate::input::queue::InputQueue;
use crate::player::action::PlayerAction;

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities and tile layers.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Interpret this frame's physics results: apply damage, pick up items,
    /// despawn things. Runs after physics and the player update.
    fn update(&mut self, ctx: &mut EngineContext, dt: f32);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsEngine,
    pub bus: EventBus,
    pub config: GameConfig,
    clock: FixedTimestep,
    removed: Vec<EntityId>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            physics: PhysicsEngine::new(&config.physics),
            bus: EventBus::new(),
            clock: FixedTimestep::new(config.fixed_dt),
            config,
            removed: Vec::new(),
        }
    }

    /// Build a context from the game's config and run its `init`.
    pub fn start<G: Game + ?Sized>(game: &mut G) -> Self {
        let mut ctx = Self::with_config(game.config());
        game.init(&mut ctx);
        log::info!(
            "Started with {} entities, {} bodies",
            ctx.scene.len(),
            ctx.physics.body_count()
        );
        ctx
    }

    // -- Scene management --

    /// Add an entity. Entities with a kinematic body are registered with
    /// physics; player controllers are entered into their first state.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let has_body = entity.body.is_some();
        let id = self.scene.spawn(entity);
        if has_body {
            self.physics.register(id);
        }
        if let Some((player, mut parts)) = self.scene.get_mut(id).and_then(|e| e.player_parts()) {
            player.reset(&mut parts);
        }
        id
    }

    /// Store a tile layer, and register it for collision when `collide`.
    /// A layer that fails validation is still stored but does not collide.
    pub fn spawn_layer(&mut self, layer: TileLayer, collide: bool) -> LayerId {
        let id = self.scene.add_layer(layer);
        if collide {
            self.physics.register_layer(&self.scene, id);
        }
        id
    }

    /// Mark an entity for removal at the end of the frame.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.scene.despawn(id)
    }

    /// Entities removed at the end of the previous frame.
    pub fn removed_last_frame(&self) -> &[EntityId] {
        &self.removed
    }

    /// First entity carrying a player controller.
    pub fn player(&self) -> Option<EntityId> {
        self.scene
            .iter()
            .find(|(_, e)| e.player.is_some())
            .map(|(id, _)| id)
    }

    // -- Health helpers --

    /// Damage an entity with health. Publishes `HealthChanged` and kills the
    /// entity's player controller when health runs out. Returns false when
    /// the hit was ignored (no health, invincible, already dead).
    pub fn damage(&mut self, id: EntityId, amount: i32) -> bool {
        let Some(health) = self.scene.get_mut(id).and_then(|e| e.health.as_mut()) else {
            log::debug!("Damage to {:?} ignored: no health", id);
            return false;
        };
        if !health.take_damage(amount) {
            return false;
        }
        let (current, max, alive) = (health.current(), health.max(), health.is_alive());
        self.bus.publish(GameEvent::HealthChanged {
            entity: id,
            current,
            max,
        });
        if !alive {
            self.kill(id);
        }
        true
    }

    /// Returns the amount actually restored.
    pub fn heal(&mut self, id: EntityId, amount: i32) -> i32 {
        let Some(health) = self.scene.get_mut(id).and_then(|e| e.health.as_mut()) else {
            return 0;
        };
        let restored = health.heal(amount);
        if restored > 0 {
            let (current, max) = (health.current(), health.max());
            self.bus.publish(GameEvent::HealthChanged {
                entity: id,
                current,
                max,
            });
        }
        restored
    }

    pub fn set_max_health(&mut self, id: EntityId, max: i32) -> bool {
        let Some(health) = self.scene.get_mut(id).and_then(|e| e.health.as_mut()) else {
            return false;
        };
        if !health.set_max(max) {
            return false;
        }
        self.bus.publish(GameEvent::MaxHealthChanged { entity: id, max });
        true
    }

    /// Kill an entity's player controller and zero its health.
    /// Returns false if there was nothing to kill.
    pub fn kill(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.scene.get_mut(id) else {
            return false;
        };
        let mut zeroed = None;
        if let Some(health) = entity.health.as_mut() {
            if health.is_alive() {
                health.set_current(0);
                zeroed = Some(health.max());
            }
        }
        let killed = match entity.player_parts() {
            Some((player, mut parts)) => player.kill(&mut parts),
            None => false,
        };
        if let Some(max) = zeroed {
            self.bus.publish(GameEvent::HealthChanged {
                entity: id,
                current: 0,
                max,
            });
        }
        if killed {
            log::info!("Player {:?} died", id);
        }
        killed
    }

    // -- Frame loop --

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.removed.clear();
    }

    /// Run one fixed step.
    ///
    /// Order: input → physics → player/health/animation → game rules →
    /// deferred removals.
    pub fn frame<G: Game + ?Sized>(&mut self, game: &mut G, input: &mut InputQueue, dt: f32) {
        self.clear_frame_data();
        let actions = input.drain();
        self.dispatch_actions(&actions);
        self.physics.update(&mut self.scene, dt);
        self.update_entities(dt);
        game.update(self, dt);
        self.flush_removals();
    }

    /// Feed wall-clock time and run as many fixed steps as are due.
    /// Pending input goes to the first step. Returns the number of steps run.
    pub fn advance<G: Game + ?Sized>(&mut self, game: &mut G, input: &mut InputQueue, elapsed: f32) -> u32 {
        let steps = self.clock.accumulate(elapsed);
        let dt = self.clock.dt();
        let mut idle = InputQueue::new();
        for step in 0..steps {
            let queue = if step == 0 { &mut *input } else { &mut idle };
            self.frame(game, queue, dt);
        }
        steps
    }

    /// Interpolation fraction left over after the last `advance`.
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    fn dispatch_actions(&mut self, actions: &[PlayerAction]) {
        if actions.is_empty() {
            return;
        }
        for (_, entity) in self.scene.iter_mut() {
            if !entity.active {
                continue;
            }
            if let Some((player, mut parts)) = entity.player_parts() {
                for &action in actions {
                    player.handle_action(action, &mut parts);
                }
            }
        }
    }

    fn update_entities(&mut self, dt: f32) {
        for (_, entity) in self.scene.iter_mut() {
            if !entity.active {
                continue;
            }
            if let Some((player, mut parts)) = entity.player_parts() {
                player.update(&mut parts, dt);
            }
            if let Some(health) = entity.health.as_mut() {
                health.tick(dt);
            }
            if let Some(animation) = entity.animation.as_mut() {
                animation.tick(dt);
            }
        }
    }

    /// Frame boundary: drop despawned entities and forget their bodies.
    fn flush_removals(&mut self) {
        let removed = self.scene.flush_removals();
        for &id in &removed {
            self.physics.unregister(id);
        }
        if !removed.is_empty() {
            log::debug!("Removed {} entities at frame end", removed.len());
        }
        self.removed = removed;
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::collider::Collider;
    use crate::components::health::Health;
    use crate::components::kinematic::KinematicBody;
    use crate::components::tilemap::layer_from_ascii;
    use crate::events::bus::EventKind;
    use crate::player::controller::PlayerController;
    use crate::player::state::PlayerState;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Floor level with one player; despawns anything tagged "doomed".
    struct Sandbox {
        player: Option<EntityId>,
        seen_pairs: usize,
    }

    impl Game for Sandbox {
        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.spawn_layer(layer_from_ascii(&["........", "........", "########"], 16.0), true);
            let player = Entity::new()
                .with_name("player")
                .with_pos(Vec2::new(4.0, 20.0))
                .with_body(KinematicBody::new())
                .with_collider(Collider::new(Vec2::splat(12.0)))
                .with_health(Health::new(3).with_invincibility(0.0))
                .with_player(PlayerController::new(ctx.config.player.clone()));
            self.player = Some(ctx.spawn(player));
        }

        fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
            self.seen_pairs += ctx.physics.collision_pairs().len();
            for id in ctx.scene.find_all_by_tag("doomed") {
                ctx.despawn(id);
            }
        }
    }

    fn started() -> (Sandbox, EngineContext) {
        let mut game = Sandbox {
            player: None,
            seen_pairs: 0,
        };
        let ctx = EngineContext::start(&mut game);
        (game, ctx)
    }

    #[test]
    fn spawn_registers_bodies_only() {
        let (game, mut ctx) = started();
        assert!(ctx.physics.is_registered(game.player.unwrap()));
        let prop = ctx.spawn(Entity::new().with_collider(Collider::new(Vec2::ONE)));
        assert!(!ctx.physics.is_registered(prop));
        assert_eq!(ctx.player(), game.player);
    }

    #[test]
    fn frame_dispatches_input_before_physics() {
        let (mut game, mut ctx) = started();
        let mut input = InputQueue::new();
        for _ in 0..5 {
            ctx.frame(&mut game, &mut input, DT);
        }
        let id = game.player.unwrap();
        assert!(ctx.scene.get(id).unwrap().body.as_ref().unwrap().flags.grounded);

        input.push(PlayerAction::Jump);
        ctx.frame(&mut game, &mut input, DT);
        let e = ctx.scene.get(id).unwrap();
        assert_eq!(e.player.as_ref().unwrap().state(), PlayerState::Jump);
        assert!(!e.body.as_ref().unwrap().flags.grounded);
        assert!(e.pos.y < 20.0);
        assert!(input.is_empty());
    }

    #[test]
    fn despawn_takes_effect_at_frame_end() {
        let (mut game, mut ctx) = started();
        let doomed = ctx.spawn(
            Entity::new()
                .with_tag("doomed")
                .with_pos(Vec2::new(4.0, 20.0))
                .with_body(KinematicBody::new())
                .with_collider(Collider::new(Vec2::splat(12.0))),
        );
        let mut input = InputQueue::new();
        ctx.frame(&mut game, &mut input, DT);

        // Overlap with the player was still reported during the frame
        assert_eq!(game.seen_pairs, 1);
        assert!(ctx.scene.get(doomed).is_none());
        assert!(!ctx.physics.is_registered(doomed));
        assert_eq!(ctx.removed_last_frame(), &[doomed]);

        ctx.frame(&mut game, &mut input, DT);
        assert!(ctx.removed_last_frame().is_empty());
        assert_eq!(game.seen_pairs, 1);
    }

    #[test]
    fn lethal_damage_kills_player_and_publishes() {
        let (game, mut ctx) = started();
        let id = game.player.unwrap();
        let hud = ctx.bus.subscribe(&[EventKind::HealthChanged]);

        assert!(ctx.damage(id, 1));
        assert!(ctx.damage(id, 5));
        assert!(!ctx.damage(id, 1));

        let events = ctx.bus.drain(hud);
        assert_eq!(
            events,
            vec![
                GameEvent::HealthChanged { entity: id, current: 2, max: 3 },
                GameEvent::HealthChanged { entity: id, current: 0, max: 3 },
            ]
        );
        let e = ctx.scene.get(id).unwrap();
        assert!(e.player.as_ref().unwrap().is_dead());
    }

    #[test]
    fn heal_and_max_health_publish() {
        let (game, mut ctx) = started();
        let id = game.player.unwrap();
        let hud = ctx.bus.subscribe(&[EventKind::HealthChanged, EventKind::MaxHealthChanged]);
        ctx.damage(id, 2);
        assert_eq!(ctx.heal(id, 5), 2);
        assert_eq!(ctx.heal(id, 1), 0);
        assert!(ctx.set_max_health(id, 5));
        assert!(!ctx.set_max_health(id, 0));
        assert_eq!(ctx.bus.drain(hud).len(), 3);
    }

    #[test]
    fn advance_runs_fixed_steps() {
        let (mut game, mut ctx) = started();
        let mut input = InputQueue::new();
        assert_eq!(ctx.advance(&mut game, &mut input, 0.01), 0);
        assert_eq!(ctx.advance(&mut game, &mut input, 0.045), 3);
        assert!(ctx.alpha() < 1.0);
    }
}
