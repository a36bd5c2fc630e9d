use crate::api::game::{EngineContext, Game};
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::tilemap::{TileLayer, TileType};
use crate::config::GameConfig;
use crate::gameplay::session::Session;
use crate::gameplay::stomp::{judge_stomp, Contact};

pub const PLAYER_NAME: &str = "player";
pub const TAG_ENEMY: &str = "enemy";
pub const TAG_ITEM: &str = "item";
pub const TAG_HAZARD: &str = "hazard";
pub const TAG_NEXT_LEVEL: &str = "next_level";
pub const WIN_NAME: &str = "win";

const STOMP_SCORE: i32 = 10;
const GEM_SCORE: i32 = 5;
const FRUIT_HEAL: i32 = 1;
const CONTACT_DAMAGE: i32 = 1;
/// How far below the world the player may fall before the run is lost.
const FALL_MARGIN: f32 = 100.0;

/// Where the current level stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Playing,
    /// A `next_level` trigger was touched; carries the trigger's name.
    NextLevel(String),
    Won,
    Lost,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Playing)
    }
}

/// What to spawn when the level starts.
#[derive(Default)]
pub struct Level {
    /// Layers registered for collision.
    pub layers: Vec<TileLayer>,
    /// Decorative layers, stored but never collided with.
    pub background: Vec<TileLayer>,
    pub entities: Vec<Entity>,
}

/// Platformer rules: stomping, pickups, hazards and level exits, driven by
/// the physics results of each frame.
pub struct SunnyRules {
    pub session: Session,
    config: GameConfig,
    level: Option<Level>,
    player: Option<EntityId>,
    outcome: Outcome,
}

impl SunnyRules {
    pub fn new(config: GameConfig, level: Level) -> Self {
        Self {
            session: Session::new(),
            config,
            level: Some(level),
            player: None,
            outcome: Outcome::Playing,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_over() {
            return;
        }
        log::info!("Level finished: {:?}", outcome);
        self.outcome = outcome;
    }

    fn on_hazard_tiles(&mut self, ctx: &mut EngineContext, player: EntityId) {
        let touched = ctx
            .physics
            .tile_triggers()
            .iter()
            .any(|t| t.entity == player && t.tile_type == TileType::Hazard);
        if touched {
            ctx.damage(player, CONTACT_DAMAGE);
        }
    }

    fn on_contacts(&mut self, ctx: &mut EngineContext, player: EntityId) {
        let pairs = ctx.physics.collision_pairs().to_vec();
        for pair in pairs {
            let Some(other) = pair.other(player) else {
                continue;
            };
            if ctx.scene.is_despawning(other) || ctx.scene.is_despawning(player) {
                continue;
            }
            let Some(entity) = ctx.scene.get(other) else {
                continue;
            };
            let (tag, name) = (entity.tag.clone(), entity.name.clone());
            match tag.as_str() {
                TAG_ENEMY => self.on_enemy(ctx, player, other),
                TAG_ITEM => self.on_item(ctx, player, other, &name),
                TAG_HAZARD => {
                    ctx.damage(player, CONTACT_DAMAGE);
                }
                TAG_NEXT_LEVEL => self.finish(Outcome::NextLevel(name)),
                _ if name == WIN_NAME => self.finish(Outcome::Won),
                _ => {}
            }
        }
    }

    fn on_enemy(&mut self, ctx: &mut EngineContext, player: EntityId, enemy: EntityId) {
        let player_box = ctx.scene.get(player).and_then(|e| e.aabb());
        let enemy_box = ctx.scene.get(enemy).and_then(|e| e.aabb());
        let (Some(player_box), Some(enemy_box)) = (player_box, enemy_box) else {
            return;
        };

        match judge_stomp(&player_box, &enemy_box) {
            Contact::Stomp => {
                let Some(health) = ctx.scene.get(enemy).and_then(|e| e.health.as_ref()) else {
                    log::warn!("Enemy {:?} has no health, stomp ignored", enemy);
                    return;
                };
                if !health.is_alive() {
                    return;
                }
                ctx.damage(enemy, 1);
                let dead = ctx
                    .scene
                    .get(enemy)
                    .and_then(|e| e.health.as_ref())
                    .is_some_and(|h| !h.is_alive());
                if dead {
                    ctx.despawn(enemy);
                }
                if let Some((controller, mut parts)) =
                    ctx.scene.get_mut(player).and_then(|e| e.player_parts())
                {
                    controller.bounce(&mut parts);
                }
                self.session.add_score(STOMP_SCORE, &mut ctx.bus);
            }
            Contact::Hurt => {
                ctx.damage(player, CONTACT_DAMAGE);
            }
        }
    }

    fn on_item(&mut self, ctx: &mut EngineContext, player: EntityId, item: EntityId, name: &str) {
        match name {
            "fruit" => {
                ctx.heal(player, FRUIT_HEAL);
            }
            "gem" => self.session.add_score(GEM_SCORE, &mut ctx.bus),
            other => log::debug!("Picked up unknown item '{}'", other),
        }
        ctx.despawn(item);
    }

    fn check_fell_out(&mut self, ctx: &EngineContext, player: EntityId) {
        let (Some(bounds), Some(entity)) = (ctx.physics.world_bounds(), ctx.scene.get(player)) else {
            return;
        };
        if entity.pos.y > bounds.bottom() + FALL_MARGIN {
            self.finish(Outcome::Lost);
        }
    }
}

impl Game for SunnyRules {
    fn config(&self) -> GameConfig {
        self.config.clone()
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let Some(level) = self.level.take() else {
            log::warn!("Level already started");
            return;
        };
        for layer in level.layers {
            let id = ctx.spawn_layer(layer, true);
            if ctx.physics.world_bounds().is_none() {
                let bounds = ctx.scene.layer(id).map(|l| l.bounds());
                ctx.physics.set_world_bounds(bounds);
            }
        }
        for layer in level.background {
            ctx.spawn_layer(layer, false);
        }
        for mut entity in level.entities {
            if let (Some(player), Some(health)) = (entity.player.as_ref(), entity.health.as_mut()) {
                health.invincibility_duration = player.tuning.invincibility_time;
            }
            ctx.spawn(entity);
        }
        self.player = ctx.scene.find_by_name(PLAYER_NAME).or_else(|| ctx.player());
        if self.player.is_none() {
            log::warn!("Level has no player");
        }
        self.outcome = Outcome::Playing;
    }

    fn update(&mut self, ctx: &mut EngineContext, _dt: f32) {
        if self.outcome.is_over() {
            return;
        }
        let Some(player) = self.player.filter(|&id| ctx.scene.contains(id)) else {
            return;
        };
        self.on_hazard_tiles(ctx, player);
        self.on_contacts(ctx, player);
        self.check_fell_out(ctx, player);
    }
}
