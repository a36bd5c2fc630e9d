use glam::Vec2;
use crate::components::animation::AnimationComponent;
use crate::components::collider::{Aabb, Collider};
use crate::components::health::Health;
use crate::components::kinematic::KinematicBody;
use crate::player::controller::PlayerController;
use crate::player::state::PlayerBody;

/// Fat Entity: a single struct with optional components.
/// Its identity is the arena handle it was spawned under.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique-ish name used by gameplay rules ("player", "fruit", "win").
    pub name: String,
    /// Category used by gameplay rules ("enemy", "item", "hazard").
    pub tag: String,
    /// Inactive entities are skipped by physics and per-frame updates.
    pub active: bool,
    /// Position in world space (Y-down).
    pub pos: Vec2,
    pub body: Option<KinematicBody>,
    pub collider: Option<Collider>,
    pub health: Option<Health>,
    pub player: Option<PlayerController>,
    pub animation: Option<AnimationComponent>,
}

impl Entity {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            body: None,
            collider: None,
            health: None,
            player: None,
            animation: None,
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_body(mut self, body: KinematicBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_player(mut self, player: PlayerController) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_animation(mut self, animation: AnimationComponent) -> Self {
        self.animation = Some(animation);
        self
    }

    /// World box of the collider, if there is one.
    pub fn aabb(&self) -> Option<Aabb> {
        self.collider.as_ref().map(|c| c.world_aabb(self.pos))
    }

    /// Borrow the player controller together with the components it drives.
    /// `None` unless the entity has both a controller and a kinematic body.
    pub fn player_parts(&mut self) -> Option<(&mut PlayerController, PlayerBody<'_>)> {
        let Entity {
            pos,
            body,
            collider,
            player,
            animation,
            ..
        } = self;
        let player = player.as_mut()?;
        let body = body.as_mut()?;
        Some((
            player,
            PlayerBody {
                pos,
                body,
                collider: collider.as_mut(),
                animation: animation.as_mut(),
            },
        ))
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerTuning;

    #[test]
    fn builder_sets_components() {
        let e = Entity::new()
            .with_name("player")
            .with_pos(Vec2::new(10.0, 20.0))
            .with_collider(Collider::new(Vec2::new(12.0, 16.0)).with_offset(Vec2::new(2.0, 0.0)));
        assert_eq!(e.name, "player");
        let aabb = e.aabb().unwrap();
        assert_eq!(aabb.pos, Vec2::new(12.0, 20.0));
        assert!(e.body.is_none());
    }

    #[test]
    fn player_parts_requires_body() {
        let mut e = Entity::new().with_player(PlayerController::new(PlayerTuning::default()));
        assert!(e.player_parts().is_none());

        let mut e = e.with_body(KinematicBody::new());
        let (_, parts) = e.player_parts().unwrap();
        assert!(parts.collider.is_none());
    }
}
