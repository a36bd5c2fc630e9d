//! Player movement states.
//!
//! Every hook returns the state to switch to, or `None` to stay. The
//! controller owns the switch itself so that `exit` always runs before the
//! next state's `enter`.

use glam::Vec2;

use crate::components::animation::AnimationComponent;
use crate::components::collider::Collider;
use crate::components::kinematic::KinematicBody;
use crate::config::PlayerTuning;

/// Components of the player entity that the states read and write.
/// States never integrate motion themselves; they only set velocity,
/// force and gravity for the physics engine.
pub struct PlayerBody<'a> {
    pub pos: &'a mut Vec2,
    pub body: &'a mut KinematicBody,
    pub collider: Option<&'a mut Collider>,
    pub animation: Option<&'a mut AnimationComponent>,
}

impl PlayerBody<'_> {
    fn play(&mut self, clip: &str) {
        if let Some(animation) = self.animation.as_deref_mut() {
            animation.play(clip);
        }
    }

    /// Horizontal push used by walking and air control. Input against the
    /// current direction of travel cancels it first.
    fn push(&mut self, direction: f32, tuning: &PlayerTuning) {
        if self.body.velocity.x * direction < 0.0 {
            self.body.velocity.x = 0.0;
        }
        self.body.add_force(Vec2::new(direction * tuning.move_force, 0.0));
    }

    fn clamp_horizontal(&mut self, max_speed: f32) {
        self.body.velocity.x = self.body.velocity.x.clamp(-max_speed, max_speed);
    }
}

/// Everything a state hook needs for one call.
pub struct StateContext<'a, 'b> {
    pub parts: &'a mut PlayerBody<'b>,
    pub tuning: &'a PlayerTuning,
    /// Grounded, or still within the coyote window.
    pub on_ground: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    /// `moving` is set by movement input and cleared at the end of each update.
    Walk { moving: bool },
    Jump,
    Fall,
    Climb { moving: bool },
    Dead,
}

impl PlayerState {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Walk { .. } => "walk",
            PlayerState::Jump => "jump",
            PlayerState::Fall => "fall",
            PlayerState::Climb { .. } => "climb",
            PlayerState::Dead => "dead",
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, PlayerState::Dead)
    }

    pub fn is_climbing(&self) -> bool {
        matches!(self, PlayerState::Climb { .. })
    }

    pub fn enter(&mut self, ctx: &mut StateContext<'_, '_>) {
        let parts = &mut *ctx.parts;
        match self {
            PlayerState::Jump => {
                parts.body.velocity.y = -ctx.tuning.jump_velocity;
                log::debug!("Jump with vertical velocity {}", parts.body.velocity.y);
            }
            PlayerState::Climb { .. } => {
                parts.body.use_gravity = false;
                parts.body.velocity = Vec2::ZERO;
            }
            PlayerState::Dead => {
                parts.body.use_gravity = true;
                parts.body.velocity = Vec2::new(0.0, -ctx.tuning.death_bounce);
                if let Some(collider) = parts.collider.as_deref_mut() {
                    collider.enabled = false;
                }
            }
            PlayerState::Idle | PlayerState::Walk { .. } | PlayerState::Fall => {}
        }
        parts.play(self.name());
    }

    pub fn exit(&mut self, ctx: &mut StateContext<'_, '_>) {
        if let PlayerState::Climb { .. } = self {
            ctx.parts.body.use_gravity = true;
        }
    }

    pub fn update(&mut self, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        let tuning = ctx.tuning;
        let on_ground = ctx.on_ground;
        let parts = &mut *ctx.parts;
        match self {
            PlayerState::Idle => {
                parts.body.velocity.x *= tuning.friction_factor;
                (!on_ground).then_some(PlayerState::Fall)
            }
            PlayerState::Walk { moving } => {
                parts.clamp_horizontal(tuning.max_speed);
                if !*moving {
                    return Some(PlayerState::Idle);
                }
                if !on_ground {
                    return Some(PlayerState::Fall);
                }
                *moving = false;
                None
            }
            PlayerState::Jump => {
                parts.clamp_horizontal(tuning.max_speed);
                (parts.body.velocity.y >= 0.0).then_some(PlayerState::Fall)
            }
            PlayerState::Fall => {
                parts.clamp_horizontal(tuning.max_speed);
                parts.body.flags.grounded.then_some(PlayerState::Idle)
            }
            PlayerState::Climb { moving } => {
                if let Some(animation) = parts.animation.as_deref_mut() {
                    if *moving {
                        animation.resume();
                    } else {
                        animation.pause();
                    }
                }
                if parts.body.flags.grounded {
                    return Some(PlayerState::Idle);
                }
                if !parts.body.flags.on_ladder {
                    return Some(PlayerState::Fall);
                }
                *moving = false;
                parts.body.velocity = Vec2::ZERO;
                None
            }
            PlayerState::Dead => None,
        }
    }

    pub fn move_left(&mut self, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        self.move_horizontal(-1.0, ctx)
    }

    pub fn move_right(&mut self, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        self.move_horizontal(1.0, ctx)
    }

    fn move_horizontal(&mut self, direction: f32, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        match self {
            PlayerState::Idle => Some(PlayerState::Walk { moving: true }),
            PlayerState::Walk { moving } => {
                ctx.parts.push(direction, ctx.tuning);
                *moving = true;
                None
            }
            PlayerState::Jump | PlayerState::Fall => {
                ctx.parts.push(direction, ctx.tuning);
                None
            }
            PlayerState::Climb { moving } => {
                ctx.parts.body.velocity.x = direction * ctx.tuning.climb_speed;
                *moving = true;
                None
            }
            PlayerState::Dead => None,
        }
    }

    pub fn jump(&mut self, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        match self {
            PlayerState::Idle | PlayerState::Walk { .. } | PlayerState::Climb { .. } => {
                Some(PlayerState::Jump)
            }
            PlayerState::Fall => ctx.on_ground.then_some(PlayerState::Jump),
            PlayerState::Jump | PlayerState::Dead => None,
        }
    }

    pub fn climb_up(&mut self, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        match self {
            PlayerState::Idle | PlayerState::Walk { .. } | PlayerState::Jump | PlayerState::Fall => ctx
                .parts
                .body
                .flags
                .on_ladder
                .then_some(PlayerState::Climb { moving: false }),
            PlayerState::Climb { moving } => {
                ctx.parts.body.velocity.y = -ctx.tuning.climb_speed;
                *moving = true;
                None
            }
            PlayerState::Dead => None,
        }
    }

    pub fn climb_down(&mut self, ctx: &mut StateContext<'_, '_>) -> Option<PlayerState> {
        match self {
            PlayerState::Idle | PlayerState::Walk { .. } => {
                if !ctx.parts.body.flags.ladder_top {
                    return None;
                }
                // Sink into the ladder so the next update still overlaps it.
                ctx.parts.pos.y += ctx.tuning.ladder_nudge;
                Some(PlayerState::Climb { moving: false })
            }
            PlayerState::Jump | PlayerState::Fall => ctx
                .parts
                .body
                .flags
                .on_ladder
                .then_some(PlayerState::Climb { moving: false }),
            PlayerState::Climb { moving } => {
                ctx.parts.body.velocity.y = ctx.tuning.climb_speed;
                *moving = true;
                None
            }
            PlayerState::Dead => None,
        }
    }
}
