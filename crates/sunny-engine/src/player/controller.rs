use crate::config::PlayerTuning;
use crate::player::action::{Facing, PlayerAction};
use crate::player::state::{PlayerBody, PlayerState, StateContext};

/// Owns the active [`PlayerState`] and performs transitions.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub tuning: PlayerTuning,
    state: PlayerState,
    facing: Facing,
    /// Remaining coyote time. Refilled while grounded.
    coyote_timer: f32,
}

impl PlayerController {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            state: PlayerState::Idle,
            facing: Facing::Right,
            coyote_timer: 0.0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    /// Grounded, or left the ground less than `coyote_time` ago.
    pub fn is_on_ground(&self, parts: &PlayerBody<'_>) -> bool {
        parts.body.flags.grounded || self.coyote_timer > 0.0
    }

    /// Enter `Idle` from scratch, e.g. after spawning.
    pub fn reset(&mut self, parts: &mut PlayerBody<'_>) {
        self.state = PlayerState::Idle;
        self.coyote_timer = 0.0;
        let mut ctx = self.context(parts);
        let mut state = self.state;
        state.enter(&mut ctx);
        self.state = state;
    }

    /// Feed one input action to the active state. When the action causes a
    /// transition, the new state gets the same action once more so that the
    /// input is not lost on the switching frame.
    pub fn handle_action(&mut self, action: PlayerAction, parts: &mut PlayerBody<'_>) {
        if self.state.is_dead() {
            return;
        }
        match action {
            PlayerAction::MoveLeft => self.facing = Facing::Left,
            PlayerAction::MoveRight => self.facing = Facing::Right,
            _ => {}
        }

        if let Some(next) = self.dispatch(action, parts) {
            self.transition(next, parts);
            if let Some(again) = self.dispatch(action, parts) {
                self.transition(again, parts);
            }
        }
    }

    /// Per-frame update, run after physics has refreshed the collision flags.
    pub fn update(&mut self, parts: &mut PlayerBody<'_>, dt: f32) {
        if self.state.is_dead() {
            return;
        }
        if parts.body.flags.grounded {
            self.coyote_timer = self.tuning.coyote_time;
        } else {
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        }

        let mut ctx = self.context(parts);
        let mut state = self.state;
        let next = state.update(&mut ctx);
        self.state = state;
        if let Some(next) = next {
            self.transition(next, parts);
        }
    }

    /// Switch to `Dead`. Returns false if the player was already dead.
    pub fn kill(&mut self, parts: &mut PlayerBody<'_>) -> bool {
        if self.state.is_dead() {
            return false;
        }
        self.transition(PlayerState::Dead, parts);
        true
    }

    /// Upward bounce after stomping an enemy.
    pub fn bounce(&self, parts: &mut PlayerBody<'_>) {
        parts.body.velocity.y = -self.tuning.stomp_bounce;
    }

    fn context<'a, 'b>(&'a self, parts: &'a mut PlayerBody<'b>) -> StateContext<'a, 'b> {
        let on_ground = self.is_on_ground(parts);
        StateContext {
            parts,
            tuning: &self.tuning,
            on_ground,
        }
    }

    fn dispatch(&mut self, action: PlayerAction, parts: &mut PlayerBody<'_>) -> Option<PlayerState> {
        let mut state = self.state;
        let mut ctx = self.context(parts);
        let next = match action {
            PlayerAction::MoveLeft => state.move_left(&mut ctx),
            PlayerAction::MoveRight => state.move_right(&mut ctx),
            PlayerAction::Jump => state.jump(&mut ctx),
            PlayerAction::ClimbUp => state.climb_up(&mut ctx),
            PlayerAction::ClimbDown => state.climb_down(&mut ctx),
        };
        self.state = state;
        next
    }

    fn transition(&mut self, next: PlayerState, parts: &mut PlayerBody<'_>) {
        let mut old = self.state;
        let mut new = next;
        {
            let mut ctx = self.context(parts);
            old.exit(&mut ctx);
            new.enter(&mut ctx);
        }
        if matches!(new, PlayerState::Jump) {
            self.coyote_timer = 0.0;
        }
        log::debug!("Player state {} -> {}", old.name(), new.name());
        self.state = new;
    }
}
