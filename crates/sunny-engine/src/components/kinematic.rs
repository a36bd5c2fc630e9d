use glam::Vec2;

/// Collision outcome of the most recent physics update.
///
/// Rebuilt from scratch on every update; nothing carries over between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionFlags {
    /// Standing on a solid, one-way or slope surface.
    pub grounded: bool,
    /// Head hit a solid tile (or the world's top edge).
    pub ceiling: bool,
    pub wall_left: bool,
    pub wall_right: bool,
    /// Box intersects at least one ladder tile.
    pub on_ladder: bool,
    /// Bottom edge sits just above the topmost tile of a ladder.
    pub ladder_top: bool,
}

/// Per-entity kinematic state integrated by the physics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub velocity: Vec2,
    /// Force accumulated since the last update. Cleared once applied.
    pub force: Vec2,
    pub mass: f32,
    pub use_gravity: bool,
    /// Disabled bodies are skipped by the engine entirely.
    pub enabled: bool,
    pub flags: CollisionFlags,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass: 1.0,
            use_gravity: true,
            enabled: true,
            flags: CollisionFlags::default(),
        }
    }
}

impl KinematicBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Accumulate a force for the next integration step.
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn is_grounded(&self) -> bool {
        self.flags.grounded
    }

    /// One explicit-Euler velocity step. Gravity only applies when enabled;
    /// the accumulated force always applies and is then cleared.
    pub fn integrate(&mut self, gravity: Vec2, max_speed: f32, dt: f32) {
        if self.use_gravity {
            self.velocity += gravity * dt;
        }
        let mass = if self.mass > 0.0 { self.mass } else { 1.0 };
        self.velocity += self.force / mass * dt;
        self.force = Vec2::ZERO;
        self.velocity = self
            .velocity
            .max(Vec2::splat(-max_speed))
            .min(Vec2::splat(max_speed));
    }
}
