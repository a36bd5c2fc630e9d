/// Hit points with a post-damage invincibility window.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    max: i32,
    current: i32,
    /// Length of the invincibility window started by each hit.
    pub invincibility_duration: f32,
    invincibility_timer: f32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self {
            max,
            current: max,
            invincibility_duration: 2.0,
            invincibility_timer: 0.0,
        }
    }

    pub fn with_invincibility(mut self, seconds: f32) -> Self {
        self.invincibility_duration = seconds.max(0.0);
        self
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }

    /// Apply damage. Returns `false` when nothing happened (invincible,
    /// already dead, or a non-positive amount).
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || !self.is_alive() || self.is_invincible() {
            return false;
        }
        self.current = (self.current - amount).max(0);
        if self.is_alive() {
            self.invincibility_timer = self.invincibility_duration;
        }
        true
    }

    /// Restore health, capped at the maximum. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    pub fn set_current(&mut self, value: i32) {
        self.current = value.clamp(0, self.max);
    }

    /// Change the maximum. Non-positive values are rejected.
    pub fn set_max(&mut self, max: i32) -> bool {
        if max <= 0 {
            log::warn!("Rejected non-positive max health: {}", max);
            return false;
        }
        self.max = max;
        self.current = self.current.min(max);
        true
    }

    /// Count down the invincibility window.
    pub fn tick(&mut self, dt: f32) {
        if self.invincibility_timer > 0.0 {
            self.invincibility_timer = (self.invincibility_timer - dt).max(0.0);
        }
    }
}
