/// Turns variable frame times into a whole number of fixed physics steps.
///
/// Leftover time carries over to the next frame. Long stalls (debugger,
/// backgrounded tab) are capped at `max_steps` so the simulation never has
/// to catch up on seconds of backlog at once.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt: dt.max(f32::EPSILON),
            max_steps: 8,
            accumulator: 0.0,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add elapsed wall time and return how many fixed steps are due.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);
        let due = (self.accumulator / self.dt) as u32;
        if due >= self.max_steps {
            self.accumulator = 0.0;
            return self.max_steps;
        }
        self.accumulator -= due as f32 * self.dt;
        due
    }

    /// Fraction of a step left over, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
