use crate::events::bus::{EventBus, GameEvent};

/// Score state that outlives a single level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    score: i32,
    high_score: i32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously reached high score.
    pub fn with_high_score(high_score: i32) -> Self {
        Self {
            score: 0,
            high_score: high_score.max(0),
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn high_score(&self) -> i32 {
        self.high_score
    }

    /// Add points and publish the new totals.
    pub fn add_score(&mut self, amount: i32, bus: &mut EventBus) {
        self.set_score(self.score + amount, bus);
    }

    pub fn set_score(&mut self, score: i32, bus: &mut EventBus) {
        self.score = score.max(0);
        self.high_score = self.high_score.max(self.score);
        bus.publish(GameEvent::ScoreChanged {
            score: self.score,
            high_score: self.high_score,
        });
    }

    /// New run: score back to zero, high score kept.
    pub fn reset(&mut self, bus: &mut EventBus) {
        self.set_score(0, bus);
    }
}
