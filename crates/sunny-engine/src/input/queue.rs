use crate::player::action::PlayerAction;

/// Player actions collected during a frame.
/// The host pushes actions as input arrives; the engine drains them once
/// per frame, before physics runs.
pub struct InputQueue {
    actions: Vec<PlayerAction>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            actions: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, action: PlayerAction) {
        self.actions.push(action);
    }

    /// Drain all pending actions in arrival order.
    pub fn drain(&mut self) -> Vec<PlayerAction> {
        std::mem::take(&mut self.actions)
    }

    /// Iterate over pending actions without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerAction> {
        self.actions.iter()
    }

    pub fn contains(&self, action: PlayerAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
