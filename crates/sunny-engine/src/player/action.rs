/// High-level player intents. Mapping keys or buttons to these is the
/// host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    Jump,
    ClimbUp,
    ClimbDown,
}

/// Horizontal facing, used to flip the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}
