use glam::Vec2;

/// Axis-aligned box in world space. `pos` is the top-left corner (Y-down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict intersection: boxes that only share an edge do not overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Per-axis penetration depth (positive on both axes when intersecting).
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        (self.size + other.size) * 0.5 - (self.center() - other.center()).abs()
    }
}

/// Box collider attached to an entity. `offset` is measured from the
/// entity position to the box's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub size: Vec2,
    pub offset: Vec2,
    /// Triggers pass through tiles and only report object overlaps.
    pub trigger: bool,
    /// Disabled colliders take no part in tile or object collision.
    pub enabled: bool,
}

impl Collider {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
            trigger: false,
            enabled: true,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    /// World-space box for an entity positioned at `pos`.
    pub fn world_aabb(&self, pos: Vec2) -> Aabb {
        Aabb::new(pos + self.offset, self.size)
    }
}
