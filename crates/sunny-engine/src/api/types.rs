use crate::components::entity::Entity;
use crate::components::tilemap::{TileLayer, TileType};
use crate::core::arena::Handle;

/// Stable handle to an entity in the scene.
pub type EntityId = Handle<Entity>;

/// Stable handle to a tile layer in the scene.
pub type LayerId = Handle<TileLayer>;

/// Two entities whose colliders overlapped during the last physics update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
}

impl CollisionPair {
    /// The other half of the pair, if `id` is part of it.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// An entity overlapped a non-blocking tile that gameplay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTrigger {
    pub entity: EntityId,
    pub tile_type: TileType,
}
