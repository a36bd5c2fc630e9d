use crate::api::types::{EntityId, LayerId};
use crate::components::entity::Entity;
use crate::components::tilemap::TileLayer;
use crate::core::arena::Arena;

/// Entity and tile-layer storage.
///
/// Despawning only marks an entity; it stays readable until the frame
/// boundary calls [`Scene::flush_removals`].
pub struct Scene {
    entities: Arena<Entity>,
    layers: Arena<TileLayer>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Arena::with_capacity(capacity),
            layers: Arena::new(),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    /// Mark an entity for removal at the end of the frame.
    /// Returns false for stale handles.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.entities.mark_for_removal(id)
    }

    pub fn is_despawning(&self, id: EntityId) -> bool {
        self.entities.is_marked(id)
    }

    /// Drop every marked entity. Returns the handles that were removed.
    pub fn flush_removals(&mut self) -> Vec<EntityId> {
        self.entities
            .flush_removals()
            .into_iter()
            .map(|(id, entity)| {
                log::trace!("Removed entity {:?} '{}'", id, entity.name);
                id
            })
            .collect()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities.iter().find(|(_, e)| e.tag == tag).map(|(id, _)| id)
    }

    /// Find all entities with the given tag.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.tag == tag)
            .map(|(id, _)| id)
            .collect()
    }

    /// Find the first entity with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities.iter().find(|(_, e)| e.name == name).map(|(id, _)| id)
    }

    /// Number of entities, including ones marked for removal.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // -- Tile layers --

    pub fn add_layer(&mut self, layer: TileLayer) -> LayerId {
        self.layers.insert(layer)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Option<TileLayer> {
        self.layers.remove(id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&TileLayer> {
        self.layers.get(id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut TileLayer> {
        self.layers.get_mut(id)
    }

    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &TileLayer)> {
        self.layers.iter()
    }

    /// Clear all entities and layers.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.layers.clear();
    }

    /// Mutable entities alongside read-only layers, for the physics pass.
    pub(crate) fn split_mut(&mut self) -> (&mut Arena<Entity>, &Arena<TileLayer>) {
        (&mut self.entities, &self.layers)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
