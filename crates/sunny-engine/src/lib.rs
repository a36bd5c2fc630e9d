pub mod api;
pub mod core;
pub mod components;
pub mod config;
pub mod player;
pub mod input;
pub mod events;
pub mod assets;
pub mod gameplay;

// Re-export key types at crate root for convenience
pub use api::game::{Game, EngineContext};
pub use api::types::{EntityId, LayerId, CollisionPair, TileTrigger};
pub use config::{GameConfig, PhysicsConfig, PlayerTuning};
pub use components::entity::Entity;
pub use components::collider::{Aabb, Collider};
pub use components::kinematic::{KinematicBody, CollisionFlags};
pub use components::health::Health;
pub use components::animation::{AnimationComponent, AnimationClip};
pub use components::tilemap::{TileLayer, TileInfo, TileType, TileSprite, AtlasId};
pub use core::arena::{Arena, Handle};
pub use core::scene::Scene;
pub use core::physics::PhysicsEngine;
pub use core::time::FixedTimestep;
pub use player::{Facing, PlayerAction, PlayerController, PlayerState};
pub use input::queue::InputQueue;
pub use events::bus::{EventBus, EventKind, GameEvent, SubscriberId};
pub use assets::tileset::{TilesetTypes, TileProperty};
pub use gameplay::{Level, Outcome, Session, SunnyRules};
