pub mod animation;
pub mod collider;
pub mod entity;
pub mod health;
pub mod kinematic;
pub mod tilemap;
