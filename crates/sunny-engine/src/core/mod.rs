pub mod arena;
pub mod physics;
pub mod scene;
pub mod tile_collision;
pub mod time;
