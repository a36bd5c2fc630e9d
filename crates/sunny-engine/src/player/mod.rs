pub mod action;
pub mod controller;
pub mod state;

pub use action::{Facing, PlayerAction};
pub use controller::PlayerController;
pub use state::{PlayerBody, PlayerState};
