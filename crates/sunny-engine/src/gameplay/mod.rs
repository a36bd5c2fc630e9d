// gameplay/mod.rs
//
// Platformer rules built on top of the engine: stomping, pickups, hazards,
// level exits and the score session. Games can use SunnyRules as-is or
// write their own Game impl against the same physics results.

pub mod rules;
pub mod session;
pub mod stomp;

pub use rules::{Level, Outcome, SunnyRules};
pub use session::Session;
pub use stomp::{judge_stomp, Contact};
