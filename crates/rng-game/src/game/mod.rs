//! The guessing game: contract bindings, game state and the session that drives a game.

mod contract;
pub use contract::{GameContract, IRngBinaryGame};

mod input;
pub use input::*;

mod session;
pub use session::*;

mod state;
pub use state::*;

mod strategy;
pub use strategy::*;
