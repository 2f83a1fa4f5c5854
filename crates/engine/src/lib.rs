//! Host-side helpers around a [`GameState`](dualfall_core::GameState)
//!
//! - [`runner`]: fixed 16 ms timestep over wall-clock deltas
//! - [`place`]: one-call rotate, slide and drop of the active piece
//! - [`autoplay`]: seeded random player for headless runs

pub mod autoplay;
pub mod place;
pub mod runner;

pub use autoplay::{Autoplayer, Target};
pub use place::{apply_place, PlaceError};
pub use runner::{Runner, MAX_CATCH_UP_STEPS};
