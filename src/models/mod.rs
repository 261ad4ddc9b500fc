//! Core data models for the hub stats dashboard.

mod faceit;
mod ids;
mod player;
mod rank;
mod snapshot;

pub use faceit::*;
pub use ids::*;
pub use player::*;
pub use rank::*;
pub use snapshot::*;
