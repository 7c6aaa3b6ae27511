//! Core data models for the ranking engine.

mod detail;
mod ids;
mod placement;
mod ranking;
mod settings;
mod tournament;

pub use detail::*;
pub use ids::*;
pub use placement::*;
pub use ranking::*;
pub use settings::*;
pub use tournament::*;
