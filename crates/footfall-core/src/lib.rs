//! Footfall Core - the dashboard's engine.
//!
//! Owned application state for the grotto visitor dashboard: cave
//! tallies, the occupancy time series, the 5-second flow tick, and JSON
//! persistence of the two counter maps. There is no global state; every
//! handler mutates the [`engine::Engine`] it is given, and dropping the
//! engine cancels the scheduled tick with it.
//!
//! # Example
//!
//! ```rust,no_run
//! use footfall_core::prelude::*;
//! use footfall_logic::clock::Moment;
//!
//! let mut engine = Engine::new(Box::new(MemoryStore::new()), Moment::new(14, 0));
//!
//! // Run the dashboard loop
//! loop {
//!     engine.advance(1.0 / 60.0, Moment::new(14, 0)); // 60 FPS
//! }
//! ```

pub mod engine;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{CaveSnapshot, Engine};
    pub use crate::persistence::{FileStore, MemoryStore, StateStore};
}
