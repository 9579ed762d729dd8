//! # cadence-core
//!
//! Foundation crate for the Cadence timing primitives.
//! Defines config, errors, events, tracing setup, and generation fencing.
//! `cadence-interval` and `cadence-deferred` depend on this.

pub mod config;
pub mod errors;
pub mod events;
pub mod fence;
pub mod ids;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::CadenceConfig;
pub use errors::{CadenceError, CadenceResult};
pub use events::{CadenceEventHandler, EventDispatcher};
pub use fence::{Fence, Generation};
pub use ids::SessionId;
