//! Lifecycle events for interval sessions and deferred dispatch.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::CadenceEventHandler;
pub use types::*;
