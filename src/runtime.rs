//! Runtime for executing the playback state machine
//!
//! The runtime owns the mutable state, applies pure transitions, executes
//! effects against a rendering surface, and runs every timer as a guarded
//! background task.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::PlayerRuntime;
pub use traits::{SharedSurface, Surface};
