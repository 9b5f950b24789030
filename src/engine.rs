//! Media engine contract and the `rodio` backend.
//!
//! The session talks to the engine only through the `Engine` and
//! `EngineFactory` traits. Engines report progress asynchronously by sending
//! `EngineEvent`s into a channel that the UI loop drains.

mod backend;
mod sink;
mod ticker;
mod types;

pub use backend::RodioFactory;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
