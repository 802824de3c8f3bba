//! Reactive dataflow primitives
//!
//! The Actor+Relay building blocks the scrollbar logic is written in.
//! They are independent of viewports and slices.
//!
//! # Core Components
//!
//! - **[`Relay`]** - Type-safe event streaming over unbounded channels
//! - **[`Actor`]** - Single-value reactive state container
//! - **[`Task`]** - Droppable task on the local cooperative event loop
//!
//! # Architecture Principles
//!
//! 1. **Event-Source Naming** - Relays follow `{source}_{event}_relay` pattern
//! 2. **Single Point of Mutation** - State changes only inside its owner
//! 3. **Single Thread** - Everything runs on one `tokio::task::LocalSet`

pub mod actor;
pub mod relay;
pub mod task;

pub use actor::Actor;
pub use relay::{Relay, RelayError, relay};
pub use task::{Task, TaskHandle};
