// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`dispatcher`] picks the execution mode per request.
//! - [`streamed`] runs a command with output captured into the command log.
//! - [`interactive`] hands the terminal to a command that needs a prompt.
//! - [`heartbeat`] keeps the UI repainting while a streamed command runs.
//! - [`completion`] holds the success-continuation / refresh contract both
//!   paths share.
//! - [`command`] builds shell invocations.

pub mod command;
pub mod completion;
pub mod dispatcher;
pub mod heartbeat;
pub mod interactive;
pub mod streamed;

pub use completion::{surfaces_refresh_error, CompletionPath};
pub use dispatcher::CommandDispatcher;
pub use heartbeat::Heartbeat;
pub use interactive::InteractiveRunner;
pub use streamed::StreamedExecutor;
