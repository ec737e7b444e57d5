//! Command Execution Tree Recorder
//!
//! A library for instrumenting a browser-automation command client so that
//! every command invocation is recorded into a hierarchical call tree with
//! start time and duration, for later reporting and debugging of test runs.
//! The tree is built in memory only; executing commands stays the job of the
//! client's own handlers, and rendering or persisting the result stays the
//! job of the test framework that reads it back.
//!
//! # Module Overview
//!
//! - [`client`] - Command registry and dispatch (the instrumented collaborator)
//! - [`instrument`] - The instrumentation pass and wrapped command behavior
//! - [`context`] - Per-test execution context and its tracing payload
//! - [`log`] - Call-tree construction with push/pop stack discipline
//! - [`frame`] - The serialized `{cn, ts, cl, d}` record shape
//! - [`config`] - Exclusion policy for the instrumentation pass
//! - [`error`] - Error surface shared with the command client
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cmdtree::{instrument, Client, ExecutionContext};
//!
//! # async fn example(client: Client) -> cmdtree::Result<()> {
//! // At composition time, after the framework registered its commands:
//! instrument(&client);
//!
//! // Per test, the framework installs a context; tracing follows it.
//! let ctx = Arc::new(ExecutionContext::with_tracing());
//! client.set_execution_context(Some(Arc::clone(&ctx)));
//!
//! client.run("open", vec!["https://example.com".into()]).await?;
//!
//! let tree = ctx.command_log().expect("one command was recorded");
//! println!("{}", serde_json::to_string_pretty(&tree)?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod instrument;
pub mod log;

pub use client::{Client, CommandHandler, CommandResult};
pub use config::{InstrumentOptions, INTERNAL_COMMAND_PREFIX};
pub use context::{ExecutionContext, TraceState};
pub use error::{CommandError, Result};
pub use frame::{CommandFrame, ROOT_FRAME_NAME};
pub use instrument::{instrument, instrument_with};
pub use log::{CommandLog, FrameToken};
