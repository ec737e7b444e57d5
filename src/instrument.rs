//! Command instrumentation wrapper.
//!
//! Replaces every eligible command in a client's registry with a wrapper that
//! records the invocation into the execution context's command tree. When the
//! current context carries no tracing payload the wrapper is a plain
//! dispatch, so instrumentation costs nothing outside traced runs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cmdtree::{instrument, Client, ExecutionContext};
//!
//! # async fn example(client: Client) -> cmdtree::Result<()> {
//! instrument(&client);
//!
//! let ctx = Arc::new(ExecutionContext::with_tracing());
//! client.set_execution_context(Some(Arc::clone(&ctx)));
//!
//! client.run("open", vec!["https://example.com".into()]).await?;
//! client.run("click", vec!["#submit".into()]).await?;
//!
//! let tree = ctx.command_log().expect("recorded tree");
//! assert_eq!(tree.children.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! A command that invokes further commands while running produces a nested
//! tree:
//!
//! ```text
//! root
//!   open
//!   custom
//!     title
//!     press
//!   click
//! ```

use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use crate::client::{Client, CommandHandler};
use crate::config::InstrumentOptions;

/// Instruments every eligible command with the default options.
pub fn instrument(client: &Client) {
    instrument_with(client, &InstrumentOptions::default());
}

/// Instruments every eligible command of `client` in place.
///
/// Eligible means: registered, not excluded by `options` (internal-prefix
/// names and the explicit exclusion list), and not already wrapped. Running
/// the pass twice is a no-op per command, so duplicate frames and inflated
/// durations cannot occur.
pub fn instrument_with(client: &Client, options: &InstrumentOptions) {
    for (name, command) in client.registered_commands() {
        if command.instrumented || options.is_excluded(&name) {
            continue;
        }
        let wrapped = wrap_command(name.clone(), command.run);
        client.install_instrumented(&name, wrapped);
    }
}

/// Builds the wrapping handler for one command.
///
/// Push happens before the original runs and pop after its result settles,
/// on success and failure alike, so nested invocations always close before
/// their parent and the tree's child order matches real nesting. The original
/// result passes through untouched.
fn wrap_command(name: String, origin: CommandHandler) -> CommandHandler {
    Arc::new(move |client: Client, args: Vec<Value>| {
        let name = name.clone();
        let origin = Arc::clone(&origin);
        async move {
            // Re-read on every call: the framework swaps the context between
            // tests, long after instrumentation ran.
            let context = client.execution_context();
            let trace = match context.as_ref().and_then(|ctx| ctx.trace()) {
                None => return (*origin)(client, args).await,
                Some(trace) => trace,
            };

            let token = trace.with_log(|log| log.begin(&name));
            let result = (*origin)(client.clone(), args).await;
            trace.with_log(|log| log.end(token));
            result
        }
        .boxed()
    })
}
