//! Browser-automation command client.
//!
//! The client is a statically-populated registry of named async command
//! handlers plus the live execution-context slot the test framework mutates
//! between tests. It stands in for the remote-protocol client the framework
//! composes at startup; which commands exist, and what they do, is decided by
//! whoever populates the registry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::context::ExecutionContext;
use crate::error::{CommandError, Result};

/// Result of one command invocation.
pub type CommandResult = Result<Value>;

/// Boxed async command handler.
///
/// Handlers take the client handle, so a command can invoke further commands
/// while it is still running, plus the caller's positional arguments.
pub type CommandHandler =
    Arc<dyn Fn(Client, Vec<Value>) -> BoxFuture<'static, CommandResult> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct RegisteredCommand {
    pub(crate) run: CommandHandler,
    /// Set only by the instrumentation layer; guards against double-wrapping.
    pub(crate) instrumented: bool,
}

#[derive(Default)]
struct ClientInner {
    commands: RwLock<HashMap<String, RegisteredCommand>>,
    context: RwLock<Option<Arc<ExecutionContext>>>,
}

/// Cheaply-cloneable handle to one automation session's command registry.
#[derive(Clone, Default)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxes an async closure into a [`CommandHandler`].
    pub fn handler<F, Fut>(f: F) -> CommandHandler
    where
        F: Fn(Client, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        Arc::new(move |client, args| f(client, args).boxed())
    }

    /// Registers `handler` under `name`.
    ///
    /// Re-registering an existing name requires `overwrite`; without it the
    /// call fails and the registry is left untouched. A replaced entry is
    /// considered fresh: any instrumentation on the old handler is gone.
    pub fn add_command(
        &self,
        name: impl Into<String>,
        handler: CommandHandler,
        overwrite: bool,
    ) -> Result<()> {
        let name = name.into();
        let mut commands = self
            .inner
            .commands
            .write()
            .expect("command registry lock poisoned");

        if !overwrite && commands.contains_key(&name) {
            return Err(CommandError::DuplicateCommand(name));
        }

        commands.insert(
            name,
            RegisteredCommand {
                run: handler,
                instrumented: false,
            },
        );
        Ok(())
    }

    /// Names of every registered command, sorted for stable iteration.
    pub fn command_names(&self) -> Vec<String> {
        let commands = self
            .inner
            .commands
            .read()
            .expect("command registry lock poisoned");
        let mut names: Vec<String> = commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Dispatches `name` with positional `args`.
    pub async fn run(&self, name: &str, args: Vec<Value>) -> CommandResult {
        let handler = {
            let commands = self
                .inner
                .commands
                .read()
                .expect("command registry lock poisoned");
            commands
                .get(name)
                .ok_or_else(|| CommandError::unknown_command(name))?
                .run
                .clone()
        };

        (*handler)(self.clone(), args).await
    }

    /// Swaps the current execution context; the framework calls this at each
    /// test boundary. Instrumented commands re-read the slot on every call.
    pub fn set_execution_context(&self, context: Option<Arc<ExecutionContext>>) {
        let mut slot = self
            .inner
            .context
            .write()
            .expect("execution context lock poisoned");
        *slot = context;
    }

    /// The execution context currently installed, if any.
    pub fn execution_context(&self) -> Option<Arc<ExecutionContext>> {
        self.inner
            .context
            .read()
            .expect("execution context lock poisoned")
            .clone()
    }

    /// Snapshot of the registry for the instrumentation pass.
    pub(crate) fn registered_commands(&self) -> Vec<(String, RegisteredCommand)> {
        let commands = self
            .inner
            .commands
            .read()
            .expect("command registry lock poisoned");
        let mut entries: Vec<(String, RegisteredCommand)> = commands
            .iter()
            .map(|(name, command)| (name.clone(), command.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Override path used by instrumentation: replaces `name` and marks the
    /// entry wrapped so later passes skip it.
    pub(crate) fn install_instrumented(&self, name: &str, handler: CommandHandler) {
        let mut commands = self
            .inner
            .commands
            .write()
            .expect("command registry lock poisoned");
        commands.insert(
            name.to_string(),
            RegisteredCommand {
                run: handler,
                instrumented: true,
            },
        );
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("commands", &self.command_names())
            .finish()
    }
}
