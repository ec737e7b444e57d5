use thiserror::Error;

/// Error surface of the command client.
///
/// Instrumentation is transparent to errors: a wrapped command fails with
/// exactly the error the original handler produced, and the wrapper itself
/// only adds the registry-level variants below.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command '{0}' is already registered; pass overwrite to replace it")]
    DuplicateCommand(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CommandError {
    pub fn client(message: impl Into<String>) -> Self {
        CommandError::Client(message.into())
    }

    pub fn unknown_command(name: impl Into<String>) -> Self {
        CommandError::UnknownCommand(name.into())
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;
