use serde::{Deserialize, Serialize};

/// Name of the synthetic frame at the top of every command tree.
pub const ROOT_FRAME_NAME: &str = "root";

/// One recorded command invocation, possibly nested.
///
/// This is the shape the test framework reads back off its execution context
/// after a run. Field names are kept short because a single test can record
/// thousands of frames:
///
/// - `cn` - command name
/// - `ts` - time start (unix milliseconds)
/// - `cl` - command list (child invocations, in start order)
/// - `d`  - duration (milliseconds)
///
/// The synthetic root frame carries only `cn` and `cl`; it is never timed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFrame {
    #[serde(rename = "cn")]
    pub name: String,
    #[serde(rename = "ts", skip_serializing_if = "Option::is_none")]
    pub start_ms: Option<u64>,
    #[serde(rename = "cl", default)]
    pub children: Vec<CommandFrame>,
    #[serde(rename = "d", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl CommandFrame {
    /// Creates the synthetic root frame.
    pub fn root() -> Self {
        Self {
            name: ROOT_FRAME_NAME.to_string(),
            start_ms: None,
            children: Vec::new(),
            duration_ms: None,
        }
    }

    /// True for the synthetic root frame.
    pub fn is_root(&self) -> bool {
        self.name == ROOT_FRAME_NAME && self.start_ms.is_none()
    }
}
