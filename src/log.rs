//! Call-tree construction for instrumented command runs.
//!
//! A `CommandLog` owns every frame recorded during one execution context and
//! a stack of the currently-open invocations, innermost last. Pushing happens
//! before the command runs, popping after its result settles, so nested
//! commands always close before their parent and the resulting tree mirrors
//! the real nesting order.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::frame::{CommandFrame, ROOT_FRAME_NAME};

/// Handle to an open frame, returned by [`CommandLog::begin`] and consumed by
/// [`CommandLog::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(usize);

#[derive(Debug)]
struct FrameNode {
    name: String,
    start_ms: Option<u64>,
    started: Option<Instant>,
    duration_ms: Option<u64>,
    children: Vec<usize>,
}

/// Arena-backed command tree plus the stack of open invocations.
///
/// Node 0 is the synthetic root frame; the stack always contains it while the
/// log is live. A frame stays in its parent's child list forever once opened;
/// closing only records its duration and removes it from the open stack.
#[derive(Debug)]
pub struct CommandLog {
    nodes: Vec<FrameNode>,
    stack: Vec<usize>,
}

impl CommandLog {
    /// Creates a log containing only the root frame.
    pub fn new() -> Self {
        Self {
            nodes: vec![FrameNode {
                name: ROOT_FRAME_NAME.to_string(),
                start_ms: None,
                started: None,
                duration_ms: None,
                children: Vec::new(),
            }],
            stack: vec![0],
        }
    }

    /// Opens a frame for `name`: appends it to the children of the innermost
    /// open frame and makes it the new stack top.
    pub fn begin(&mut self, name: &str) -> FrameToken {
        let index = self.nodes.len();
        self.nodes.push(FrameNode {
            name: name.to_string(),
            start_ms: Some(unix_ms()),
            started: Some(Instant::now()),
            duration_ms: None,
            children: Vec::new(),
        });

        let top = *self.stack.last().expect("stack always holds the root");
        self.nodes[top].children.push(index);
        self.stack.push(index);

        FrameToken(index)
    }

    /// Closes the innermost open frame, recording its duration.
    ///
    /// `token` must be the handle `begin` returned for the current stack top;
    /// anything else means the push/pop discipline was broken, which would
    /// silently corrupt the tree, so it panics instead.
    pub fn end(&mut self, token: FrameToken) {
        let top = *self.stack.last().expect("stack always holds the root");
        assert!(top != 0, "end() called with no open command frame");
        assert!(
            top == token.0,
            "end() token does not match the innermost open frame"
        );

        let node = &mut self.nodes[top];
        let started = node.started.expect("non-root frames record a start");
        node.duration_ms = Some(started.elapsed().as_millis() as u64);
        self.stack.pop();
    }

    /// Number of currently-open frames, the root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Materializes the tree as nested [`CommandFrame`] records, root first.
    pub fn frame_tree(&self) -> CommandFrame {
        self.build_frame(0)
    }

    fn build_frame(&self, index: usize) -> CommandFrame {
        let node = &self.nodes[index];
        CommandFrame {
            name: node.name.clone(),
            start_ms: node.start_ms,
            children: node
                .children
                .iter()
                .map(|&child| self.build_frame(child))
                .collect(),
            duration_ms: node.duration_ms,
        }
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
