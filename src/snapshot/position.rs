//! Execution position tracking
//!
//! A position is the executing block's identifier plus the zero-based index of
//! its active command. "Nothing executing" is represented as `None`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::Interpreter;

/// Where in the script the interpreter is (or should resume)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionPosition {
    pub block_id: String,
    pub command_index: usize,
}

impl ExecutionPosition {
    pub fn new(block_id: impl Into<String>, command_index: usize) -> Self {
        Self {
            block_id: block_id.into(),
            command_index,
        }
    }
}

impl fmt::Display for ExecutionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.block_id, self.command_index)
    }
}

/// Failure to resume at a saved position
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResumeError {
    /// The block does not exist in the loaded script (save/script version mismatch)
    #[error("block '{block_id}' not found in the loaded script")]
    PositionNotFound { block_id: String },
    #[error("command index {command_index} is out of range for block '{block_id}' ({len} commands)")]
    CommandOutOfRange {
        block_id: String,
        command_index: usize,
        len: usize,
    },
}

/// Read the interpreter's current position
pub fn capture_position(interpreter: &dyn Interpreter) -> Option<ExecutionPosition> {
    interpreter.current_position()
}

/// Check that `position` is addressable in the currently loaded script
/// without touching interpreter state.
pub fn check_position(
    interpreter: &dyn Interpreter,
    position: &ExecutionPosition,
) -> Result<(), ResumeError> {
    let len = interpreter
        .command_count(&position.block_id)
        .ok_or_else(|| ResumeError::PositionNotFound {
            block_id: position.block_id.clone(),
        })?;

    if position.command_index >= len {
        return Err(ResumeError::CommandOutOfRange {
            block_id: position.block_id.clone(),
            command_index: position.command_index,
            len,
        });
    }

    Ok(())
}

/// Halt everything the interpreter is running, then resume at `position`.
///
/// On failure the interpreter is left halted.
pub fn resume_at(
    interpreter: &dyn Interpreter,
    position: &ExecutionPosition,
) -> Result<(), ResumeError> {
    interpreter.halt_all();
    check_position(interpreter, position)?;

    if !interpreter.execute_from(&position.block_id, position.command_index) {
        return Err(ResumeError::PositionNotFound {
            block_id: position.block_id.clone(),
        });
    }

    tracing::debug!(position = %position, "Resumed execution");
    Ok(())
}
