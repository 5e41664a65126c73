use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::snapshot::{ResumeError, VariableRestoreReport};

/// Where the loader is in its resume sequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoaderState {
    #[default]
    Idle,
    /// The target scene was requested and the loader is waiting for it
    SceneTransitionPending { scene_id: String },
    RestoringState,
    Resumed,
    /// Restoring stopped part-way; the interpreter was left halted
    Failed,
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderState::Idle => f.write_str("idle"),
            LoaderState::SceneTransitionPending { scene_id } => {
                write!(f, "waiting for scene '{scene_id}'")
            }
            LoaderState::RestoringState => f.write_str("restoring"),
            LoaderState::Resumed => f.write_str("resumed"),
            LoaderState::Failed => f.write_str("failed"),
        }
    }
}

/// Why a load did not resume
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Save record cannot be loaded: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Resume(#[from] ResumeError),

    #[error("Timed out after {waited_ms} ms waiting for scene '{scene_id}'")]
    SceneTimeout { scene_id: String, waited_ms: u64 },

    #[error("Scene loader went away before '{scene_id}' was ready")]
    SceneLoaderClosed { scene_id: String },

    #[error("No saves to load")]
    NoSaves,

    #[error("Slot {0} is empty")]
    EmptySlot(u32),
}

/// A subloader that ran but reported an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubloaderFailure {
    pub name: String,
    pub message: String,
}

/// What a successful load did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether a scene transition was needed
    pub scene_changed: bool,
    pub variables: VariableRestoreReport,
    /// Subloaders that ran, in the order they ran
    pub subloaders_run: Vec<String>,
    /// Subloaders skipped because their owner dropped them
    pub subloaders_missing: Vec<String>,
    pub subloader_failures: Vec<SubloaderFailure>,
    pub resumed: bool,
    pub presentation_restored: bool,
}

/// Notifications broadcast while a load runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Started { record_id: Uuid, scene_id: String },
    StateChanged(LoaderState),
    Completed(LoadReport),
    Failed(LoadError),
}
