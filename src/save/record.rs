//! The canonical in-memory save record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::{ExecutionPosition, Presentation, VariableSnapshot};

/// Newest record layout this build reads and writes
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Item key the saver always emits, naming the script the save belongs to
pub const FLOWCHART_ITEM_KEY: &str = "flowchart";

/// An opaque slice of state owned by one subloader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveItem {
    pub key: String,
    pub payload: String,
}

impl SaveItem {
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }
}

/// One complete, resumable snapshot.
///
/// A record is a plain value: nothing in it refers back into the live
/// interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(default)]
    pub format_version: u32,
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub slot_number: u32,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Scene that must be active before the position is restored
    #[serde(default)]
    pub scene_id: String,
    #[serde(default)]
    pub script_id: String,
    #[serde(default)]
    pub position: Option<ExecutionPosition>,
    #[serde(default)]
    pub variables: VariableSnapshot,
    #[serde(default)]
    pub presentation: Option<Presentation>,
    #[serde(default)]
    pub progress_marker: Option<String>,
    #[serde(default)]
    pub items: Vec<SaveItem>,
}

impl SaveRecord {
    pub fn new(scene_id: impl Into<String>, script_id: impl Into<String>) -> Self {
        Self {
            format_version: SAVE_FORMAT_VERSION,
            id: Uuid::new_v4(),
            slot_number: 0,
            saved_at: Utc::now(),
            description: String::new(),
            scene_id: scene_id.into(),
            script_id: script_id.into(),
            position: None,
            variables: VariableSnapshot::new(),
            presentation: None,
            progress_marker: None,
            items: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot_number: u32) -> Self {
        self.slot_number = slot_number;
        self
    }

    pub fn with_position(mut self, position: ExecutionPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_variables(mut self, variables: VariableSnapshot) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_item(mut self, item: SaveItem) -> Self {
        self.items.push(item);
        self
    }

    /// Items whose key satisfies `owns`, in record order
    pub fn items_matching<F>(&self, mut owns: F) -> Vec<SaveItem>
    where
        F: FnMut(&SaveItem) -> bool,
    {
        self.items.iter().filter(|item| owns(item)).cloned().collect()
    }

    /// Reason this record cannot be resumed, `None` if it is complete
    pub fn validation_problem(&self) -> Option<String> {
        if self.format_version > SAVE_FORMAT_VERSION {
            return Some(format!(
                "format version {} is newer than supported version {}",
                self.format_version, SAVE_FORMAT_VERSION
            ));
        }
        if self.scene_id.trim().is_empty() {
            return Some("missing scene id".to_string());
        }
        if self.items.is_empty() {
            return Some("record has no items".to_string());
        }
        None
    }
}
