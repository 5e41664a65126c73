use std::sync::Arc;

use crate::runtime::{Interpreter, Presenter, SceneLoader};
use crate::save::{SaveItem, SaveRecord, FLOWCHART_ITEM_KEY};
use crate::snapshot::{capture_position, capture_presentation, capture_variables};

use super::subloader::SubloaderRegistry;

/// Builds save records from the live runtime
pub struct GameSaver {
    interpreter: Arc<dyn Interpreter>,
    presenter: Arc<dyn Presenter>,
    scenes: Arc<dyn SceneLoader>,
    subloaders: SubloaderRegistry,
}

impl GameSaver {
    pub fn new(
        interpreter: Arc<dyn Interpreter>,
        presenter: Arc<dyn Presenter>,
        scenes: Arc<dyn SceneLoader>,
        subloaders: SubloaderRegistry,
    ) -> Self {
        Self {
            interpreter,
            presenter,
            scenes,
            subloaders,
        }
    }

    /// Snapshot the current scene, position, variables, UI and subloader
    /// items into a record destined for slot `slot_number`.
    pub fn create_save(&self, slot_number: u32) -> SaveRecord {
        let scene_id = self.scenes.active_scene().unwrap_or_default();
        let script_id = self.interpreter.script_id();
        let position = capture_position(self.interpreter.as_ref());

        let description = match &position {
            Some(position) => format!("{scene_id}: {}", position.block_id),
            None => scene_id.clone(),
        };

        let mut record = SaveRecord::new(scene_id, script_id.clone())
            .with_slot(slot_number)
            .with_description(description)
            .with_variables(capture_variables(self.interpreter.as_ref()))
            .with_item(SaveItem::new(FLOWCHART_ITEM_KEY, script_id));
        record.position = position;
        record.presentation = capture_presentation(self.presenter.as_ref());
        record.progress_marker = self.interpreter.latest_progress_marker();

        for entry in self.subloaders.snapshot() {
            let Some(subloader) = entry.subloader.upgrade() else {
                tracing::warn!(name = %entry.name, "Subloader was dropped, nothing captured");
                continue;
            };
            for item in subloader.capture() {
                if !subloader.owns(&item) {
                    tracing::warn!(
                        name = %entry.name,
                        key = %item.key,
                        "Subloader captured an item it does not own, dropping it"
                    );
                    continue;
                }
                record.items.push(item);
            }
        }

        tracing::info!(
            slot = slot_number,
            scene = %record.scene_id,
            items = record.items.len(),
            variables = record.variables.len(),
            "Created save"
        );
        record
    }
}
