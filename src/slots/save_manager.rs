//! Slot persistence
//!
//! Keeps the in-memory slot table and the save directory in step: every
//! change is written to disk first and only then applied to the slots, so a
//! failed write leaves both the slot and its previous file untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::loader::GameSaver;
use crate::save::{SaveError, SaveReader, SaveRecord, SaveWriter};

use super::slot_manager::{SaveSlot, SaveSlotManager};

pub struct SaveManager {
    save_dir: PathBuf,
    reader: SaveReader,
    writer: SaveWriter,
    slots: SaveSlotManager,
}

impl SaveManager {
    pub fn new(
        save_dir: impl Into<PathBuf>,
        reader: SaveReader,
        writer: SaveWriter,
        slot_count: u32,
    ) -> Self {
        Self {
            save_dir: save_dir.into(),
            reader,
            writer,
            slots: SaveSlotManager::new(slot_count),
        }
    }

    /// Build a manager from `config` and populate it from the save directory.
    pub fn from_config(config: &Config) -> Result<Self, SaveError> {
        let mut manager = Self::new(
            config.save_dir.clone(),
            config.reader()?,
            config.writer(),
            config.slot_count,
        );
        manager.refresh_from_disk()?;
        Ok(manager)
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn slots(&self) -> &SaveSlotManager {
        &self.slots
    }

    pub fn slot_count(&self) -> u32 {
        self.slots.slot_count()
    }

    /// Path of the file backing slot `number`
    pub fn slot_path(&self, number: u32) -> PathBuf {
        self.save_dir.join(self.reader.naming().file_name(number))
    }

    /// Replace the slot table with what is on disk.
    ///
    /// A missing save directory means no saves. Files that fail to read, or
    /// whose slot number is out of range, are skipped and returned.
    pub fn refresh_from_disk(&mut self) -> Result<Vec<SaveError>, SaveError> {
        let mut slots = SaveSlotManager::new(self.slots.slot_count());
        if let Some(selected) = self.slots.selected_slot() {
            slots.select(selected.number)?;
        }

        let bulk = match self.reader.read_all(&self.save_dir) {
            Ok(bulk) => bulk,
            Err(e) if e.is_not_found() => {
                tracing::debug!(dir = %self.save_dir.display(), "Save directory does not exist yet");
                self.slots = slots;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut failures = bulk.failures;
        for (number, record) in bulk.records {
            if let Err(e) = slots.assign_record(number, record) {
                tracing::warn!(slot = number, error = %e, "Ignoring save file outside the slot range");
                failures.push(e);
            }
        }

        tracing::info!(
            dir = %self.save_dir.display(),
            occupied = slots.snapshot().iter().filter(|s| !s.is_empty()).count(),
            skipped = failures.len(),
            "Loaded save slots"
        );
        self.slots = slots;
        Ok(failures)
    }

    /// Write `record` to the slot named by its `slot_number`, replacing any
    /// previous save there. Returns the replaced record.
    pub fn add_save(&mut self, record: SaveRecord) -> Result<Option<SaveRecord>, SaveError> {
        let number = record.slot_number;
        self.slots.get_slot(number)?;

        self.writer.write(&record, &self.slot_path(number))?;
        let previous = self.slots.assign_record(number, record)?;

        tracing::info!(slot = number, replaced = previous.is_some(), "Saved game");
        Ok(previous)
    }

    /// Delete slot `number`'s file and empty the slot. Erasing an empty slot
    /// does nothing.
    pub fn erase_save(&mut self, number: u32) -> Result<Option<SaveRecord>, SaveError> {
        if self.slots.get_slot(number)?.is_empty() {
            return Ok(None);
        }

        let path = self.slot_path(number);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Save file already gone");
            }
            Err(e) => return Err(SaveError::io(path, e)),
        }

        let erased = self.slots.erase(number)?;
        tracing::info!(slot = number, "Erased save");
        Ok(erased)
    }

    /// Erase whichever slot currently holds `record`
    pub fn erase_record(&mut self, record: &SaveRecord) -> Result<Option<SaveRecord>, SaveError> {
        match self.slots.find_record(record.id) {
            Some(number) => self.erase_save(number),
            None => Ok(None),
        }
    }

    pub fn get_save(&self, number: u32) -> Option<SaveRecord> {
        self.slots
            .get_slot(number)
            .ok()
            .and_then(|slot| slot.record.clone())
    }

    /// Most recently written save, the one "continue" resumes
    pub fn latest_save(&self) -> Option<SaveRecord> {
        self.slots.latest().cloned()
    }

    pub fn has_any_save(&self) -> bool {
        self.slots.has_any_save()
    }

    pub fn select(&mut self, number: u32) -> Result<(), SaveError> {
        self.slots.select(number)
    }

    pub fn clear_selection(&mut self) {
        self.slots.clear_selection();
    }

    pub fn selected_slot(&self) -> Option<SaveSlot> {
        self.slots.selected_slot().cloned()
    }

    pub fn selected_record(&self) -> Option<SaveRecord> {
        self.slots
            .selected_slot()
            .and_then(|slot| slot.record.clone())
    }

    /// Capture the live game into the selected slot
    pub fn save_to_selected_slot(&mut self, saver: &GameSaver) -> Result<SaveRecord, SaveError> {
        let number = self
            .slots
            .selected_slot()
            .map(|slot| slot.number)
            .ok_or(SaveError::NoSlotSelected)?;

        let record = saver.create_save(number);
        self.add_save(record.clone())?;
        Ok(record)
    }

    /// Erase the selected slot
    pub fn erase_selected(&mut self) -> Result<Option<SaveRecord>, SaveError> {
        let number = self
            .slots
            .selected_slot()
            .map(|slot| slot.number)
            .ok_or(SaveError::NoSlotSelected)?;
        self.erase_save(number)
    }
}
