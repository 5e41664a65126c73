//! Bounded set of user-facing save slots

use uuid::Uuid;

use crate::save::{SaveError, SaveRecord};

/// One numbered slot, empty or holding exactly one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    pub number: u32,
    pub record: Option<SaveRecord>,
}

impl SaveSlot {
    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }
}

/// Maps slot numbers `1..=count` to records and tracks the selected slot
#[derive(Debug, Clone)]
pub struct SaveSlotManager {
    slots: Vec<SaveSlot>,
    selected: Option<u32>,
}

impl SaveSlotManager {
    /// Create `count` empty slots (at least one)
    pub fn new(count: u32) -> Self {
        let slots = (1..=count.max(1))
            .map(|number| SaveSlot {
                number,
                record: None,
            })
            .collect();
        Self {
            slots,
            selected: None,
        }
    }

    pub fn slot_count(&self) -> u32 {
        self.slots.len() as u32
    }

    fn index(&self, number: u32) -> Result<usize, SaveError> {
        if number == 0 || number > self.slot_count() {
            return Err(SaveError::SlotOutOfRange {
                number,
                count: self.slot_count(),
            });
        }
        Ok((number - 1) as usize)
    }

    pub fn get_slot(&self, number: u32) -> Result<&SaveSlot, SaveError> {
        let idx = self.index(number)?;
        Ok(&self.slots[idx])
    }

    /// Cloned view of every slot, safe to iterate while the manager changes
    pub fn snapshot(&self) -> Vec<SaveSlot> {
        self.slots.clone()
    }

    /// Put `record` in slot `number`, replacing whatever was there.
    ///
    /// The record's own `slot_number` is updated to match.
    pub fn assign_record(
        &mut self,
        number: u32,
        mut record: SaveRecord,
    ) -> Result<Option<SaveRecord>, SaveError> {
        let idx = self.index(number)?;
        record.slot_number = number;
        Ok(self.slots[idx].record.replace(record))
    }

    /// Empty slot `number`. Erasing an empty slot is a no-op.
    pub fn erase(&mut self, number: u32) -> Result<Option<SaveRecord>, SaveError> {
        let idx = self.index(number)?;
        Ok(self.slots[idx].record.take())
    }

    /// Empty whichever slot holds the record with `id`
    pub fn erase_record(&mut self, id: Uuid) -> Option<SaveRecord> {
        self.slots
            .iter_mut()
            .find(|slot| slot.record.as_ref().is_some_and(|r| r.id == id))
            .and_then(|slot| slot.record.take())
    }

    /// Slot number holding the record with `id`
    pub fn find_record(&self, id: Uuid) -> Option<u32> {
        self.slots
            .iter()
            .find(|slot| slot.record.as_ref().is_some_and(|r| r.id == id))
            .map(|slot| slot.number)
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.record = None;
        }
    }

    pub fn has_any_save(&self) -> bool {
        self.slots.iter().any(|slot| slot.record.is_some())
    }

    /// Record with the most recent `saved_at`
    pub fn latest(&self) -> Option<&SaveRecord> {
        self.slots
            .iter()
            .filter_map(|slot| slot.record.as_ref())
            .max_by_key(|record| record.saved_at)
    }

    pub fn selected_slot(&self) -> Option<&SaveSlot> {
        self.selected.and_then(|n| self.get_slot(n).ok())
    }

    pub fn select(&mut self, number: u32) -> Result<(), SaveError> {
        self.index(number)?;
        self.selected = Some(number);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
