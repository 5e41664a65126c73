//! User-facing save slots and their on-disk persistence

pub mod save_manager;
pub mod slot_manager;

pub use save_manager::SaveManager;
pub use slot_manager::{SaveSlot, SaveSlotManager};
