//! Save records and their durable encoding
//!
//! Records are written as self-describing JSON (optionally base64-obfuscated),
//! one file per slot, replaced atomically on every write.

pub mod encoding;
pub mod error;
pub mod naming;
pub mod reader;
pub mod record;
pub mod writer;

pub use encoding::SaveEncoding;
pub use error::SaveError;
pub use naming::SaveFileNaming;
pub use reader::{BulkRead, SaveReader};
pub use record::{SaveItem, SaveRecord, FLOWCHART_ITEM_KEY, SAVE_FORMAT_VERSION};
pub use writer::SaveWriter;
