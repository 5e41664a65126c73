pub mod config;
pub mod loader;
pub mod runtime;
pub mod save;
pub mod slots;
pub mod snapshot;
pub mod util;

pub use config::Config;
pub use loader::{GameLoader, GameSaver, LoadError, LoadEvent, LoadReport, LoaderState};
pub use loader::{Subloader, SubloaderRegistry};
pub use runtime::{FrameTicker, Interpreter, Presenter, SceneLoader, SceneReady, YieldTicker};
pub use save::{SaveEncoding, SaveError, SaveItem, SaveRecord};
pub use slots::{SaveManager, SaveSlot, SaveSlotManager};
pub use snapshot::{ExecutionPosition, MenuOption, Presentation, ResumeError, VariableValue};
pub use util::init_file_logging;
