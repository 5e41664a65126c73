//! Save creation and the cross-scene load sequence

pub mod game_loader;
pub mod game_saver;
pub mod scene_wait;
pub mod state;
pub mod subloader;

pub use game_loader::GameLoader;
pub use game_saver::GameSaver;
pub use scene_wait::SceneReadyWaiter;
pub use state::{LoadError, LoadEvent, LoadReport, LoaderState, SubloaderFailure};
pub use subloader::{Subloader, SubloaderError, SubloaderRegistry};
