//! Interfaces to the collaborators the save engine drives
//!
//! The interpreter, the scene loader, the UI and the frame clock are owned by
//! the host application. They are handed to the saver and loader explicitly
//! at construction.

pub mod interpreter;
pub mod mock;
pub mod presenter;
pub mod scene;
pub mod ticker;

pub use interpreter::Interpreter;
pub use presenter::Presenter;
pub use scene::{SceneLoader, SceneReady};
pub use ticker::{FrameTicker, YieldTicker};
