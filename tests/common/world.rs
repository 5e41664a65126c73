//! A complete mock runtime wired to a temporary save directory

use std::path::Path;
use std::sync::Arc;

use storysave::runtime::mock::{CountingTicker, MockInterpreter, MockPresenter, MockSceneLoader};
use storysave::snapshot::VariableValue;
use storysave::{Config, GameLoader, GameSaver, SaveEncoding, SaveManager, SubloaderRegistry};
use tempfile::TempDir;

/// The script used across tests: a few blocks and two variables
pub fn story_interpreter() -> MockInterpreter {
    MockInterpreter::new("story")
        .with_block("Start", 2)
        .with_block("Hall", 4)
        .with_block("Gost", 5)
        .with_block("Exit", 1)
        .with_variable("score", VariableValue::Integer(0))
        .with_variable("seen", VariableValue::Boolean(false))
        .with_progress_marker("chapter-1")
}

/// One running "process": collaborators plus a save manager over `dir`
pub struct World {
    pub interpreter: Arc<MockInterpreter>,
    pub presenter: Arc<MockPresenter>,
    pub scenes: Arc<MockSceneLoader>,
    pub ticker: Arc<CountingTicker>,
    pub registry: SubloaderRegistry,
    pub saves: SaveManager,
}

impl World {
    pub fn new(dir: &Path, scenes: MockSceneLoader) -> Self {
        Self::with_interpreter(dir, scenes, story_interpreter(), SaveEncoding::Plain)
    }

    pub fn with_interpreter(
        dir: &Path,
        scenes: MockSceneLoader,
        interpreter: MockInterpreter,
        encoding: SaveEncoding,
    ) -> Self {
        let config = Config::default()
            .with_save_dir(dir.to_path_buf())
            .with_slot_count(3)
            .with_encoding(encoding);
        Self {
            interpreter: Arc::new(interpreter),
            presenter: Arc::new(MockPresenter::new()),
            scenes: Arc::new(scenes),
            ticker: Arc::new(CountingTicker::new()),
            registry: SubloaderRegistry::new(),
            saves: SaveManager::from_config(&config).expect("Failed to open save directory"),
        }
    }

    pub fn saver(&self) -> GameSaver {
        GameSaver::new(
            self.interpreter.clone(),
            self.presenter.clone(),
            self.scenes.clone(),
            self.registry.clone(),
        )
    }

    pub fn loader(&self) -> GameLoader {
        GameLoader::new(
            self.interpreter.clone(),
            self.presenter.clone(),
            self.scenes.clone(),
            self.ticker.clone(),
            self.registry.clone(),
        )
    }
}

pub fn temp_save_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}
