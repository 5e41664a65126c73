//! In-memory collaborators for deterministic testing
//!
//! Each mock implements one runtime trait and records every interaction so
//! tests can assert on what the saver and loader did, without a real
//! interpreter, scene system or UI.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use storysave::loader::{GameLoader, SubloaderRegistry};
//! use storysave::runtime::mock::{CountingTicker, MockInterpreter, MockPresenter, MockSceneLoader};
//!
//! let interpreter = Arc::new(MockInterpreter::new("story").with_block("Start", 3));
//! let loader = GameLoader::new(
//!     interpreter.clone(),
//!     Arc::new(MockPresenter::new()),
//!     Arc::new(MockSceneLoader::auto(Some("Game"))),
//!     Arc::new(CountingTicker::new()),
//!     SubloaderRegistry::new(),
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::loader::{Subloader, SubloaderError};
use crate::save::SaveItem;
use crate::snapshot::{ExecutionPosition, MenuOption, VariableKind, VariableValue};

use super::{FrameTicker, Interpreter, Presenter, SceneLoader, SceneReady};

#[derive(Default)]
struct InterpreterState {
    cursors: Vec<ExecutionPosition>,
    executions: Vec<ExecutionPosition>,
    halts: usize,
    variables: Vec<(String, VariableValue)>,
    latest_marker: Option<String>,
}

/// Scripted interpreter with a fixed block table
pub struct MockInterpreter {
    script_id: String,
    /// Block id -> command count
    blocks: BTreeMap<String, usize>,
    markers: BTreeSet<String>,
    state: Mutex<InterpreterState>,
}

impl MockInterpreter {
    pub fn new(script_id: impl Into<String>) -> Self {
        Self {
            script_id: script_id.into(),
            blocks: BTreeMap::new(),
            markers: BTreeSet::new(),
            state: Mutex::new(InterpreterState::default()),
        }
    }

    /// Declare a block with `commands` commands
    pub fn with_block(mut self, block_id: impl Into<String>, commands: usize) -> Self {
        self.blocks.insert(block_id.into(), commands);
        self
    }

    /// Declare a variable with its initial value
    pub fn with_variable(self, key: impl Into<String>, value: VariableValue) -> Self {
        self.state.lock().variables.push((key.into(), value));
        self
    }

    /// Declare a progress marker the script can jump back to
    pub fn with_progress_marker(mut self, key: impl Into<String>) -> Self {
        self.markers.insert(key.into());
        self
    }

    /// Current value of a declared variable
    pub fn variable(&self, key: &str) -> Option<VariableValue> {
        self.state
            .lock()
            .variables
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// How many times `halt_all` was called
    pub fn halt_count(&self) -> usize {
        self.state.lock().halts
    }

    /// How many blocks are executing right now
    pub fn running_cursors(&self) -> usize {
        self.state.lock().cursors.len()
    }

    /// Every successful `execute_from`, in call order
    pub fn execution_log(&self) -> Vec<ExecutionPosition> {
        self.state.lock().executions.clone()
    }
}

impl Interpreter for MockInterpreter {
    fn script_id(&self) -> String {
        self.script_id.clone()
    }

    fn current_position(&self) -> Option<ExecutionPosition> {
        self.state.lock().cursors.last().cloned()
    }

    fn halt_all(&self) {
        let mut state = self.state.lock();
        state.cursors.clear();
        state.halts += 1;
    }

    fn execute_from(&self, block_id: &str, command_index: usize) -> bool {
        if !self.blocks.contains_key(block_id) {
            return false;
        }
        let position = ExecutionPosition::new(block_id, command_index);
        let mut state = self.state.lock();
        state.cursors.push(position.clone());
        state.executions.push(position);
        true
    }

    fn command_count(&self, block_id: &str) -> Option<usize> {
        self.blocks.get(block_id).copied()
    }

    fn variables(&self) -> Vec<(String, VariableValue)> {
        self.state.lock().variables.clone()
    }

    fn find_variable(&self, key: &str) -> Option<VariableKind> {
        self.variable(key).map(|v| v.kind())
    }

    fn assign_variable(&self, key: &str, value: VariableValue) {
        let mut state = self.state.lock();
        if let Some(slot) = state.variables.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        }
    }

    fn latest_progress_marker(&self) -> Option<String> {
        self.state.lock().latest_marker.clone()
    }

    fn set_latest_progress_marker(&self, key: &str) -> bool {
        if !self.markers.contains(key) {
            return false;
        }
        self.state.lock().latest_marker = Some(key.to_string());
        true
    }
}

/// When a [`MockSceneLoader`] reports requested scenes as ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadyMode {
    /// Inside `request_load`
    Immediate,
    /// From a spawned task, after the requester has had a chance to run
    Deferred,
    /// Only through [`MockSceneLoader::notify_ready`]
    Manual,
}

/// Scene loader that tracks requests and fires ready notifications
pub struct MockSceneLoader {
    mode: ReadyMode,
    active: Arc<Mutex<Option<String>>>,
    sender: broadcast::Sender<SceneReady>,
    requests: Mutex<Vec<String>>,
    /// Unrelated scenes reported ready ahead of each requested one
    noise: Mutex<Vec<String>>,
}

impl MockSceneLoader {
    fn with_mode(mode: ReadyMode, active: Option<&str>) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            mode,
            active: Arc::new(Mutex::new(active.map(str::to_string))),
            sender,
            requests: Mutex::new(Vec::new()),
            noise: Mutex::new(Vec::new()),
        }
    }

    /// Requested scenes become ready synchronously
    pub fn auto(active: Option<&str>) -> Self {
        Self::with_mode(ReadyMode::Immediate, active)
    }

    /// Requested scenes become ready on a later scheduler turn
    pub fn deferred(active: Option<&str>) -> Self {
        Self::with_mode(ReadyMode::Deferred, active)
    }

    /// Requested scenes never become ready on their own
    pub fn manual(active: Option<&str>) -> Self {
        Self::with_mode(ReadyMode::Manual, active)
    }

    /// Report `scene_id` ready before every requested scene
    pub fn ready_first_for(&self, scene_id: impl Into<String>) {
        self.noise.lock().push(scene_id.into());
    }

    /// Make `scene_id` active and broadcast that it is ready
    pub fn notify_ready(&self, scene_id: &str) {
        *self.active.lock() = Some(scene_id.to_string());
        let _ = self.sender.send(SceneReady::new(scene_id));
    }

    /// Broadcast that `scene_id` is ready without making it active
    pub fn broadcast_ready(&self, scene_id: &str) {
        let _ = self.sender.send(SceneReady::new(scene_id));
    }

    /// Scenes passed to `request_load`, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Live ready-notification subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SceneLoader for MockSceneLoader {
    fn active_scene(&self) -> Option<String> {
        self.active.lock().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SceneReady> {
        self.sender.subscribe()
    }

    fn request_load(&self, scene_id: &str) {
        self.requests.lock().push(scene_id.to_string());
        let noise = self.noise.lock().clone();

        match self.mode {
            ReadyMode::Manual => {}
            ReadyMode::Immediate => {
                for other in &noise {
                    let _ = self.sender.send(SceneReady::new(other.as_str()));
                }
                self.notify_ready(scene_id);
            }
            ReadyMode::Deferred => {
                let sender = self.sender.clone();
                let active = self.active.clone();
                let scene_id = scene_id.to_string();
                tokio::spawn(async move {
                    tokio::task::yield_now().await;
                    for other in noise {
                        let _ = sender.send(SceneReady::new(other));
                    }
                    *active.lock() = Some(scene_id.clone());
                    let _ = sender.send(SceneReady::new(scene_id));
                });
            }
        }
    }
}

/// One call made on a [`MockPresenter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    ShowDialog(String),
    /// Number of options shown
    ShowMenu(usize),
    ClearMenu,
    HideAll,
}

#[derive(Default)]
struct PresenterState {
    dialog: Option<String>,
    menu: Option<Vec<MenuOption>>,
    calls: Vec<PresenterCall>,
}

/// Presenter that keeps the visible dialog and menu in memory
#[derive(Default)]
pub struct MockPresenter {
    state: Mutex<PresenterState>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.state.lock().calls.clone()
    }

    pub fn menu_clears(&self) -> usize {
        self.count(|c| matches!(c, PresenterCall::ClearMenu))
    }

    pub fn hide_count(&self) -> usize {
        self.count(|c| matches!(c, PresenterCall::HideAll))
    }

    fn count(&self, pred: impl Fn(&PresenterCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }
}

impl Presenter for MockPresenter {
    fn show_dialog(&self, text: &str) {
        let mut state = self.state.lock();
        state.dialog = Some(text.to_string());
        state.calls.push(PresenterCall::ShowDialog(text.to_string()));
    }

    fn show_menu(&self, options: &[MenuOption]) {
        let mut state = self.state.lock();
        state.menu = Some(options.to_vec());
        state.calls.push(PresenterCall::ShowMenu(options.len()));
    }

    fn clear_menu(&self) {
        let mut state = self.state.lock();
        state.menu = None;
        state.calls.push(PresenterCall::ClearMenu);
    }

    fn hide_all(&self) {
        let mut state = self.state.lock();
        state.dialog = None;
        state.menu = None;
        state.calls.push(PresenterCall::HideAll);
    }

    fn active_dialog_text(&self) -> Option<String> {
        self.state.lock().dialog.clone()
    }

    fn active_menu_options(&self) -> Option<Vec<MenuOption>> {
        self.state.lock().menu.clone()
    }
}

/// Frame ticker that counts how many frames were awaited
#[derive(Debug, Default)]
pub struct CountingTicker {
    frames: AtomicUsize,
}

impl CountingTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameTicker for CountingTicker {
    async fn next_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}

/// Subloader owning every item whose key equals its item key
pub struct RecordingSubloader {
    name: String,
    priority: i32,
    item_key: String,
    captures: Vec<String>,
    failure: Option<String>,
    received: Mutex<Vec<Vec<SaveItem>>>,
    /// Shared across subloaders to observe cross-subloader ordering
    order_log: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingSubloader {
    pub fn new(name: impl Into<String>, priority: i32, item_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority,
            item_key: item_key.into(),
            captures: Vec::new(),
            failure: None,
            received: Mutex::new(Vec::new()),
            order_log: None,
        }
    }

    /// Emit an item with `payload` on every capture
    pub fn capturing(mut self, payload: impl Into<String>) -> Self {
        self.captures.push(payload.into());
        self
    }

    /// Return an error carrying `message` from every load
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Append this subloader's name to `log` each time it loads
    pub fn with_log(mut self, log: Arc<Mutex<Vec<String>>>) -> Self {
        self.order_log = Some(log);
        self
    }

    pub fn load_calls(&self) -> usize {
        self.received.lock().len()
    }

    /// Items passed to the most recent load
    pub fn last_items(&self) -> Vec<SaveItem> {
        self.received.lock().last().cloned().unwrap_or_default()
    }
}

impl Subloader for RecordingSubloader {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn owns(&self, item: &SaveItem) -> bool {
        item.key == self.item_key
    }

    fn capture(&self) -> Vec<SaveItem> {
        self.captures
            .iter()
            .map(|payload| SaveItem::new(self.item_key.clone(), payload.clone()))
            .collect()
    }

    fn load(&self, items: &[SaveItem]) -> Result<(), SubloaderError> {
        self.received.lock().push(items.to_vec());
        if let Some(log) = &self.order_log {
            log.lock().push(self.name.clone());
        }
        match &self.failure {
            Some(message) => Err(SubloaderError::new(message.clone())),
            None => Ok(()),
        }
    }
}
