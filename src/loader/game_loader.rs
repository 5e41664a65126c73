//! Cross-scene resume orchestration
//!
//! A load runs as one async sequence:
//!
//! 1. If the record's scene is not active, register for its ready
//!    notification, request it, and wait.
//! 2. Halt the interpreter and check the saved position exists.
//! 3. Restore variables, then run subloaders in priority order.
//! 4. Resume at the saved position.
//! 5. One frame later, put the dialog or menu back on screen.
//!
//! Taking `&mut self` for the whole sequence means a loader can never run two
//! loads against its interpreter at once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::runtime::{FrameTicker, Interpreter, Presenter, SceneLoader};
use crate::save::{SaveRecord, FLOWCHART_ITEM_KEY};
use crate::slots::SaveManager;
use crate::snapshot::{check_position, restore_presentation, restore_variables, resume_at};

use super::scene_wait::SceneReadyWaiter;
use super::state::{LoadError, LoadEvent, LoadReport, LoaderState, SubloaderFailure};
use super::subloader::SubloaderRegistry;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Drives a save record back into a running interpreter
pub struct GameLoader {
    interpreter: Arc<dyn Interpreter>,
    presenter: Arc<dyn Presenter>,
    scenes: Arc<dyn SceneLoader>,
    ticker: Arc<dyn FrameTicker>,
    subloaders: SubloaderRegistry,
    scene_ready_timeout: Option<Duration>,
    state: LoaderState,
    events: broadcast::Sender<LoadEvent>,
}

impl GameLoader {
    pub fn new(
        interpreter: Arc<dyn Interpreter>,
        presenter: Arc<dyn Presenter>,
        scenes: Arc<dyn SceneLoader>,
        ticker: Arc<dyn FrameTicker>,
        subloaders: SubloaderRegistry,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            interpreter,
            presenter,
            scenes,
            ticker,
            subloaders,
            scene_ready_timeout: None,
            state: LoaderState::Idle,
            events,
        }
    }

    pub fn with_scene_ready_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scene_ready_timeout = timeout;
        self
    }

    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    pub fn subloaders(&self) -> &SubloaderRegistry {
        &self.subloaders
    }

    /// Receive lifecycle notifications for subsequent loads
    pub fn subscribe(&self) -> broadcast::Receiver<LoadEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: LoadEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn set_state(&mut self, state: LoaderState) {
        tracing::debug!(from = %self.state, to = %state, "Loader state");
        self.state = state.clone();
        self.emit(LoadEvent::StateChanged(state));
    }

    /// Load `record`, switching scenes first if needed.
    ///
    /// The loader is back in [`LoaderState::Idle`] when this returns, whether
    /// or not the load succeeded.
    pub async fn load(&mut self, record: &SaveRecord) -> Result<LoadReport, LoadError> {
        self.emit(LoadEvent::Started {
            record_id: record.id,
            scene_id: record.scene_id.clone(),
        });

        let result = self.run(record).await;

        match &result {
            Ok(report) => {
                self.set_state(LoaderState::Resumed);
                tracing::info!(
                    slot = record.slot_number,
                    scene = %record.scene_id,
                    variable_issues = report.variables.issues.len(),
                    "Load completed"
                );
                self.emit(LoadEvent::Completed(report.clone()));
            }
            Err(e) => {
                self.set_state(LoaderState::Failed);
                tracing::error!(
                    slot = record.slot_number,
                    scene = %record.scene_id,
                    error = %e,
                    "Load failed"
                );
                self.emit(LoadEvent::Failed(e.clone()));
            }
        }

        self.set_state(LoaderState::Idle);
        result
    }

    /// Load the most recently written save ("continue")
    pub async fn load_latest(&mut self, saves: &SaveManager) -> Result<LoadReport, LoadError> {
        let record = saves.latest_save().ok_or(LoadError::NoSaves)?;
        self.load(&record).await
    }

    /// Load whatever is in slot `number`
    pub async fn load_slot(
        &mut self,
        saves: &SaveManager,
        number: u32,
    ) -> Result<LoadReport, LoadError> {
        let record = saves.get_save(number).ok_or(LoadError::EmptySlot(number))?;
        self.load(&record).await
    }

    async fn run(&mut self, record: &SaveRecord) -> Result<LoadReport, LoadError> {
        if let Some(reason) = record.validation_problem() {
            return Err(LoadError::InvalidRecord(reason));
        }

        let mut report = LoadReport::default();

        let active = self.scenes.active_scene();
        if active.as_deref() != Some(record.scene_id.as_str()) {
            report.scene_changed = true;
            self.set_state(LoaderState::SceneTransitionPending {
                scene_id: record.scene_id.clone(),
            });

            let waiter = SceneReadyWaiter::register(self.scenes.as_ref(), &record.scene_id);
            tracing::info!(
                from = active.as_deref().unwrap_or("<none>"),
                to = %record.scene_id,
                "Requesting scene for load"
            );
            self.scenes.request_load(&record.scene_id);
            waiter
                .wait(self.scenes.as_ref(), self.scene_ready_timeout)
                .await?;
        }

        self.set_state(LoaderState::RestoringState);
        self.restore(record, &mut report).await?;
        Ok(report)
    }

    async fn restore(
        &self,
        record: &SaveRecord,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        let interpreter = self.interpreter.as_ref();

        interpreter.halt_all();
        if let Some(position) = &record.position {
            check_position(interpreter, position)?;
        }

        self.presenter.hide_all();

        if let Some(marker) = &record.progress_marker {
            if !interpreter.set_latest_progress_marker(marker) {
                tracing::warn!(marker = %marker, "Saved progress marker not found in script");
            }
        }

        report.variables = restore_variables(&record.variables, interpreter);

        self.run_subloaders(record, report);

        if let Some(position) = &record.position {
            resume_at(interpreter, position)?;
            report.resumed = true;
        } else {
            tracing::debug!("Save has no position, interpreter left idle");
        }

        if let Some(presentation) = &record.presentation {
            restore_presentation(
                presentation,
                self.presenter.as_ref(),
                interpreter,
                self.ticker.as_ref(),
            )
            .await;
            report.presentation_restored = true;
        }

        Ok(())
    }

    fn run_subloaders(&self, record: &SaveRecord, report: &mut LoadReport) {
        let mut live = Vec::new();

        for entry in self.subloaders.snapshot() {
            let Some(subloader) = entry.subloader.upgrade() else {
                tracing::warn!(name = %entry.name, "Skipping subloader that no longer exists");
                report.subloaders_missing.push(entry.name);
                continue;
            };

            let owned = record.items_matching(|item| subloader.owns(item));
            if let Err(e) = subloader.load(&owned) {
                tracing::warn!(name = %entry.name, error = %e, "Subloader failed");
                report.subloader_failures.push(SubloaderFailure {
                    name: entry.name.clone(),
                    message: e.to_string(),
                });
            }
            report.subloaders_run.push(entry.name);
            live.push(subloader);
        }

        let unclaimed = record.items_matching(|item| {
            item.key != FLOWCHART_ITEM_KEY && !live.iter().any(|s| s.owns(item))
        });
        for item in unclaimed {
            tracing::debug!(key = %item.key, "No subloader owns save item");
        }
    }
}
