use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::runtime::{SceneLoader, SceneReady};

use super::state::LoadError;

/// One-shot registration for a specific scene's ready notification.
///
/// Must be created before the load is requested so the notification cannot
/// be missed. Consumed by [`SceneReadyWaiter::wait`]; dropping it at any
/// point unregisters the handler.
pub struct SceneReadyWaiter {
    scene_id: String,
    receiver: broadcast::Receiver<SceneReady>,
}

impl SceneReadyWaiter {
    pub fn register(scenes: &dyn SceneLoader, scene_id: &str) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            receiver: scenes.subscribe(),
        }
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    /// Wait until the matching scene reports ready. Notifications for other
    /// scenes are ignored.
    ///
    /// If the subscription lags, the notification may have been among the
    /// dropped messages, so `scenes` is asked for the active scene instead.
    pub async fn wait(
        mut self,
        scenes: &dyn SceneLoader,
        timeout: Option<Duration>,
    ) -> Result<(), LoadError> {
        let scene_id = self.scene_id.clone();
        let receiver = &mut self.receiver;

        let wait_for_scene = async {
            loop {
                match receiver.recv().await {
                    Ok(ready) if ready.scene_id == scene_id => return Ok(()),
                    Ok(other) => {
                        tracing::debug!(
                            expected = %scene_id,
                            got = %other.scene_id,
                            "Ignoring ready notification for another scene"
                        );
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Scene-ready subscription lagged");
                        if scenes.active_scene().as_deref() == Some(scene_id.as_str()) {
                            return Ok(());
                        }
                    }
                    Err(RecvError::Closed) => {
                        return Err(LoadError::SceneLoaderClosed {
                            scene_id: scene_id.clone(),
                        });
                    }
                }
            }
        };

        match timeout {
            Some(limit) => tokio::time::timeout(limit, wait_for_scene)
                .await
                .map_err(|_| LoadError::SceneTimeout {
                    scene_id: scene_id.clone(),
                    waited_ms: limit.as_millis() as u64,
                })?,
            None => wait_for_scene.await,
        }
    }
}
