use tokio::sync::broadcast;

/// Emitted by a scene loader once a requested scene is fully loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneReady {
    pub scene_id: String,
}

impl SceneReady {
    pub fn new(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
        }
    }
}

/// The scene/world loader
pub trait SceneLoader: Send + Sync {
    /// Identifier of the scene currently active, `None` before the first load
    fn active_scene(&self) -> Option<String>;

    /// Register for scene-ready notifications. Dropping the receiver
    /// unregisters it.
    fn subscribe(&self) -> broadcast::Receiver<SceneReady>;

    /// Begin loading `scene_id`. Completion is reported exactly once through
    /// the subscription.
    fn request_load(&self, scene_id: &str);
}
