use async_trait::async_trait;

/// The host's frame clock.
///
/// `next_frame` resolves once the runtime has advanced by one scheduling
/// tick.
#[async_trait]
pub trait FrameTicker: Send + Sync {
    async fn next_frame(&self);
}

/// Treats one turn of the tokio scheduler as a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldTicker;

#[async_trait]
impl FrameTicker for YieldTicker {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}
