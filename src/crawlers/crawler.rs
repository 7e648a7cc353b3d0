use crate::error::RenderError;
use async_trait::async_trait;
use std::time::Duration;

/// Turns a URL into fully rendered HTML
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `url`, giving up after `timeout`
    ///
    /// Implementations must release any browser resource they acquire on
    /// every exit path, including the timeout.
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, RenderError>;
}
