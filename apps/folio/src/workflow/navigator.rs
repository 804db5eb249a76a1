use async_trait::async_trait;
use tracing::info;

/// Receives the single completion redirect.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, url: &str);
}

/// Prints the destination on stdout so scripts can pick it up.
pub struct StdoutNavigator;

#[async_trait]
impl Navigator for StdoutNavigator {
    async fn navigate(&self, url: &str) {
        info!(url, "Redirecting to generated portfolio");
        println!("{url}");
    }
}
