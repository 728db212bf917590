//! Typed client and state synchronization layer for the Shamstagram API.
//!
//! Shamstagram is a social feed whose posts are rewritten by an AI service
//! into exaggerated versions, with simulated bot personas commenting on
//! posts after an artificial delay. This crate is what a view layer talks
//! to: a thin REST client, a durable auth session store, per-post comment
//! tree synchronization, and optimistic like toggling.
//!
//! ```no_run
//! use shamstagram_client::{Config, Shamstagram};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = Shamstagram::new(Config::from_env()?)?;
//! if client.auth.restore().await?.is_none() {
//!     // show the login screen
//! }
//!
//! let posts = client.posts.list_posts(None, None).await?;
//! let sync = client.comment_sync(posts[0].id);
//! sync.load().await?;
//! sync.create("대박이네요!", None).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use error::{ClientError, Result};
pub use state::Shamstagram;

/// Initializes tracing for demos and ad hoc debugging. Applications with
/// their own subscriber should skip this.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = std::env::var("LOG_LEVEL").unwrap_or_else(|_| log_level.to_string());
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
