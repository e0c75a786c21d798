//! Options file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::LogError;
use crate::options::loader::load_options;
use crate::options::Options;

type ReloadHandler = Arc<dyn Fn(Options) + Send + Sync>;

/// Watches a TOML options file and hands every valid reload to a handler.
pub struct OptionsWatcher {
    path: PathBuf,
    handler: ReloadHandler,
}

impl OptionsWatcher {
    /// Reloads re-initialize the process-wide logger.
    pub fn new(path: &Path) -> Self {
        Self::with_handler(path, |opts| {
            if let Err(e) = crate::global::init(&opts) {
                tracing::error!(error = %e, "Failed to apply reloaded log options");
            }
        })
    }

    pub fn with_handler<F>(path: &Path, handler: F) -> Self
    where
        F: Fn(Options) + Send + Sync + 'static,
    {
        Self {
            path: path.to_path_buf(),
            handler: Arc::new(handler),
        }
    }

    /// Starts watching in a background thread. Watching stops when the
    /// returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, LogError> {
        let handler = Arc::clone(&self.handler);
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Log options file change detected, reloading...");
                        match load_options(&path) {
                            Ok(opts) => handler(opts),
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload log options: {}. Keeping current options.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Log options watcher started");
        Ok(watcher)
    }
}
