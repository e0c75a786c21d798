//! Process-wide engine slot.
//!
//! Starts out as a no-op engine. `replace_globals` swaps in a new one and,
//! the first time, installs a registry carrying [`EngineLayer`] as the global
//! `tracing` dispatcher (which also redirects the `log` crate). When `RUST_LOG`
//! is set, its directives filter `tracing` events before they reach the engine.

use std::sync::{Arc, LazyLock, OnceLock};

use arc_swap::ArcSwap;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::engine::layer::EngineLayer;
use crate::engine::Engine;
use crate::error::LogError;

static GLOBAL: LazyLock<ArcSwap<Engine>> =
    LazyLock::new(|| ArcSwap::from_pointee(Engine::nop()));

static DISPATCHER: OnceLock<Result<(), String>> = OnceLock::new();

/// The engine most recently installed by [`replace_globals`].
pub fn global() -> Arc<Engine> {
    GLOBAL.load_full()
}

/// Installs `engine` as the process-wide engine.
pub fn replace_globals(engine: Engine) -> Result<(), LogError> {
    install_dispatcher()?;
    GLOBAL.store(Arc::new(engine));
    Ok(())
}

fn install_dispatcher() -> Result<(), LogError> {
    DISPATCHER
        .get_or_init(|| {
            tracing_subscriber::registry()
                .with(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::TRACE.into())
                        .from_env_lossy(),
                )
                .with(EngineLayer::global())
                .try_init()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(LogError::Install)
}
