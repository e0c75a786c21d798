//! Installing options as the process-wide engine.

use crate::engine::{self, Engine};
use crate::error::LogError;
use crate::options::Options;

impl Options {
    /// Builds an engine and installs it as the process-wide engine, which also
    /// receives `tracing` events and `log` records.
    ///
    /// This is separate from `global::init`, which replaces the facade logger.
    pub fn build(&self) -> Result<(), LogError> {
        let built = Engine::from_options(self)?.named(&self.name);
        engine::replace_globals(built)?;
        tracing::debug!(options = %self, "Logging engine installed");
        Ok(())
    }
}
