//! Request-scoped logging context.
//!
//! A `Context` carries at most one logger, one request id and one execution
//! id. Its slots are private; a logger gets in only through
//! `Logger::with_context`, and ids are read back through `Logger::l`.

use std::sync::Arc;

use crate::field::Value;
use crate::logger::Logger;

#[derive(Debug, Clone, Default)]
pub struct Context {
    logger: Option<Arc<Logger>>,
    request_id: Option<Value>,
    execution_id: Option<Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_logger(&self, logger: Arc<Logger>) -> Self {
        Self {
            logger: Some(logger),
            ..self.clone()
        }
    }

    pub fn with_request_id(&self, id: impl Into<Value>) -> Self {
        Self {
            request_id: Some(id.into()),
            ..self.clone()
        }
    }

    pub fn with_execution_id(&self, id: impl Into<Value>) -> Self {
        Self {
            execution_id: Some(id.into()),
            ..self.clone()
        }
    }

    pub fn logger(&self) -> Option<&Arc<Logger>> {
        self.logger.as_ref()
    }

    pub fn request_id(&self) -> Option<&Value> {
        self.request_id.as_ref()
    }

    pub fn execution_id(&self) -> Option<&Value> {
        self.execution_id.as_ref()
    }
}

/// The logger stored in `ctx`, or the process-wide logger if there is none.
pub fn from_context(ctx: Option<&Context>) -> Arc<Logger> {
    ctx.and_then(|c| c.logger.clone())
        .unwrap_or_else(crate::global::std_logger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_returns_new_carrier() {
        let base = Context::new();
        let with_id = base.with_request_id("abc");
        assert!(base.request_id().is_none());
        assert_eq!(with_id.request_id(), Some(&Value::Str("abc".into())));
    }

    #[test]
    fn test_from_context_prefers_stored_logger() {
        let logger = Logger::default().with_name("stored");
        let ctx = logger.with_context(&Context::new().with_execution_id(9));

        let found = from_context(Some(&ctx));
        assert_eq!(found.name(), "stored");
        assert_eq!(ctx.execution_id(), Some(&Value::I64(9)));
    }

    #[test]
    fn test_from_context_falls_back_to_global() {
        let current = crate::global::std_logger();
        assert!(Arc::ptr_eq(&from_context(Some(&Context::new())), &current));
        assert!(Arc::ptr_eq(&from_context(None), &current));
    }
}
