//! Error-reporting sink used by the defaulting service methods.

use crate::error::ServiceApiError;

/// Receives errors that a defaulting call swallowed.
pub trait ErrorSink: Send + Sync {
    fn report(&self, operation: &'static str, error: &ServiceApiError);
}

/// Reports errors as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, operation: &'static str, error: &ServiceApiError) {
        match error.status() {
            Some(status) => tracing::error!(operation, %status, "studio call failed: {}", error),
            None => tracing::error!(operation, "studio call failed: {}", error),
        }
    }
}
