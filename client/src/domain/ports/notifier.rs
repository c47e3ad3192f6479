//! Port for transient user-visible notifications.

use tracing::{info, warn};

/// Shows short success/failure messages to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Report a completed operation.
    fn success(&self, message: &str);
    /// Report a failed operation.
    fn error(&self, message: &str);
}

/// Notifier that writes to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notification = message, "success");
    }

    fn error(&self, message: &str) {
        warn!(notification = message, "error");
    }
}
