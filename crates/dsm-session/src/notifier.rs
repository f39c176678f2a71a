//! User-notification collaborator.

/// Fire-and-forget user notifications, rendered as toasts by the UI layer.
/// The core never consumes a return value from these.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str, title: &str);
    fn error(&self, message: &str, title: &str);
    fn warning(&self, message: &str, title: &str);
}

/// Notifier that forwards to `tracing`, for headless use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str, title: &str) {
        tracing::info!(title, "{message}");
    }

    fn error(&self, message: &str, title: &str) {
        tracing::error!(title, "{message}");
    }

    fn warning(&self, message: &str, title: &str) {
        tracing::warn!(title, "{message}");
    }
}
