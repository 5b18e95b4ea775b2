/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeKind::Info => write!(f, "info"),
            NoticeKind::Success => write!(f, "success"),
            NoticeKind::Error => write!(f, "error"),
        }
    }
}

/// Capability for surfacing one-line notices (toasts, status bars) to the user.
///
/// The front-end supplies its own implementation; the core never touches UI state directly.
pub trait Notifier: Send + Sync {
    fn show(&self, message: &str, kind: NoticeKind);
}

/// Routes notices to the `tracing` log. Used when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => tracing::warn!(%kind, "{message}"),
            NoticeKind::Info | NoticeKind::Success => tracing::info!(%kind, "{message}"),
        }
    }
}
