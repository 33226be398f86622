/// Colour class of the footer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warn,
    Error,
}

/// The single line of feedback shown in the footer. Each git outcome
/// replaces it; nothing is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub(crate) fn ready() -> Self {
        Self::info("Ready")
    }

    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self::with_kind(StatusKind::Info, text.into())
    }

    pub(crate) fn warn(text: impl Into<String>) -> Self {
        Self::with_kind(StatusKind::Warn, text.into())
    }

    /// Prefixed with `Error: ` so it reads the same in any theme.
    pub(crate) fn error(text: impl Into<String>) -> Self {
        Self::with_kind(StatusKind::Error, format!("Error: {}", text.into()))
    }

    fn with_kind(kind: StatusKind, text: String) -> Self {
        Self { kind, text }
    }
}
