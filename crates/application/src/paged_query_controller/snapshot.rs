use rostrum_core::AppError;
use rostrum_domain::TotalCount;
use serde::Serialize;
use serde_json::Value;

/// Classification of a failed page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The backend could not be reached or its reply could not be read.
    Transport,
    /// The backend answered with a failure.
    Server,
}

impl FetchErrorKind {
    /// Classifies an error returned by the list-fetch port.
    #[must_use]
    pub fn classify(error: &AppError) -> Self {
        match error {
            AppError::Transport(_) => Self::Transport,
            _ => Self::Server,
        }
    }
}

/// Fetch lifecycle state of one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The latest fetch succeeded.
    Loaded,
    /// The latest fetch failed; previously loaded rows are kept.
    Failed(FetchErrorKind),
}

/// Transient, dismissible message for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleNotification {
    /// Identifier used to dismiss the notification.
    pub id: u64,
    /// Failure classification.
    pub kind: FetchErrorKind,
    /// Human-readable message.
    pub message: String,
}

/// Read-only view of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot<'a> {
    /// Lifecycle state.
    pub status: LoadStatus,
    /// Rows of the last successfully loaded page.
    pub rows: &'a [Value],
    /// Zero-based index of the loaded page.
    pub page_index: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Total matching rows.
    pub total: TotalCount,
    /// Page count, when the total is known.
    pub page_count: Option<u64>,
    /// Whether direct page jumps may be offered.
    pub can_jump_to_page: bool,
    /// Filter expression of the current inputs.
    pub expression: &'a str,
    /// Undismissed notifications, oldest first.
    pub notifications: &'a [ConsoleNotification],
}
