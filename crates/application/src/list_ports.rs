use async_trait::async_trait;
use rostrum_core::AppResult;
use rostrum_domain::{PageRequest, PageResult, Principal};

/// Port for the remote "list fetch" collaborator of one list screen.
#[async_trait]
pub trait ListFetcher: Send + Sync {
    /// Fetches one page of rows.
    ///
    /// An empty filter expression means no filtering. Implementations report
    /// unreachable backends as [`rostrum_core::AppError::Transport`] and
    /// failure statuses as [`rostrum_core::AppError::Server`].
    async fn fetch_page(&self, request: &PageRequest) -> AppResult<PageResult>;
}

/// Port for the session collaborator owning the active principal.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the active principal, or `None` when nobody is signed in.
    async fn current_principal(&self) -> AppResult<Option<Principal>>;
}
