//! Page-fetch lifecycle of one list screen.
//!
//! Inputs (search term, filters, page size, page navigation, refresh) update
//! the controller synchronously and hand back a [`PendingFetch`]. The pending
//! fetch resolves against the [`ListFetcher`] port without borrowing the
//! controller, and its completion is reconciled through
//! [`PagedQueryController::apply`]. Every issued fetch carries a sequence
//! number; only the completion of the most recently issued fetch is applied.

use std::sync::Arc;

use rostrum_core::{AppError, AppResult};
use rostrum_domain::{
    CompiledExpression, FilterExpressionCompiler, FilterState, ListScreen, PageRequest,
    PageResult, PageSize, TotalCount,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ListFetcher;

mod snapshot;

/// Undismissed notifications kept per controller; older ones are dropped first.
const MAX_NOTIFICATIONS: usize = 5;


pub use snapshot::{ConsoleNotification, FetchErrorKind, LoadStatus, PageSnapshot};

/// Fetch issued by the controller and not yet reconciled.
pub struct PendingFetch {
    sequence: u64,
    request: PageRequest,
    fetcher: Arc<dyn ListFetcher>,
}

impl PendingFetch {
    /// Returns the issuance sequence number.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the page request sent to the port.
    #[must_use]
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Awaits the list-fetch port.
    pub async fn resolve(self) -> FetchCompletion {
        let result = self.fetcher.fetch_page(&self.request).await;
        FetchCompletion {
            sequence: self.sequence,
            request: self.request,
            result,
        }
    }
}

impl std::fmt::Debug for PendingFetch {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PendingFetch")
            .field("sequence", &self.sequence)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// Outcome of one resolved fetch.
#[derive(Debug)]
pub struct FetchCompletion {
    sequence: u64,
    request: PageRequest,
    result: AppResult<PageResult>,
}

/// Result of reconciling a completion with the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Rows and pagination were replaced.
    Loaded,
    /// The fetch failed; previous rows were kept.
    Failed(FetchErrorKind),
    /// A newer fetch was issued after this one; the result was dropped.
    Discarded,
}

/// Owns the fetch lifecycle and the current page of one list screen.
pub struct PagedQueryController {
    label: String,
    fetcher: Arc<dyn ListFetcher>,
    compiler: FilterExpressionCompiler,
    search_term: String,
    filters: FilterState,
    expression: CompiledExpression,
    page_size: PageSize,
    status: LoadStatus,
    settled_status: LoadStatus,
    rows: Vec<Value>,
    page_index: u32,
    total: TotalCount,
    issued_sequence: u64,
    notifications: Vec<ConsoleNotification>,
    next_notification_id: u64,
}

impl PagedQueryController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        compiler: FilterExpressionCompiler,
        fetcher: Arc<dyn ListFetcher>,
        page_size: PageSize,
    ) -> Self {
        let filters = FilterState::new();
        let expression = compiler.compile("", &filters);

        Self {
            label: label.into(),
            fetcher,
            compiler,
            search_term: String::new(),
            filters,
            expression,
            page_size,
            status: LoadStatus::Idle,
            settled_status: LoadStatus::Idle,
            rows: Vec::new(),
            page_index: 0,
            total: TotalCount::Unknown,
            issued_sequence: 0,
            notifications: Vec::new(),
            next_notification_id: 1,
        }
    }

    /// Creates an idle controller for one of the console's list screens.
    pub fn for_screen(
        screen: ListScreen,
        fetcher: Arc<dyn ListFetcher>,
        page_size: PageSize,
    ) -> AppResult<Self> {
        Ok(Self::new(
            screen.as_str(),
            FilterExpressionCompiler::new(screen.filter_spec()?),
            fetcher,
            page_size,
        ))
    }

    /// Returns the current page for rendering.
    #[must_use]
    pub fn current_page(&self) -> PageSnapshot<'_> {
        let page_count = self.total.page_count(self.page_size);

        PageSnapshot {
            status: self.status,
            rows: &self.rows,
            page_index: self.page_index,
            page_size: self.page_size.get(),
            total: self.total,
            page_count,
            can_jump_to_page: page_count.is_some(),
            expression: self.expression.as_str(),
            notifications: &self.notifications,
        }
    }

    /// Returns the search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        self.search_term.as_str()
    }

    /// Returns the structured filter state.
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Updates the search term; fetches page 0 when the expression changed.
    pub fn set_search_term(&mut self, text: impl Into<String>) -> Option<PendingFetch> {
        self.search_term = text.into();
        self.recompile()
    }

    /// Replaces the structured filters; fetches page 0 when the expression changed.
    pub fn set_filters(&mut self, filters: FilterState) -> Option<PendingFetch> {
        self.filters = filters;
        self.recompile()
    }

    /// Changes the page size; fetches page 0 when it changed.
    pub fn set_page_size(&mut self, page_size: u32) -> AppResult<Option<PendingFetch>> {
        let page_size = PageSize::new(page_size)?;
        if page_size == self.page_size {
            return Ok(None);
        }

        self.page_size = page_size;
        Ok(Some(self.issue(0)))
    }

    /// Navigates to `page_index`, keeping the current inputs.
    ///
    /// Indexes past the last page are rejected when the total is known.
    pub fn request_page(&mut self, page_index: u32) -> AppResult<PendingFetch> {
        if let Some(page_count) = self.total.page_count(self.page_size)
            && u64::from(page_index) >= page_count
        {
            return Err(AppError::Validation(format!(
                "page {page_index} is out of range for {page_count} page(s)"
            )));
        }

        Ok(self.issue(page_index))
    }

    /// Refetches page 0 with the current inputs.
    pub fn refresh(&mut self) -> PendingFetch {
        self.issue(0)
    }

    /// Drops interest in every in-flight fetch, e.g. when leaving the screen.
    ///
    /// The status returns to whatever the last reconciled fetch left behind.
    pub fn abandon(&mut self) {
        self.issued_sequence += 1;
        self.status = self.settled_status;
    }

    /// Dismisses a notification; returns whether it existed.
    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|notification| notification.id != id);
        self.notifications.len() != before
    }

    /// Resolves a pending fetch and reconciles it.
    pub async fn run(&mut self, pending: PendingFetch) -> ApplyOutcome {
        let completion = pending.resolve().await;
        self.apply(completion)
    }

    /// Reconciles a completed fetch with the controller state.
    pub fn apply(&mut self, completion: FetchCompletion) -> ApplyOutcome {
        let FetchCompletion {
            sequence,
            request,
            result,
        } = completion;

        if sequence != self.issued_sequence {
            debug!(
                screen = %self.label,
                sequence,
                latest_sequence = self.issued_sequence,
                "discarding stale page fetch result"
            );
            return ApplyOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                self.accept_page(&request, page);
                ApplyOutcome::Loaded
            }
            Err(error) => {
                let kind = FetchErrorKind::classify(&error);
                warn!(
                    screen = %self.label,
                    sequence,
                    page_index = request.page_index,
                    error = %error,
                    "page fetch failed"
                );
                self.settle(LoadStatus::Failed(kind));
                if self.notifications.len() >= MAX_NOTIFICATIONS {
                    self.notifications.remove(0);
                }
                self.notifications.push(ConsoleNotification {
                    id: self.next_notification_id,
                    kind,
                    message: error.to_string(),
                });
                self.next_notification_id += 1;
                ApplyOutcome::Failed(kind)
            }
        }
    }

    fn recompile(&mut self) -> Option<PendingFetch> {
        let expression = self.compiler.compile(&self.search_term, &self.filters);
        if expression == self.expression {
            return None;
        }

        self.expression = expression;
        Some(self.issue(0))
    }

    fn issue(&mut self, page_index: u32) -> PendingFetch {
        self.issued_sequence += 1;
        self.status = LoadStatus::Loading;

        let request = PageRequest {
            page_index,
            page_size: self.page_size,
            expression: self.expression.clone(),
        };
        debug!(
            screen = %self.label,
            sequence = self.issued_sequence,
            page_index,
            page_size = self.page_size.get(),
            filter = %request.expression,
            "issuing page fetch"
        );

        PendingFetch {
            sequence: self.issued_sequence,
            request,
            fetcher: Arc::clone(&self.fetcher),
        }
    }

    fn accept_page(&mut self, request: &PageRequest, page: PageResult) {
        let PageResult {
            mut rows,
            total_count,
        } = page;

        let page_size = usize::try_from(request.page_size.get()).unwrap_or(usize::MAX);
        if rows.len() > page_size {
            warn!(
                screen = %self.label,
                returned = rows.len(),
                page_size,
                "backend returned more rows than requested; truncating"
            );
            rows.truncate(page_size);
        }

        let total = match total_count {
            Some(total) if !rows.is_empty() && request.offset() >= total => {
                warn!(
                    screen = %self.label,
                    total,
                    offset = request.offset(),
                    "backend total contradicts returned rows; treating total as unknown"
                );
                TotalCount::Unknown
            }
            Some(total) => TotalCount::Known(total),
            None => TotalCount::Unknown,
        };

        debug!(
            screen = %self.label,
            page_index = request.page_index,
            rows = rows.len(),
            total = ?total,
            "page loaded"
        );

        self.rows = rows;
        self.page_index = request.page_index;
        self.total = total;
        self.settle(LoadStatus::Loaded);
    }

    fn settle(&mut self, status: LoadStatus) {
        self.status = status;
        self.settled_status = status;
    }
}
