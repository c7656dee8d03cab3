//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod list_ports;
mod paged_query_controller;

pub use authorization_service::{
    AuthorizationConfig, AuthorizationService, BoundAuthorization, RowActions, is_authorized,
};
pub use list_ports::{ListFetcher, SessionProvider};
pub use paged_query_controller::{
    ApplyOutcome, ConsoleNotification, FetchCompletion, FetchErrorKind, LoadStatus, PageSnapshot,
    PagedQueryController, PendingFetch,
};
