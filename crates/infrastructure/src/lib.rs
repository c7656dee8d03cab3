//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_client;
mod http_list_fetcher;
mod http_session_provider;

pub use http_client::HttpBackendConfig;
pub use http_list_fetcher::HttpListFetcher;
pub use http_session_provider::HttpSessionProvider;
