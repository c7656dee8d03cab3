use async_trait::async_trait;
use rostrum_application::ListFetcher;
use rostrum_core::{AppError, AppResult};
use rostrum_domain::{ListScreen, PageRequest, PageResult};
use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::{HttpBackendConfig, server_error};

mod response;

/// REST implementation of the list-fetch port for one collection resource.
///
/// Issues `GET {base}/{resource}?page={index}&size={size}[&filter={expression}]`.
pub struct HttpListFetcher {
    http_client: reqwest::Client,
    config: HttpBackendConfig,
    resource_path: String,
}

impl HttpListFetcher {
    /// Creates a fetcher for an arbitrary collection path.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        config: HttpBackendConfig,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            config,
            resource_path: resource_path.into(),
        }
    }

    /// Creates a fetcher for one of the console's list screens.
    #[must_use]
    pub fn for_screen(
        http_client: reqwest::Client,
        config: HttpBackendConfig,
        screen: ListScreen,
    ) -> Self {
        Self::new(http_client, config, screen.resource_path())
    }
}

#[async_trait]
impl ListFetcher for HttpListFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> AppResult<PageResult> {
        let mut endpoint = self.config.endpoint(self.resource_path.as_str())?;
        {
            let mut query = endpoint.query_pairs_mut();
            query
                .append_pair("page", request.page_index.to_string().as_str())
                .append_pair("size", request.page_size.get().to_string().as_str());
            if !request.expression.is_empty() {
                query.append_pair("filter", request.expression.as_str());
            }
        }

        debug!(
            resource = %self.resource_path,
            page_index = request.page_index,
            page_size = request.page_size.get(),
            filter = %request.expression,
            "fetching list page"
        );

        let response = self
            .config
            .authorize(self.http_client.get(endpoint))
            .send()
            .await
            .map_err(|error| {
                AppError::Transport(format!(
                    "failed to call list endpoint '{}': {error}",
                    self.resource_path
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error = server_error(response).await;
            warn!(
                resource = %self.resource_path,
                status = status.as_u16(),
                error = %error,
                "list endpoint returned failure status"
            );
            return Err(error);
        }

        let body = response.json::<Value>().await.map_err(|error| {
            AppError::Transport(format!(
                "failed to parse list response body for '{}': {error}",
                self.resource_path
            ))
        })?;

        response::page_from_body(body)
    }
}
