//! Rostrum admin console list runtime.

#![forbid(unsafe_code)]

mod console_args;
mod console_config;

use std::sync::Arc;

use clap::Parser;
use rostrum_application::{
    ApplyOutcome, AuthorizationService, BoundAuthorization, PageSnapshot, PagedQueryController,
    RowActions, SessionProvider,
};
use rostrum_core::{AppError, AppResult};
use rostrum_domain::{FilterState, ListScreen, PageSize};
use rostrum_infrastructure::{HttpListFetcher, HttpSessionProvider};
use serde::Serialize;
use tracing::{info, warn};

use crate::console_args::ConsoleArgs;
use crate::console_config::{ConsoleConfig, init_tracing};

#[derive(Debug, Serialize)]
struct ListingOutput<'a> {
    screen: ListScreen,
    subject: Option<&'a str>,
    page: PageSnapshot<'a>,
    row_actions: Vec<RowActions>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = ConsoleArgs::parse();
    let config = ConsoleConfig::load()?;
    let backend = config.backend();
    let http_client = backend.build_client()?;

    let session_provider = HttpSessionProvider::new(http_client.clone(), backend.clone());
    let principal = session_provider.current_principal().await?;
    let authorization = AuthorizationService::new(config.authorization()).bind(principal);
    authorization.require(&[args.screen.capabilities().view])?;

    info!(
        screen = args.screen.as_str(),
        api_base_url = %config.api_base_url,
        gate_enabled = config.authorization_enabled,
        "rostrum-console started"
    );

    let page_size = match args.size {
        Some(size) => PageSize::new(size)?,
        None => config.page_size,
    };
    let fetcher = Arc::new(HttpListFetcher::for_screen(
        http_client,
        backend,
        args.screen,
    ));
    let mut controller = PagedQueryController::for_screen(args.screen, fetcher, page_size)?;

    // Only the last issued fetch is sent; earlier ones are superseded.
    if let Some(search) = args.search.as_deref() {
        let _ = controller.set_search_term(search);
    }
    let _ = controller.set_filters(parse_filters(args.screen, &args.filters)?);
    let pending = controller.request_page(args.page)?;

    let outcome = controller.run(pending).await;
    render(args.screen, &authorization, &controller)?;

    match outcome {
        ApplyOutcome::Loaded => Ok(()),
        ApplyOutcome::Failed(kind) => {
            let message = controller
                .current_page()
                .notifications
                .last()
                .map(|notification| notification.message.clone())
                .unwrap_or_default();
            warn!(screen = args.screen.as_str(), kind = ?kind, "list fetch failed");
            Err(AppError::Internal(format!(
                "{} list fetch failed: {message}",
                args.screen.as_str()
            )))
        }
        ApplyOutcome::Discarded => Err(AppError::Internal(
            "list fetch was superseded before it completed".to_owned(),
        )),
    }
}

fn parse_filters(screen: ListScreen, pairs: &[(String, String)]) -> AppResult<FilterState> {
    let spec = screen.filter_spec()?;
    let mut filters = FilterState::new();
    for (key, raw) in pairs {
        filters.set(key.as_str(), spec.parse_value(key, raw)?);
    }

    Ok(filters)
}

fn render(
    screen: ListScreen,
    authorization: &BoundAuthorization,
    controller: &PagedQueryController,
) -> AppResult<()> {
    let page = controller.current_page();
    let row_actions = page
        .rows
        .iter()
        .map(|row| authorization.row_actions(screen, row))
        .collect();
    let output = ListingOutput {
        screen,
        subject: authorization
            .principal()
            .map(|principal| principal.identity().subject()),
        page,
        row_actions,
    };

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|error| AppError::Internal(format!("failed to render listing: {error}")))?;
    println!("{rendered}");

    Ok(())
}
