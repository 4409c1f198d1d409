// src/main.rs
use axum::http::{header, HeaderValue, Method};
use chrono::Duration;
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod clips;
mod common;
mod logging_middleware;
mod router;
mod services;
mod storage;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::tokens::TokenService;
use common::{AppConfig, AppState};
use services::CredentialService;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;
    info!(config = ?config, "Configuration loaded");

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let tokens = Arc::new(TokenService::new(
        &config.jwt_secret,
        Duration::hours(config.token_ttl_hours),
    )?);
    info!("TokenService initialized");

    let credentials = Arc::new(CredentialService::from_key(&config.encryption_key)?);
    info!("CredentialService initialized");

    // ========================================================================
    // STORAGE SETUP
    // ========================================================================

    let stores = storage::connect(&config).await?;

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = Arc::new(AppState {
        accounts: stores.accounts,
        clips: stores.clips,
        tokens,
        credentials,
        token_transport: config.token_transport,
    });

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = router::build_router(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
