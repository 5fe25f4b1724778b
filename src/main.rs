// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_renderer::ChartSpecRenderer;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::{load_panels_config, load_service_config};
use crate::infrastructure::registry::build_panels;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, get_panel, health_check, list_panels};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let service_config = load_service_config()?;
    let panels_config = load_panels_config()?;

    // Build panels (infrastructure + application layers)
    let renderer = Arc::new(ChartSpecRenderer::new());
    let panels = build_panels(&panels_config, &service_config.api, renderer)?;
    let dashboard_service = DashboardService::new(panels);

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/panels", get(list_panels))
        .route("/panels/:id", get(get_panel))
        .route("/dashboards/:portal", get(get_dashboard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = service_config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", service_config.server.listen))?;
    tracing::info!("Starting school-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
