//! Venue Claims - API Server Binary
//!
//! Starts the HTTP API for venue claim submission and review, backed by
//! PostgreSQL and a local evidence directory.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin venue-claims-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin venue-claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_DATABASE_URL` - PostgreSQL connection string (falls back to `DATABASE_URL`)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_EVIDENCE_ROOT` - Directory evidence files are written to
//! * `API_EVIDENCE_BASE_URL` - Public URL prefix of stored evidence
//! * `API_VENUE_MANAGE_BASE_URL` - Prefix of the link sent to approved owners

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::adapters::LocalEvidenceStore;
use domain_claims::{
    ClaimWorkflowEngine, LoggingDispatcher, OutboxDispatcher, Reconciler, WorkflowPorts,
};
use infra_db::{
    create_pool, run_migrations, DatabaseConfig, PostgresClaimAdapter,
    PostgresReconciliationAdapter, PostgresRelationshipAdapter, PostgresVenueAdapter,
};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting venue claims API server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("connecting to database")?;
    run_migrations(&pool).await.context("running migrations")?;

    let claims = Arc::new(PostgresClaimAdapter::new(pool.clone()));
    let venues = Arc::new(PostgresVenueAdapter::new(pool.clone()));
    let relationships = Arc::new(PostgresRelationshipAdapter::new(pool.clone()));
    let reconciliation = Arc::new(PostgresReconciliationAdapter::new(pool));

    let (notifier, outbox_worker) = OutboxDispatcher::new(
        config.notification_outbox_capacity,
        Arc::new(LoggingDispatcher),
    );
    let outbox = tokio::spawn(outbox_worker.run());

    let engine = ClaimWorkflowEngine::new(
        WorkflowPorts {
            claims: claims.clone(),
            venues: venues.clone(),
            relationships: relationships.clone(),
            evidence: Arc::new(LocalEvidenceStore::new(
                &config.evidence_root,
                config.evidence_base_url.clone(),
            )),
            notifier: Arc::new(notifier),
            reconciliation: reconciliation.clone(),
        },
        config.workflow_config(),
    );
    let reconciler = Reconciler::new(
        claims.clone(),
        venues.clone(),
        relationships.clone(),
        reconciliation.clone(),
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let state = AppState::new(engine, reconciler, config)
        .with_health_check(claims)
        .with_health_check(venues)
        .with_health_check(relationships)
        .with_health_check(reconciliation);
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    // The router owned the last outbox sender; let the worker flush what is queued.
    if let Err(e) = outbox.await {
        tracing::warn!(error = %e, "Notification outbox worker failed");
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads configuration from the environment, falling back to defaults
fn load_config() -> ApiConfig {
    let mut config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid API configuration ({e}), using defaults");
        ApiConfig::default()
    });

    if std::env::var("API_DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }

    config
}

fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
