// ABOUTME: HTTP server bootstrap
// ABOUTME: Builds the router, spawns the outbox dispatcher, and serves

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use procura_api::ApiState;
use procura_auth::TokenSigner;
use procura_notify::{HttpMailer, Mailer, NullMailer, OutboxDispatcher, OutboxStorage};
use procura_storage::DbState;

use crate::config::Config;

async fn health() -> &'static str {
    "ok"
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let db = DbState::init_with_path(&config.database_path).await?;

    let signer = TokenSigner::new(config.auth_secret.as_bytes(), config.session_ttl_secs);
    let state = ApiState::new(
        db.clone(),
        signer,
        config.reset_ttl_secs,
        config.frontend_url.clone(),
    );

    // Mail goes through the outbox; the dispatcher owns delivery
    let mailer: Arc<dyn Mailer> = match &config.mail_endpoint {
        Some(endpoint) => {
            info!("Using HTTP mailer: {}", endpoint);
            Arc::new(HttpMailer::new(endpoint.clone(), config.mail_from.clone()))
        }
        None => {
            info!("No mail endpoint configured; outbound mail will be logged and dropped");
            Arc::new(NullMailer)
        }
    };
    OutboxDispatcher::new(
        OutboxStorage::new(db.pool.clone()),
        mailer,
        Duration::from_secs(config.outbox_poll_secs),
    )
    .spawn();

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .merge(procura_api::create_router(state))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Procura listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
