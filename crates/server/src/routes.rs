//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health check (unauthenticated for load balancers/probes)
        .route("/api/health", get(handlers::health_check))
        // Mailbox lifecycle
        .route(
            "/api/mailboxes",
            post(handlers::create_mailbox).get(handlers::list_mailboxes),
        )
        .route(
            "/api/mailboxes/{mailbox_id}",
            get(handlers::get_mailbox).delete(handlers::delete_mailbox),
        )
        // Email reads
        .route(
            "/api/mailboxes/{mailbox_id}/emails",
            get(handlers::list_emails),
        )
        .route("/api/emails/{email_id}", get(handlers::get_email))
        // Send via the transactional API
        .route("/api/emails/send", post(handlers::send_email))
        // Ingestion triggers: structured webhook and raw mail-routing event
        .route("/api/email/receive", post(handlers::receive_webhook))
        .route("/api/email/ingest", post(handlers::ingest_raw));

    let mut router = Router::new().merge(api_routes);

    // Conditionally add the metrics endpoint based on config. Restrict it at
    // the network level when the server is reachable from the outside.
    if state.config.server.metrics_enabled {
        router = router.merge(Router::new().route("/metrics", get(metrics_handler)));
    }

    // The frontend is plain static files; anything that is not an API route
    // falls through to it.
    if let Some(static_dir) = &state.config.server.static_dir {
        router = router
            .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true));
    }

    router
        // The browser frontend may be served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
