//! Prometheus metrics for the driftmail server.
//!
//! Exposes counters for mailbox and mail traffic. The `/metrics` endpoint is
//! unauthenticated for scraping; restrict it at the network level when the
//! server is reachable from the outside.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{self, Encoder, IntCounter, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static MAILBOXES_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "driftmail_mailboxes_created_total",
        "Total number of mailboxes created",
    )
    .expect("metric creation failed")
});

pub static EMAILS_RECEIVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "driftmail_emails_received_total",
        "Total number of inbound emails stored",
    )
    .expect("metric creation failed")
});

pub static EMAILS_SENT: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "driftmail_emails_sent_total",
        "Total number of emails accepted by the send API",
    )
    .expect("metric creation failed")
});

pub static SEND_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "driftmail_send_failures_total",
        "Total number of send attempts rejected upstream",
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry. Idempotent.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(MAILBOXES_CREATED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(EMAILS_RECEIVED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(EMAILS_SENT.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(SEND_FAILURES.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus text exposition.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}
