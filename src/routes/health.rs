//! Health check endpoints
//!
//! Provides endpoints for monitoring and container orchestration:
//! - `/health` - Full health check with provider status
//! - `/health/ready` - Readiness probe
//! - `/health/live` - Liveness probe

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{registry::Provider, AppState};

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Provider configuration check
#[derive(Debug, Serialize)]
pub struct ProviderCheck {
    pub configured: bool,
}

/// Provider checks collection
#[derive(Debug, Serialize)]
pub struct ProviderChecks {
    pub anthropic: ProviderCheck,
    pub google: ProviderCheck,
}

/// Application statistics
#[derive(Debug, Serialize)]
pub struct HealthStats {
    pub uptime_seconds: u64,
    pub supported_models: usize,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub checks: ProviderChecks,
    pub stats: HealthStats,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

fn provider_checks(state: &AppState) -> ProviderChecks {
    let check = |provider: Provider| ProviderCheck {
        configured: state.dispatcher.adapter(provider).is_configured(),
    };

    ProviderChecks {
        anthropic: check(Provider::Anthropic),
        google: check(Provider::Google),
    }
}

/// Every provider keyed is healthy, some keyed is degraded, none is unhealthy
fn overall_status(checks: &ProviderChecks) -> HealthStatus {
    match (checks.anthropic.configured, checks.google.configured) {
        (true, true) => HealthStatus::Healthy,
        (false, false) => HealthStatus::Unhealthy,
        _ => HealthStatus::Degraded,
    }
}

fn status_code(status: &HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Full health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let checks = provider_checks(&state);
    let status = overall_status(&checks);
    let uptime = state.start_time.elapsed().as_secs();

    let response = HealthResponse {
        status: status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
        stats: HealthStats {
            uptime_seconds: uptime,
            supported_models: state.dispatcher.registry().len(),
        },
    };

    (status_code(&status), Json(response))
}

/// Readiness probe endpoint
///
/// Ready as long as at least one provider can be called.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    let status = match overall_status(&provider_checks(&state)) {
        HealthStatus::Unhealthy => HealthStatus::Unhealthy,
        _ => HealthStatus::Healthy,
    };

    (status_code(&status), Json(SimpleHealthResponse { status }))
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
