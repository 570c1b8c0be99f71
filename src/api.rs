//! HTTP surface for the boundary gate.
//!
//! ## Endpoint Map
//!
//! | Route                            | Description                           |
//! |----------------------------------|---------------------------------------|
//! | `GET  /health`                   | Load balancer health probe            |
//! | `GET  /.well-known/agent-card.json` | Capability discovery document      |
//! | `POST /invoke`                   | Full boundary invocation              |
//! | `POST /api/v1/filter`            | Raw detect/mask/verify filter         |
//! | `POST /api/v1/policy/apply`      | Document-type policy filter           |

use crate::filter::SecurityFilter;
use crate::gateway::BoundaryGateway;
use crate::policy::PolicyEngine;
use crate::protocol::{capability_card, BoundaryRequest};
use axum::{
    extract::State,
    http::{header, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<BoundaryGateway>,
    pub filter: Arc<SecurityFilter>,
    pub policy: Arc<PolicyEngine>,
}

/// Build the complete docgate HTTP application
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/.well-known/agent-card.json", get(agent_card))
        .route("/invoke", post(invoke))
        .route("/api/v1/filter", post(filter_text))
        .route("/api/v1/policy/apply", post(apply_policy))
        .with_state(state)
        .layer(build_cors(cors_origins))
}

// =============================================================================
// Request types
// =============================================================================

fn default_verify() -> bool {
    true
}

/// Request body for the raw filter endpoint
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub text: String,
    pub mode: String,
    #[serde(default = "default_verify")]
    pub verify: bool,
}

/// Request body for the policy endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRequest {
    pub text: String,
    #[serde(default)]
    pub document_type: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn agent_card() -> impl IntoResponse {
    tracing::info!("Capability card requested");
    Json(capability_card())
}

/// POST /invoke — full boundary invocation.
///
/// Returns HTTP 200 for both success and error envelopes; protocol-level
/// failures are payload, not transport, errors.
async fn invoke(
    State(state): State<AppState>,
    Json(request): Json<BoundaryRequest>,
) -> impl IntoResponse {
    Json(state.gateway.invoke(request).await)
}

/// POST /api/v1/filter — policy-agnostic detect/mask/verify.
async fn filter_text(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> impl IntoResponse {
    Json(
        state
            .filter
            .apply_raw(&request.text, &request.mode, request.verify),
    )
}

/// POST /api/v1/policy/apply — filter under a document-type policy.
async fn apply_policy(
    State(state): State<AppState>,
    Json(request): Json<PolicyRequest>,
) -> impl IntoResponse {
    let document_type = request
        .document_type
        .as_deref()
        .unwrap_or(crate::protocol::DEFAULT_DOCUMENT_TYPE);
    Json(state.policy.apply(&request.text, document_type))
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}

// =============================================================================
// State construction
// =============================================================================

/// Build the application state from configuration.
pub fn build_state(config: &crate::config::GateConfig) -> crate::error::Result<AppState> {
    use crate::gateway::LengthRatioCheck;
    use crate::pii::{Detector, RuleSet, Verifier};
    use crate::policy::PolicyTable;
    use crate::vendor::{EchoVendor, HttpVendorClient, VendorClient};

    let rules = Arc::new(RuleSet::compile(&config.filter.rules)?);
    let detector = Detector::new(rules);
    let filter = Arc::new(SecurityFilter::new(
        detector.clone(),
        config.filter.verify_threshold,
    ));
    let policy = Arc::new(PolicyEngine::new(
        detector.clone(),
        PolicyTable::new(config.filter.policies.clone())?,
    ));

    let vendor: Arc<dyn VendorClient> = match &config.vendor.base_url {
        Some(url) => Arc::new(HttpVendorClient::new(config.vendor.name.clone(), url)),
        None => {
            tracing::info!("No vendor base_url configured, using in-process echo vendor");
            Arc::new(EchoVendor)
        }
    };

    let gateway = BoundaryGateway::new(policy.clone(), Verifier::new(detector), vendor)
        .with_checks(vec![Box::new(LengthRatioCheck {
            min: config.vendor.length_ratio_min,
            max: config.vendor.length_ratio_max,
        })]);

    Ok(AppState {
        gateway: Arc::new(gateway),
        filter,
        policy,
    })
}
