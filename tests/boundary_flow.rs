//! Boundary flow integration tests
//!
//! End-to-end tests exercising the full gate over the HTTP surface with
//! the in-process echo vendor: invoke flow, raw filtering, policy
//! partitioning, validation errors, and the capability card.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docgate::api::{build_app, build_state};
use docgate::config::GateConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    let state = build_state(&GateConfig::default()).unwrap();
    build_app(state, &[])
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 256).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn invoke_body(text: &str, document_type: Option<&str>) -> Value {
    let mut parameters = json!({
        "text": text,
        "source_language": "es",
        "target_language": "en",
    });
    if let Some(dt) = document_type {
        parameters["document_type"] = json!(dt);
    }
    json!({ "capability": "translate_document", "parameters": parameters })
}

// ─── Invoke flow ─────────────────────────────────────────────────

#[tokio::test]
async fn test_invoke_masks_pii_before_the_vendor_sees_it() {
    let body = invoke_body("Solicitante con SSN 123-45-6789 y email ana.lopez@example.com", None);
    let (status, json) = post_json(test_app(), "/invoke", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");

    // The echo vendor returns exactly what crossed the boundary.
    let translated = json["result"]["translated_text"].as_str().unwrap();
    assert!(!translated.contains("123-45-6789"));
    assert!(!translated.contains("ana.lopez@example.com"));
    assert!(translated.contains("@example.com"), "domain survives email masking");

    assert_eq!(json["metadata"]["pii_masked"]["ssn"], 1);
    assert_eq!(json["metadata"]["pii_masked"]["email"], 1);
    assert_eq!(json["metadata"]["verification"]["isSafe"], true);
    assert_eq!(json["metadata"]["vendor"], "echo");
}

#[tokio::test]
async fn test_invoke_policy_keeps_allowed_categories_visible() {
    let body = invoke_body("Certificado: nacido el 15 de marzo, 1985", Some("birth_certificate"));
    let (_, json) = post_json(test_app(), "/invoke", body).await;

    let translated = json["result"]["translated_text"].as_str().unwrap();
    assert!(translated.contains("15 de marzo, 1985"));
    assert_eq!(json["metadata"]["pii_allowed"]["date_of_birth"], 1);
    assert_eq!(json["metadata"]["policy_applied"], "birth_certificate");
}

#[tokio::test]
async fn test_invoke_reports_derived_word_count_and_checks() {
    let body = invoke_body("uno dos tres cuatro", None);
    let (_, json) = post_json(test_app(), "/invoke", body).await;

    assert_eq!(json["result"]["word_count"], 4);
    assert_eq!(json["result"]["confidence"], 0.99);
    let checks = json["metadata"]["checks"].as_array().unwrap();
    assert_eq!(checks[0]["name"], "length_ratio");
    assert_eq!(checks[0]["passed"], true);
}

// ─── Validation at the boundary ──────────────────────────────────

#[tokio::test]
async fn test_unknown_capability_rejected_before_parameter_checks() {
    let body = json!({ "capability": "summarize_document", "parameters": {} });
    let (status, json) = post_json(test_app(), "/invoke", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"], "Unknown capability: summarize_document");
}

#[tokio::test]
async fn test_missing_parameters_all_listed() {
    let body = json!({
        "capability": "translate_document",
        "parameters": { "source_language": "es" }
    });
    let (_, json) = post_json(test_app(), "/invoke", body).await;

    assert_eq!(json["status"], "error");
    assert_eq!(
        json["error"],
        "Missing required parameters: text, target_language"
    );
}

#[tokio::test]
async fn test_oversized_text_fails_with_size_error() {
    let body = invoke_body(&"x".repeat(60_000), None);
    let (_, json) = post_json(test_app(), "/invoke", body).await;

    assert_eq!(json["status"], "error");
    assert_eq!(
        json["error"],
        "Text too long: 60000 characters. Maximum: 50000"
    );
}

#[tokio::test]
async fn test_unsupported_language_rejected() {
    let mut body = invoke_body("hola", None);
    body["parameters"]["target_language"] = json!("jp");
    let (_, json) = post_json(test_app(), "/invoke", body).await;

    assert_eq!(json["status"], "error");
    assert_eq!(json["error"], "Invalid target_language: jp");
}

// ─── Raw filter endpoint ─────────────────────────────────────────

#[tokio::test]
async fn test_filter_detect_mode_reports_counts_only() {
    let body = json!({
        "text": "DNI 123-45-6789-X, tel +34 91 555 1234",
        "mode": "detect"
    });
    let (_, json) = post_json(test_app(), "/api/v1/filter", body).await;

    assert_eq!(json["status"], "success");
    assert_eq!(json["categoryCounts"]["national_id"], 1);
    assert!(json.get("filteredText").is_none());
}

#[tokio::test]
async fn test_filter_mask_mode_verifies_output() {
    let body = json!({ "text": "passport ESP-123456789", "mode": "mask" });
    let (_, json) = post_json(test_app(), "/api/v1/filter", body).await;

    assert_eq!(json["status"], "success");
    assert_eq!(json["verification"]["isSafe"], true);
    assert!(!json["filteredText"].as_str().unwrap().contains("ESP-123456789"));
}

#[tokio::test]
async fn test_filter_verify_mode_flags_raw_pii() {
    let body = json!({ "text": "card 4111-1111-1111-1111", "mode": "verify" });
    let (_, json) = post_json(test_app(), "/api/v1/filter", body).await;

    assert_eq!(json["status"], "unsafe");
    assert!(json["verification"]["violationCount"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_filter_verify_mode_passes_clean_text() {
    let body = json!({ "text": "nothing sensitive here", "mode": "verify" });
    let (_, json) = post_json(test_app(), "/api/v1/filter", body).await;
    assert_eq!(json["status"], "safe");
}

// ─── Policy endpoint ─────────────────────────────────────────────

#[tokio::test]
async fn test_policy_partition_over_http() {
    let body = json!({
        "text": "Nacido el 15 de marzo, 1985. DNI: 123-45-6789-X",
        "documentType": "birth_certificate"
    });
    let (_, json) = post_json(test_app(), "/api/v1/policy/apply", body).await;

    let filtered = json["filteredText"].as_str().unwrap();
    assert!(filtered.contains("15 de marzo, 1985"));
    assert!(!filtered.contains("123-45-6789-X"));
    assert_eq!(json["allowedCounts"]["date_of_birth"], 1);
    assert_eq!(json["categoryCounts"]["national_id"], 1);
    assert_eq!(json["strict"], true);
}

#[tokio::test]
async fn test_policy_unknown_type_falls_back_to_general() {
    let body = json!({
        "text": "Nacido el 15 de marzo, 1985",
        "documentType": "grocery_list"
    });
    let (_, json) = post_json(test_app(), "/api/v1/policy/apply", body).await;

    assert_eq!(json["policyApplied"], "grocery_list");
    assert!(!json["filteredText"].as_str().unwrap().contains("15 de marzo, 1985"));
}

// ─── Discovery ───────────────────────────────────────────────────

#[tokio::test]
async fn test_card_advertises_what_the_validator_enforces() {
    let app = test_app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/.well-known/agent-card.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 64).await.unwrap();
    let card: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(card["capabilities"][0]["name"], "translate_document");
    assert_eq!(card["metadata"]["max_text_length"], 50_000);

    let langs = card["capabilities"][0]["parameters"]["properties"]["source_language"]["enum"]
        .as_array()
        .unwrap();
    assert_eq!(langs.len(), 9);

    // Every advertised language must actually pass validation.
    for lang in langs {
        let mut body = invoke_body("hola", None);
        body["parameters"]["source_language"] = lang.clone();
        let (_, json) = post_json(test_app(), "/invoke", body).await;
        assert_eq!(json["status"], "success", "advertised language rejected: {lang}");
    }
}
