//! Integration tests for the Fara'id engine.
//!
//! This test suite drives the HTTP router end to end and covers:
//! - The reference scenarios (radd, residue, awl, lone grandson)
//! - Blocking and count-based exclusion
//! - Father taking a fixed share plus the residue
//! - Bequest cap and estate deductions
//! - The heir catalogue endpoint
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use faraid_engine::api::{AppState, create_router};
use faraid_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn create_request(gender: &str, heirs: &[(&str, u32)], gross_value: &str) -> Value {
    let heirs: Vec<Value> = heirs
        .iter()
        .map(|(category, count)| json!({ "category": category, "count": count }))
        .collect();

    json!({
        "deceased": { "gender": gender },
        "heirs": heirs,
        "estate": {
            "gross_value": gross_value,
            "currency": "USD"
        }
    })
}

fn share<'a>(response: &'a Value, category: &str) -> &'a Value {
    response["result"]["heir_shares"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["heir"]["category"] == category)
        .unwrap_or_else(|| panic!("no share for {}", category))
}

fn amount(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap())
}

fn assert_amount(value: &Value, expected: &str) {
    assert_eq!(
        amount(value),
        decimal(expected),
        "Expected amount {}, got {}",
        expected,
        value
    );
}

// =============================================================================
// Reference scenarios
// =============================================================================

/// SC-001: husband and daughter; the daughter receives the surplus by radd.
#[tokio::test]
async fn test_husband_and_daughter_radd() {
    let router = create_router_for_test();
    let body = create_request("female", &[("husband", 1), ("daughter", 1)], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(share(&response, "husband")["fraction"], "1/4");
    assert_eq!(share(&response, "daughter")["fraction"], "3/4");
    assert_amount(&share(&response, "husband")["amount"], "250");
    assert_amount(&share(&response, "daughter")["amount"], "750");
    assert_eq!(response["result"]["radd_applied"], true);
    assert_eq!(response["result"]["awl_applied"], false);
    assert_amount(&response["result"]["remainder"], "0");
}

/// SC-002: wife and two sons; the sons split the residue.
#[tokio::test]
async fn test_wife_and_two_sons() {
    let router = create_router_for_test();
    let body = create_request("male", &[("wife", 1), ("son", 2)], "16000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(share(&response, "wife")["fraction"], "1/8");
    let sons = share(&response, "son");
    assert_eq!(sons["fraction"], "7/16");
    assert_eq!(sons["is_per_person"], true);
    assert_eq!(sons["basis"], "residuary");
    assert_amount(&sons["amount"], "14000");
    assert_amount(&sons["amount_per_person"], "7000");
    assert_eq!(response["result"]["common_denominator"], "16");
}

/// SC-003: father, mother and son.
#[tokio::test]
async fn test_father_mother_and_son() {
    let router = create_router_for_test();
    let body = create_request("male", &[("father", 1), ("mother", 1), ("son", 1)], "6000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(share(&response, "father")["fraction"], "1/6");
    assert_eq!(share(&response, "mother")["fraction"], "1/6");
    assert_eq!(share(&response, "son")["fraction"], "2/3");
    assert_amount(&share(&response, "son")["amount"], "4000");
    assert_amount(&response["result"]["total_distributed"], "6000");
}

/// SC-004: husband and two full sisters; awl scales the shares to sevenths.
#[tokio::test]
async fn test_husband_and_two_full_sisters_awl() {
    let router = create_router_for_test();
    let body = create_request("female", &[("husband", 1), ("full_sister", 2)], "7000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"]["awl_applied"], true);
    assert_eq!(share(&response, "husband")["fraction"], "3/7");
    let sisters = share(&response, "full_sister");
    assert_eq!(sisters["fraction"], "4/7");
    assert_eq!(sisters["is_per_person"], false);
    assert_amount(&sisters["amount"], "4000");
    assert_amount(&sisters["amount_per_person"], "2000");
    assert_eq!(response["result"]["common_denominator"], "7");

    let notes = response["result"]["notes"].as_array().unwrap();
    assert!(notes.iter().any(|n| n.as_str().unwrap().contains("Awl")));
}

/// SC-005: a lone son's son takes the whole estate.
#[tokio::test]
async fn test_lone_grandson() {
    let router = create_router_for_test();
    let body = create_request("male", &[("grandson", 1)], "2500.50");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(share(&response, "grandson")["fraction"], "1");
    assert_amount(&share(&response, "grandson")["amount"], "2500.50");
    assert!(response["result"]["blocked_heirs"].as_array().unwrap().is_empty());
}

// =============================================================================
// Blocking and rule interactions
// =============================================================================

#[tokio::test]
async fn test_blocked_heirs_listed_with_reason() {
    let router = create_router_for_test();
    let body = create_request(
        "male",
        &[
            ("father", 1),
            ("grandfather", 1),
            ("full_brother", 2),
            ("maternal_half_sister", 1),
            ("mother", 1),
        ],
        "1200",
    );

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    let blocked = response["result"]["blocked_heirs"].as_array().unwrap();
    assert_eq!(blocked.len(), 3);
    for entry in blocked {
        assert_eq!(entry["blocked_by"], "father");
        assert!(!entry["reason"].as_str().unwrap().is_empty());
    }
    // Blocked brothers still reduce the mother to 1/6.
    assert_eq!(share(&response, "mother")["fraction"], "1/6");
    assert_eq!(share(&response, "father")["fraction"], "5/6");
}

#[tokio::test]
async fn test_two_daughters_exclude_sons_daughters() {
    let router = create_router_for_test();
    let body = create_request("male", &[("daughter", 2), ("granddaughter", 1), ("full_brother", 1)], "900");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    let blocked = response["result"]["blocked_heirs"].as_array().unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0]["heir"]["category"], "granddaughter");
    assert_eq!(share(&response, "daughter")["fraction"], "2/3");
    assert_eq!(share(&response, "full_brother")["fraction"], "1/3");
}

#[tokio::test]
async fn test_father_with_daughter_takes_fixed_and_residue() {
    let router = create_router_for_test();
    let body = create_request("male", &[("father", 1), ("daughter", 1)], "600");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    let father = share(&response, "father");
    assert_eq!(father["fraction"], "1/2");
    assert_eq!(father["basis"], "fixed_and_residuary");
    assert_eq!(share(&response, "daughter")["fraction"], "1/2");
    assert_eq!(response["result"]["radd_applied"], false);
}

#[tokio::test]
async fn test_sons_and_daughters_share_two_to_one() {
    let router = create_router_for_test();
    let body = create_request("female", &[("son", 2), ("daughter", 1)], "5000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(share(&response, "son")["fraction"], "2/5");
    assert_eq!(share(&response, "daughter")["fraction"], "1/5");
    assert_amount(&share(&response, "son")["amount_per_person"], "2000");
    assert_amount(&share(&response, "daughter")["amount"], "1000");
}

#[tokio::test]
async fn test_maternal_half_siblings_share_per_head() {
    let router = create_router_for_test();
    let body = create_request(
        "male",
        &[
            ("mother", 1),
            ("maternal_half_brother", 1),
            ("maternal_half_sister", 2),
            ("full_brother", 1),
        ],
        "1800",
    );

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(share(&response, "maternal_half_brother")["fraction"], "1/9");
    assert_eq!(share(&response, "maternal_half_sister")["fraction"], "1/9");
    assert_amount(&share(&response, "maternal_half_sister")["amount"], "400");
    // Mother 1/6, maternal siblings 1/3, brother takes the remaining 1/2.
    assert_eq!(share(&response, "full_brother")["fraction"], "1/2");
}

#[tokio::test]
async fn test_bequest_capped_at_one_third() {
    let router = create_router_for_test();
    let body = json!({
        "deceased": { "gender": "male" },
        "heirs": [{ "category": "son", "count": 1 }],
        "estate": {
            "gross_value": "120000",
            "debts": "15000",
            "funeral_expenses": "5000",
            "requested_bequest": "50000",
            "currency": "USD"
        }
    });

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&response["result"]["deduction_base"], "100000");
    assert_amount(&response["result"]["bequest"], "33333.33");
    assert_amount(&response["result"]["net_estate"], "66666.67");
    assert_amount(&share(&response, "son")["amount"], "66666.67");
}

#[tokio::test]
async fn test_empty_heir_set_is_valid() {
    let router = create_router_for_test();
    let body = create_request("female", &[], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["result"]["heir_shares"].as_array().unwrap().is_empty());
    assert_amount(&response["result"]["remainder"], "1000");
}

#[tokio::test]
async fn test_response_envelope_and_audit_trace() {
    let router = create_router_for_test();
    let body = create_request("male", &[("wife", 2), ("mother", 1)], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["calculation_id"].is_string());
    assert!(response["timestamp"].is_string());
    assert_eq!(response["engine_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(response["result"]["rule_set"], "classical_sunni");

    let steps = response["result"]["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps[0]["rule_id"], "estate_deductions");
    assert!(steps.iter().any(|s| s["rule_id"] == "radd"));
    assert!(steps.iter().all(|s| s["reference"].is_string()));
}

// =============================================================================
// Heir catalogue
// =============================================================================

#[tokio::test]
async fn test_heir_categories_endpoint() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/heir-categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 16);
    assert_eq!(categories[0]["code"], "husband");
    let wife = categories.iter().find(|c| c["code"] == "wife").unwrap();
    assert_eq!(wife["max_count"], 4);
    assert_eq!(wife["group"], "spouse");
    assert_eq!(json["rule_set"]["code"], "classical_sunni");
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_unknown_heir_category_returns_400() {
    let router = create_router_for_test();
    let body = create_request("male", &[("uncle", 1)], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "UNKNOWN_HEIR_CATEGORY");
    assert!(response["message"].as_str().unwrap().contains("uncle"));
}

#[tokio::test]
async fn test_count_above_maximum_returns_400() {
    let router = create_router_for_test();
    let body = create_request("male", &[("wife", 5)], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_HEIR");
}

#[tokio::test]
async fn test_spouse_inconsistent_with_deceased_returns_400() {
    let router = create_router_for_test();
    let body = create_request("male", &[("husband", 1)], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_HEIR");
}

#[tokio::test]
async fn test_duplicate_category_returns_400() {
    let router = create_router_for_test();
    let body = create_request("male", &[("son", 1), ("son", 2)], "1000");

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_HEIR");
}

#[tokio::test]
async fn test_negative_estate_returns_400() {
    let router = create_router_for_test();
    let body = json!({
        "deceased": { "gender": "male" },
        "heirs": [{ "category": "son", "count": 1 }],
        "estate": { "gross_value": "1000", "debts": "-5", "currency": "USD" }
    });

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "INVALID_ESTATE");
}

#[tokio::test]
async fn test_missing_estate_returns_validation_error() {
    let router = create_router_for_test();
    let body = json!({
        "deceased": { "gender": "male" },
        "heirs": []
    });

    let (status, response) = post_calculate(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(json["code"], "MALFORMED_JSON");
}
