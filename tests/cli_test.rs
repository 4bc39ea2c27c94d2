#[path = "common/mod.rs"]
mod common;

use common::PasteleriaTest;

// ============================================================================
// Input validation happens before any request
// ============================================================================

#[test]
fn test_invalid_price_is_rejected_before_config() {
    let app = PasteleriaTest::new();

    let stderr = app.run_failure(&["products", "price", "5", "abc"]);
    assert!(stderr.contains("invalid input"));
    assert!(!stderr.contains("backend.url"));
}

#[test]
fn test_invalid_departure_time() {
    let app = PasteleriaTest::new();

    let stderr = app.run_failure(&[
        "orders",
        "assign",
        "12",
        "--delivery",
        "4",
        "--departure",
        "25:99",
    ]);
    assert!(stderr.contains("invalid input"));
}

#[test]
fn test_create_product_requires_category() {
    let app = PasteleriaTest::new();

    let stderr = app.run_failure(&["products", "create", "--name", "Torta de chocolate"]);
    assert!(stderr.contains("category is required"));
}

#[test]
fn test_unknown_order_status_is_a_usage_error() {
    let app = PasteleriaTest::new();

    let output = app.run(&["orders", "status", "12", "PERDIDO"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_non_positive_id_is_rejected() {
    let app = PasteleriaTest::new();

    let output = app.run(&["orders", "show", "0"]);
    assert!(!output.status.success());
}

// ============================================================================
// Connection settings
// ============================================================================

#[test]
fn test_missing_backend_url() {
    let app = PasteleriaTest::new();

    let stderr = app.run_failure(&["orders", "ls"]);
    assert!(stderr.contains("backend.url is not set"));
}

#[test]
fn test_missing_api_key() {
    let app = PasteleriaTest::new();
    app.run_success(&["config", "set", "backend.url", "http://127.0.0.1:1"]);

    let stderr = app.run_failure(&["orders", "ls"]);
    assert!(stderr.contains("auth.api_key is not set"));
}

#[test]
fn test_unreachable_backend_is_transport_error() {
    let app = PasteleriaTest::new();
    app.run_success(&["config", "set", "backend.url", "http://127.0.0.1:1"]);
    app.run_success(&["config", "set", "auth.api_key", "anon-key"]);
    app.run_success(&["config", "set", "http.max_retries", "0"]);

    let stderr = app.run_failure(&["categories", "ls"]);
    assert!(stderr.contains("transport error"));
    assert!(!stderr.contains("anon-key"));
}
