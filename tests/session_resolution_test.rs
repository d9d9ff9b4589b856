//! Integration tests for session resolution.
//!
//! These tests drive whole cycles against the mock transport and the
//! recording cookie store:
//! - The validate → refresh → fail cascade and its messages
//! - Per-cycle memoization, including concurrent callers
//! - clear() and the 401 handling of authenticated_fetch
//! - Token write atomicity when the store fails mid-refresh

mod common;

use authstate::auth::{AuthOutcome, AuthState, FetchOptions, UnauthenticatedReason};
use authstate::traits::Method;
use common::*;
use serde_json::json;

// ============================================================================
// The cascade
// ============================================================================

#[tokio::test]
async fn test_valid_access_token_skips_refresh() {
    let mock = MockApiConfig::new()
        .with_validate(true)
        .with_refresh_success()
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());
    let state = cycle.resolve().await;

    assert_eq!(
        state,
        AuthState {
            is_authenticated: true,
            message: "Success validation!".to_string()
        }
    );
    assert_eq!(mock.count_requests_to("/auth/validate-token"), 1);
    assert_eq!(mock.count_requests_to("/auth/refresh"), 0);
    assert!(store.is_untouched());
}

#[tokio::test]
async fn test_expired_access_with_valid_refresh() {
    let mock = MockApiConfig::new()
        .with_validate(false)
        .with_refresh_success()
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());
    let state = cycle.resolve().await;

    assert!(state.is_authenticated);
    assert_eq!(state.message, "Success validation!");
    assert_eq!(store.value("access_token"), Some(REFRESHED_ACCESS_TOKEN.to_string()));
    assert_eq!(store.value("refresh_token"), Some(REFRESHED_REFRESH_TOKEN.to_string()));

    let refresh = mock
        .get_requests()
        .into_iter()
        .find(|r| r.url.ends_with("/auth/refresh"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(refresh.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "refresh_token": STORED_REFRESH_TOKEN }));
}

#[tokio::test]
async fn test_validation_401_falls_back_to_refresh() {
    let mock = MockApiConfig::new()
        .with_validate_status(401)
        .with_refresh_success()
        .build();

    let cycle = resolver_for(&mock).begin(store_with_pair());
    assert_eq!(cycle.outcome().await, AuthOutcome::Refreshed);
}

#[tokio::test]
async fn test_no_tokens_makes_no_network_calls() {
    let mock = MockApiConfig::new().build();
    let store = MockCookieStore::new();

    let cycle = resolver_for(&mock).begin(store.clone());
    let state = cycle.resolve().await;

    assert_eq!(
        state,
        AuthState {
            is_authenticated: false,
            message: "The token does not exist.".to_string()
        }
    );
    assert!(mock.get_requests().is_empty());
    assert!(store.is_untouched());
}

#[tokio::test]
async fn test_access_without_refresh_token_and_invalid_access() {
    let mock = MockApiConfig::new().with_validate(false).build();
    let store = MockCookieStore::with_entries(&[("access_token", STORED_ACCESS_TOKEN)]);

    let cycle = resolver_for(&mock).begin(store);
    let state = cycle.resolve().await;

    assert_eq!(state.message, "The token does not exist.");
    assert_eq!(mock.count_requests_to("/auth/refresh"), 0);
}

#[tokio::test]
async fn test_invalid_refresh_leaves_store_unmodified() {
    let mock = MockApiConfig::new()
        .with_validate(false)
        .with_refresh_status(401)
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());
    let state = cycle.resolve().await;

    assert_eq!(
        state,
        AuthState {
            is_authenticated: false,
            message: "Refresh token expired or invalid.".to_string()
        }
    );
    assert!(store.is_untouched());
    assert_eq!(store.value("access_token"), Some(STORED_ACCESS_TOKEN.to_string()));
    assert_eq!(store.value("refresh_token"), Some(STORED_REFRESH_TOKEN.to_string()));
}

#[tokio::test]
async fn test_refresh_with_empty_tokens_is_rejection() {
    let mock = MockApiConfig::new()
        .with_validate(false)
        .with_endpoint(
            "/auth/refresh",
            MockResponse::json(200, json!({"access_token": "", "refresh_token": ""})),
        )
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());

    assert_eq!(
        cycle.outcome().await,
        AuthOutcome::Unauthenticated(UnauthenticatedReason::RefreshRejected)
    );
    assert!(store.is_untouched());
    assert_eq!(store.value("refresh_token"), Some(STORED_REFRESH_TOKEN.to_string()));
}

#[tokio::test]
async fn test_refresh_transport_error_is_rejection() {
    let mock = MockApiConfig::new().with_refresh_transport_error().build();
    let store = store_with_refresh_only();

    let cycle = resolver_for(&mock).begin(store.clone());
    assert_eq!(
        cycle.outcome().await,
        AuthOutcome::Unauthenticated(UnauthenticatedReason::RefreshRejected)
    );
    assert!(store.is_untouched());
}

#[tokio::test]
async fn test_refresh_only_store_self_heals() {
    let mock = MockApiConfig::new()
        .with_refresh_success()
        .with_validate(true)
        .build();
    let store = store_with_refresh_only();

    let cycle = resolver_for(&mock).begin(store.clone());
    assert!(cycle.resolve().await.is_authenticated);
    assert_eq!(mock.count_requests_to("/auth/validate-token"), 0);
    assert_eq!(store.value("access_token"), Some(REFRESHED_ACCESS_TOKEN.to_string()));

    // The next cycle validates the healed pair
    let next = resolver_for(&mock).begin(store.clone());
    assert_eq!(next.outcome().await, AuthOutcome::Validated);
    let validate = mock
        .get_requests()
        .into_iter()
        .find(|r| r.url.ends_with("/auth/validate-token"))
        .unwrap();
    assert_eq!(
        validate.headers.get("Authorization"),
        Some(&format!("Bearer {}", REFRESHED_ACCESS_TOKEN))
    );
}

// ============================================================================
// Memoization
// ============================================================================

#[tokio::test]
async fn test_two_resolves_share_one_round_of_calls() {
    let mock = MockApiConfig::new()
        .with_validate(false)
        .with_refresh_success()
        .build();

    let cycle = resolver_for(&mock).begin(store_with_pair());
    let first = cycle.resolve().await;
    let second = cycle.resolve().await;

    assert_eq!(first, second);
    assert_eq!(mock.count_requests_to("/auth/validate-token"), 1);
    assert_eq!(mock.count_requests_to("/auth/refresh"), 1);
}

#[tokio::test]
async fn test_concurrent_resolves_share_one_computation() {
    let mock = MockApiConfig::new()
        .with_validate(false)
        .with_refresh_success()
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());
    let (a, b, c) = tokio::join!(cycle.resolve(), cycle.resolve(), cycle.resolve());

    assert!(a.is_authenticated && b.is_authenticated && c.is_authenticated);
    assert_eq!(mock.count_requests_to("/auth/refresh"), 1);
    assert_eq!(store.writes().len(), 2);
}

#[tokio::test]
async fn test_new_cycle_starts_cold() {
    let mock = MockApiConfig::new().with_validate(true).build();
    let store = store_with_pair();
    let resolver = resolver_for(&mock);

    resolver.begin(store.clone()).resolve().await;
    resolver.begin(store.clone()).resolve().await;

    assert_eq!(mock.count_requests_to("/auth/validate-token"), 2);
}

#[tokio::test]
async fn test_new_cycle_sees_changed_store() {
    let mock = MockApiConfig::new().with_validate(true).build();
    let store = store_with_pair();
    let resolver = resolver_for(&mock);

    assert!(resolver.begin(store.clone()).resolve().await.is_authenticated);

    // Credentials removed out of band between cycles
    let empty = MockCookieStore::new();
    assert!(!resolver.begin(empty).resolve().await.is_authenticated);
}

// ============================================================================
// clear() and is_logged_in()
// ============================================================================

#[tokio::test]
async fn test_clear_removes_both_tokens() {
    let mock = MockApiConfig::new().with_validate(true).build();
    let store = store_with_pair();
    let resolver = resolver_for(&mock);

    let cycle = resolver.begin(store.clone());
    assert!(cycle.resolve().await.is_authenticated);
    cycle.clear().await;

    assert_eq!(store.value("access_token"), None);
    assert_eq!(store.value("refresh_token"), None);
    assert!(!cycle.resolve().await.is_authenticated);

    let next = resolver.begin(store.clone());
    assert_eq!(
        next.resolve().await,
        AuthState::unauthenticated(UnauthenticatedReason::MissingToken)
    );
}

#[tokio::test]
async fn test_is_logged_in_is_presence_only() {
    // Validation would reject the token, but is_logged_in never asks.
    let mock = MockApiConfig::new().with_validate(false).build();
    let store = MockCookieStore::with_entries(&[("access_token", "revoked")]);

    let cycle = resolver_for(&mock).begin(store);
    assert!(cycle.is_logged_in().await);
    assert!(mock.get_requests().is_empty());

    let cycle = resolver_for(&mock).begin(MockCookieStore::new());
    assert!(!cycle.is_logged_in().await);
}

// ============================================================================
// authenticated_fetch
// ============================================================================

#[tokio::test]
async fn test_fetch_attaches_bearer_token() {
    let mock = MockApiConfig::new()
        .with_validate(true)
        .with_endpoint("/boards", MockResponse::json(200, json!([{"id": 1, "title": "General"}])))
        .build();

    let cycle = resolver_for(&mock).begin(store_with_pair());
    let response = cycle
        .authenticated_fetch("/boards", FetchOptions::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let boards: serde_json::Value = response.json().unwrap();
    assert_eq!(boards[0]["title"], "General");

    let request = mock.get_requests().pop().unwrap();
    assert_eq!(
        request.headers.get("Authorization"),
        Some(&format!("Bearer {}", STORED_ACCESS_TOKEN))
    );
}

#[tokio::test]
async fn test_fetch_401_clears_and_returns_none() {
    let mock = MockApiConfig::new()
        .with_validate(true)
        .with_endpoint("/posts", MockResponse::status(401))
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());
    let response = cycle
        .authenticated_fetch(
            "/posts",
            FetchOptions::json(Method::Post, &json!({"title": "Hello", "content": "World"})),
        )
        .await;

    assert!(response.is_none());
    assert_eq!(store.value("access_token"), None);
    assert_eq!(store.value("refresh_token"), None);
    assert_eq!(
        cycle.resolve().await,
        AuthState::unauthenticated(UnauthenticatedReason::MissingToken)
    );
}

#[tokio::test]
async fn test_fetch_when_unauthenticated_sends_nothing() {
    let mock = MockApiConfig::new()
        .with_refresh_status(401)
        .with_endpoint("/boards", MockResponse::status(200))
        .build();

    let cycle = resolver_for(&mock).begin(store_with_refresh_only());
    assert!(cycle
        .authenticated_fetch("/boards", FetchOptions::new())
        .await
        .is_none());
    assert_eq!(mock.count_requests_to("/boards"), 0);
}

#[tokio::test]
async fn test_fetch_server_error_is_returned() {
    let mock = MockApiConfig::new()
        .with_validate(true)
        .with_endpoint("/posts", MockResponse::json(500, json!({"message": "boom"})))
        .build();
    let store = store_with_pair();

    let cycle = resolver_for(&mock).begin(store.clone());
    let response = cycle
        .authenticated_fetch("/posts", FetchOptions::new())
        .await
        .unwrap();

    assert_eq!(response.status, 500);
    assert!(store.is_untouched());
}

// ============================================================================
// Write atomicity
// ============================================================================

#[tokio::test]
async fn test_partial_write_is_rolled_back() {
    let mock = MockApiConfig::new()
        .with_validate(false)
        .with_refresh_success()
        .build();
    let store = store_with_pair();
    store.fail_set_for("refresh_token");

    let cycle = resolver_for(&mock).begin(store.clone());
    // The API did issue a pair, so this cycle is authenticated.
    assert!(cycle.resolve().await.is_authenticated);

    // But the store never ends up holding a mixed pair.
    assert_eq!(store.value("access_token"), Some(STORED_ACCESS_TOKEN.to_string()));
    assert_eq!(store.value("refresh_token"), Some(STORED_REFRESH_TOKEN.to_string()));
}
