//! Mock configurations for test fixtures.
//!
//! Re-exports the mock implementations from `authstate::adapters::mock` and
//! adds builders for the identity API responses the scenarios need.

pub use authstate::adapters::mock::{MockCookieStore, MockHttpClient, MockResponse, StoreOp};
pub use authstate::traits::{Headers, HttpClient, HttpError, Response};

use serde_json::json;

use super::{API_BASE, REFRESHED_ACCESS_TOKEN, REFRESHED_REFRESH_TOKEN};

/// Builder for a [`MockHttpClient`] speaking the identity API.
pub struct MockApiConfig {
    client: MockHttpClient,
}

impl MockApiConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// `GET /auth/validate-token` answers `{"valid": valid}`.
    pub fn with_validate(self, valid: bool) -> Self {
        self.client.set_response(
            &format!("{}/auth/validate-token", API_BASE),
            MockResponse::json(200, json!({ "valid": valid })),
        );
        self
    }

    /// `GET /auth/validate-token` answers with a bare status.
    pub fn with_validate_status(self, status: u16) -> Self {
        self.client.set_response(
            &format!("{}/auth/validate-token", API_BASE),
            MockResponse::status(status),
        );
        self
    }

    /// `POST /auth/refresh` issues the refreshed pair.
    pub fn with_refresh_success(self) -> Self {
        self.client.set_response(
            &format!("{}/auth/refresh", API_BASE),
            MockResponse::json(
                200,
                json!({
                    "access_token": REFRESHED_ACCESS_TOKEN,
                    "refresh_token": REFRESHED_REFRESH_TOKEN
                }),
            ),
        );
        self
    }

    /// `POST /auth/refresh` answers with an error status.
    pub fn with_refresh_status(self, status: u16) -> Self {
        self.client.set_response(
            &format!("{}/auth/refresh", API_BASE),
            MockResponse::json(status, json!({ "message": "Invalid refresh token" })),
        );
        self
    }

    /// `POST /auth/refresh` fails at the transport level.
    pub fn with_refresh_transport_error(self) -> Self {
        self.client.set_response(
            &format!("{}/auth/refresh", API_BASE),
            MockResponse::Error(HttpError::ConnectionFailed("connection refused".to_string())),
        );
        self
    }

    /// A downstream endpoint (path relative to the API base).
    pub fn with_endpoint(self, path: &str, response: MockResponse) -> Self {
        self.client
            .set_response(&format!("{}{}", API_BASE, path), response);
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self::new()
    }
}
