//! SMS.ir remote client.
//!
//! Three operations over HTTP+JSON: credit balance, line list, bulk send.
//! [`SmsApi`] is the seam the UI and the command handlers program against;
//! [`SmsClient`] is the reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Credentials;
use crate::types::{ApiResponse, BulkSendRequest, SendReceipt};

/// Per-request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Classified failure of a remote call.
///
/// Carries rendered messages rather than the transport error so it can be
/// cloned into UI events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("failed to perform request: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("logical error: invalid request")]
    BadRequest,

    #[error("authentication error: invalid API key")]
    Unauthorized,

    #[error("rate limit exceeded: please wait a moment")]
    RateLimited,

    #[error("server error: unexpected error")]
    Server,

    #[error("unknown error with status code: {0}")]
    UnexpectedStatus(u16),

    #[error("API error: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Map an HTTP status to the service's error classes.
pub fn classify_status(status: StatusCode) -> Result<(), ApiError> {
    match status.as_u16() {
        200 => Ok(()),
        400 => Err(ApiError::BadRequest),
        401 => Err(ApiError::Unauthorized),
        429 => Err(ApiError::RateLimited),
        500 => Err(ApiError::Server),
        other => Err(ApiError::UnexpectedStatus(other)),
    }
}

/// The remote operations the application depends on.
#[async_trait]
pub trait SmsApi: Send + Sync {
    /// Current credit balance.
    async fn balance(&self) -> Result<f64, ApiError>;

    /// Sending lines available to the account.
    async fn lines(&self) -> Result<Vec<i64>, ApiError>;

    /// Queue one message to many recipients.
    async fn send_bulk(&self, request: &BulkSendRequest) -> Result<SendReceipt, ApiError>;
}

/// reqwest-backed [`SmsApi`].
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SmsClient {
    /// Build a client bound to the given credentials.
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("X-API-KEY", &self.api_key)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = builder.send().await?;
        classify_status(resp.status())?;

        let body: ApiResponse<T> = resp.json().await?;
        if !body.is_success() {
            tracing::debug!(status = body.status, message = %body.message, "request rejected");
            return Err(ApiError::Rejected(body.status_message()));
        }
        body.data
            .ok_or_else(|| ApiError::Decode("successful response without data".to_string()))
    }
}

#[async_trait]
impl SmsApi for SmsClient {
    async fn balance(&self) -> Result<f64, ApiError> {
        tracing::debug!("GET /credit");
        self.execute(self.request(reqwest::Method::GET, "/credit"))
            .await
    }

    async fn lines(&self) -> Result<Vec<i64>, ApiError> {
        tracing::debug!("GET /line");
        self.execute(self.request(reqwest::Method::GET, "/line"))
            .await
    }

    async fn send_bulk(&self, request: &BulkSendRequest) -> Result<SendReceipt, ApiError> {
        tracing::debug!(
            line = request.line_number,
            recipients = request.mobiles.len(),
            "POST /send/bulk"
        );
        self.execute(self.request(reqwest::Method::POST, "/send/bulk").json(request))
            .await
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> SmsClient {
        let creds = Credentials {
            api_key: "test-key".into(),
            line_number: "3000".into(),
            base_url: server.url(),
        };
        SmsClient::new(&creds).unwrap()
    }

    #[test]
    fn status_classes_match_service_contract() {
        assert_eq!(classify_status(StatusCode::OK), Ok(()));
        assert_eq!(classify_status(StatusCode::BAD_REQUEST), Err(ApiError::BadRequest));
        assert_eq!(classify_status(StatusCode::UNAUTHORIZED), Err(ApiError::Unauthorized));
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Err(ApiError::RateLimited)
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(ApiError::Server)
        );
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND),
            Err(ApiError::UnexpectedStatus(404))
        );
    }

    #[tokio::test]
    async fn balance_sends_api_key_and_returns_credit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/credit")
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_body(r#"{"status":1,"message":"ok","data":42.5}"#)
            .create_async()
            .await;

        let credit = client_for(&server).balance().await.unwrap();

        assert_eq!(credit, 42.5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn lines_returns_ordered_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/line")
            .with_status(200)
            .with_body(r#"{"status":1,"message":"ok","data":[3000,5000]}"#)
            .create_async()
            .await;

        let lines = client_for(&server).lines().await.unwrap();

        assert_eq!(lines, vec![3000, 5000]);
    }

    #[tokio::test]
    async fn unauthorized_is_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/credit")
            .with_status(401)
            .create_async()
            .await;

        let err = client_for(&server).balance().await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
    }

    #[tokio::test]
    async fn non_success_status_field_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/send/bulk")
            .with_status(200)
            .with_body(r#"{"status":0,"message":"nope","data":{"packId":"","messageIds":[],"cost":0}}"#)
            .create_async()
            .await;

        let req = BulkSendRequest::new(3000, "hi", vec!["0912".into()]);
        let err = client_for(&server).send_bulk(&req).await.unwrap_err();

        assert_eq!(err, ApiError::Rejected("Failed".into()));
        assert_eq!(err.to_string(), "API error: Failed");
    }

    #[tokio::test]
    async fn null_data_rejection_is_reported_for_every_endpoint() {
        let body = r#"{"status":0,"message":"invalid key","data":null}"#;
        let mut server = mockito::Server::new_async().await;
        for (method, path) in [("GET", "/credit"), ("GET", "/line"), ("POST", "/send/bulk")] {
            server
                .mock(method, path)
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;
        }
        let client = client_for(&server);
        let rejected = ApiError::Rejected("Failed".into());

        assert_eq!(client.balance().await.unwrap_err(), rejected);
        assert_eq!(client.lines().await.unwrap_err(), rejected);
        let req = BulkSendRequest::new(3000, "hi", vec!["0912".into()]);
        assert_eq!(client.send_bulk(&req).await.unwrap_err(), rejected);
    }

    #[tokio::test]
    async fn unknown_status_with_null_data_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/credit")
            .with_status(200)
            .with_body(r#"{"status":5,"data":null}"#)
            .create_async()
            .await;

        let err = client_for(&server).balance().await.unwrap_err();

        assert_eq!(err, ApiError::Rejected("Unknown status: 5".into()));
    }

    #[tokio::test]
    async fn success_without_data_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/line")
            .with_status(200)
            .with_body(r#"{"status":1,"message":"ok","data":null}"#)
            .create_async()
            .await;

        let err = client_for(&server).lines().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn send_bulk_posts_camel_case_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send/bulk")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"lineNumber":3000,"messageText":"hi","mobiles":["0912","0913"]}"#.into(),
            ))
            .with_status(200)
            .with_body(r#"{"status":1,"message":"ok","data":{"packId":"p1","messageIds":[1,2],"cost":2.0}}"#)
            .create_async()
            .await;

        let req = BulkSendRequest::new(3000, "hi", vec!["0912".into(), "0913".into()]);
        let receipt = client_for(&server).send_bulk(&req).await.unwrap();

        assert_eq!(receipt.pack_id, "p1");
        assert_eq!(receipt.message_ids, vec![1, 2]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/line")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = client_for(&server).lines().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }
}
