//! Platform API client — the single point of entry for all HTTP calls to the
//! resume platform.
//!
//! ARCHITECTURAL RULE: no other module may talk to the platform directly.
//! Every call is fire-once: no retry, no backoff, no client-side timeout
//! policy. Callers decide the fallback (redirect to login, show a banner,
//! surface through the sync status).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthStore;
use crate::models::resume::{Resume, ResumeContent, ResumeCreate, ResumeUpdate, ResumeVersion};
use crate::models::user::{LoginRequest, RegisterRequest, TokenResponse, User};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// The content-update seam the sync controller is driven through, so it can
/// be tested against a recording double.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn put_content(
        &self,
        resume_id: Uuid,
        content: &ResumeContent,
    ) -> Result<Resume, ApiError>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthStore>,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Arc<AuthStore>) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Builds a request with the bearer token attached when one is present.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.auth.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn handle<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("API call failed with {status}: {body}");
        match status.as_u16() {
            401 => Err(ApiError::Unauthorized),
            404 => Err(ApiError::NotFound(parse_error_message(&body))),
            code => Err(ApiError::Api {
                status: code,
                message: parse_error_message(&body),
            }),
        }
    }

    /// POST /api/v1/auth/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let response = self
            .request(Method::POST, "/api/v1/auth/register")
            .json(request)
            .send()
            .await?;
        self.handle(response).await
    }

    /// POST /api/v1/auth/login
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        let response = self
            .request(Method::POST, "/api/v1/auth/login")
            .json(request)
            .send()
            .await?;
        self.handle(response).await
    }

    /// GET /api/v1/resumes/
    pub async fn list_resumes(&self) -> Result<Vec<Resume>, ApiError> {
        let response = self.request(Method::GET, "/api/v1/resumes/").send().await?;
        self.handle(response).await
    }

    /// POST /api/v1/resumes/
    pub async fn create_resume(&self, request: &ResumeCreate) -> Result<Resume, ApiError> {
        let response = self
            .request(Method::POST, "/api/v1/resumes/")
            .json(request)
            .send()
            .await?;
        self.handle(response).await
    }

    /// GET /api/v1/resumes/{id}
    pub async fn get_resume(&self, id: Uuid) -> Result<Resume, ApiError> {
        let response = self
            .request(Method::GET, &format!("/api/v1/resumes/{id}"))
            .send()
            .await?;
        self.handle(response).await
    }

    /// PUT /api/v1/resumes/{id}
    pub async fn update_resume(&self, id: Uuid, request: &ResumeUpdate) -> Result<Resume, ApiError> {
        let response = self
            .request(Method::PUT, &format!("/api/v1/resumes/{id}"))
            .json(request)
            .send()
            .await?;
        self.handle(response).await
    }

    /// GET /api/v1/resumes/{id}/versions
    pub async fn list_versions(&self, id: Uuid) -> Result<Vec<ResumeVersion>, ApiError> {
        let response = self
            .request(Method::GET, &format!("/api/v1/resumes/{id}/versions"))
            .send()
            .await?;
        self.handle(response).await
    }
}

#[async_trait]
impl ResumeStore for ApiClient {
    async fn put_content(
        &self,
        resume_id: Uuid,
        content: &ResumeContent,
    ) -> Result<Resume, ApiError> {
        self.update_resume(resume_id, &ResumeUpdate::content(content.clone()))
            .await
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    detail: serde_json::Value,
}

#[derive(Deserialize)]
struct ValidationItem {
    msg: String,
}

/// Extracts a human-readable message from a platform error payload.
/// `detail` is either a plain string or, for 422 validation failures, a list
/// of objects carrying a `msg` field. Anything else falls back to a static
/// string.
fn parse_error_message(body: &str) -> String {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return "Request failed".to_string();
    };

    match envelope.detail {
        serde_json::Value::String(message) => message,
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<ValidationItem>(item).ok())
                .map(|item| item.msg)
                .collect();
            if messages.is_empty() {
                "Request failed".to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => "Request failed".to_string(),
    }
}
