//! HTTP client for the hosted backend
//!
//! Speaks the two surfaces the backend exposes: the table/RPC REST API under
//! `/rest/v1` and the auth API under `/auth/v1`. Every request carries the
//! public API key; the bearer is the member's access token when signed in,
//! otherwise the API key itself.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::auth::SessionStore;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const REST_PREFIX: &str = "rest/v1";
const AUTH_PREFIX: &str = "auth/v1";

/// Header carrying the per-attempt submission key
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Error body returned by the backend.
///
/// The REST API answers `{code, message, details, hint}`; the auth API uses
/// `error_description`, `msg` or `error` depending on the endpoint.
#[derive(Debug, Default, serde::Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl BackendErrorBody {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.msg.clone())
            .or_else(|| self.error.clone())
    }

    fn code(&self) -> Option<String> {
        self.code.as_ref().map(|c| match c {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Network client for the backend's REST and auth APIs
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    anon_key: String,
    session: SessionStore,
}

impl RestClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, prefix: &str, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, prefix, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer
            .map(str::to_string)
            .or_else(|| self.session.access_token())
            .unwrap_or_else(|| self.anon_key.clone());
        req.header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
    }

    // ========== REST API ==========

    /// Select rows from a table or view
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> ClientResult<Vec<T>> {
        let req = self.client.get(self.url(REST_PREFIX, table)).query(query);
        let response = self.authorize(req, None).send().await?;
        Self::handle_response(response).await
    }

    /// Select exactly one row; a missing row is `ClientError::Api` with 406
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let req = self
            .client
            .get(self.url(REST_PREFIX, table))
            .query(query)
            .header(header::ACCEPT, "application/vnd.pgrst.object+json");
        let response = self.authorize(req, None).send().await?;
        Self::handle_response(response).await
    }

    /// Insert one row without reading it back
    pub async fn insert<B: Serialize + Sync>(
        &self,
        table: &str,
        row: &B,
        idempotency_key: Option<Uuid>,
    ) -> ClientResult<()> {
        let mut req = self
            .client
            .post(self.url(REST_PREFIX, table))
            .header("Prefer", "return=minimal")
            .json(row);
        if let Some(key) = idempotency_key {
            req = req.header(IDEMPOTENCY_HEADER, key.to_string());
        }
        let response = self.authorize(req, None).send().await?;
        Self::handle_empty(response).await
    }

    /// Call a database function
    pub async fn rpc<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        function: &str,
        args: &B,
    ) -> ClientResult<T> {
        let req = self
            .client
            .post(self.url(REST_PREFIX, &format!("rpc/{}", function)))
            .json(args);
        let response = self.authorize(req, None).send().await?;
        Self::handle_response(response).await
    }

    // ========== Auth API ==========

    /// POST to the auth API
    ///
    /// `bearer` overrides the stored session token (used by sign-out).
    pub async fn auth_post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        let req = self
            .client
            .post(self.url(AUTH_PREFIX, path))
            .query(query)
            .json(body);
        let response = self.authorize(req, bearer).send().await?;
        Self::handle_response(response).await
    }

    /// POST to the auth API, ignoring any response body
    pub async fn auth_post_empty(&self, path: &str, bearer: Option<&str>) -> ClientResult<()> {
        let req = self.client.post(self.url(AUTH_PREFIX, path));
        let response = self.authorize(req, bearer).send().await?;
        Self::handle_empty(response).await
    }

    // ========== Response handling ==========

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!("Unexpected response body: {}", text);
            ClientError::InvalidResponse(e.to_string())
        })
    }

    async fn handle_empty(response: reqwest::Response) -> ClientResult<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        Ok(())
    }

    async fn error_from(status: StatusCode, response: reqwest::Response) -> ClientError {
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ClientError::Http(e),
        };
        let body = serde_json::from_str::<BackendErrorBody>(&text).unwrap_or_default();
        let message = body.message().unwrap_or_else(|| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                text.clone()
            }
        });

        tracing::debug!(status = %status, message = %message, "Backend request failed");

        if status == StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized(message);
        }
        ClientError::Api {
            status,
            code: body.code(),
            message,
            details: body.details,
        }
    }
}
