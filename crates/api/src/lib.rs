pub mod error;

use error::{extract_error_message, ApiError, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Clone, Debug)]
pub enum AuthMethod {
    Basic { username: String, token: String },
    Bearer { token: String },
}

/// Thin authenticated HTTP client: one request per call, no retries.
/// Any response with status >= 400 becomes a terminal [`ApiError::Remote`]
/// carrying the endpoint and a message extracted from the error body.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: Option<AuthMethod>,
    headers: Vec<(String, String)>,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(base_url.as_ref()).map_err(ApiError::InvalidUrl)?;

        // A base path only survives Url::join when it ends in a slash.
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }

        let client = Client::builder()
            .user_agent(format!("snipdoc/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: url,
            auth: None,
            headers: Vec::new(),
        })
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthMethod::Basic {
            username: username.into(),
            token: token.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::Bearer {
            token: token.into(),
        });
        self
    }

    /// Add a header sent with every request (e.g. an API version pin).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, Option::<&()>::None)
            .await
    }

    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let text = self.request_text(method, path, body).await?;

        // DELETE and some PUTs answer 204 with an empty body.
        if text.trim().is_empty() {
            return serde_json::from_str("null")
                .map_err(|e| ApiError::InvalidResponse(e.to_string()));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Perform one request and return the raw response body.
    pub async fn request_text<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let joined = self.endpoint_url(path)?;

        debug!(method = %method, url = %joined, "Sending request");

        let mut req = self.client.request(method, joined.clone());
        req = self.apply_auth(req);
        for (name, value) in &self.headers {
            req = req.header(name, value);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(ApiError::RequestFailed)?;
        Self::check_status(joined.path(), response).await
    }

    /// Fetch a full URL outside the configured base (gist raw content
    /// lives on a separate host) and return the body as text.
    pub async fn get_absolute_text(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(ApiError::InvalidUrl)?;

        debug!(url = %parsed, "Fetching raw content");

        let mut req = self.client.get(parsed.clone());
        req = self.apply_auth(req);

        let response = req.send().await.map_err(ApiError::RequestFailed)?;
        Self::check_status(parsed.path(), response).await
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.strip_prefix('/').unwrap_or(path))
            .map_err(ApiError::InvalidUrl)
    }

    async fn check_status(endpoint: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status >= StatusCode::BAD_REQUEST {
            return Err(ApiError::Remote {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message: extract_error_message(&body),
            });
        }

        Ok(body)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(AuthMethod::Basic { username, token }) => {
                request.basic_auth(username, Some(token))
            }
            Some(AuthMethod::Bearer { token }) => request.bearer_auth(token),
            None => request,
        }
    }
}
