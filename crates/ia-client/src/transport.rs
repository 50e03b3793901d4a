use reqwest::blocking::Client;
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::Result;

/// A request against the InPost API, path relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
    /// Sent verbatim as the `Authorization` header
    pub authorization: Option<String>,
}

/// Raw status and body, left to the caller to interpret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends requests to the API. Blocks until a response or a timeout.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Transport over a blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    accept_language: HeaderValue,
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.http_timeouts.connect)
            .timeout(config.http_timeouts.request)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            accept_language: HeaderValue::from_str(&config.accept_language)?,
            http,
        })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.base_url.join(&request.path)?;
        let has_body = request.method == Method::POST || request.method == Method::PUT;

        let mut builder = self
            .http
            .request(request.method, url)
            .header(ACCEPT_LANGUAGE, self.accept_language.clone());

        if has_body {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        if let Some(token) = request.authorization {
            let mut value = HeaderValue::from_str(&token)?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = builder.send()?;
        let status = response.status();
        let body = response.bytes()?.to_vec();

        debug!(%status, bytes = body.len(), "Received API response");
        Ok(ApiResponse { status, body })
    }
}
