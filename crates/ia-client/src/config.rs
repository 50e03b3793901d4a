use std::time::Duration;
use url::Url;

/// InPost Mobile API endpoints, relative to the base URL
pub mod endpoints {
    use url::Url;

    pub const SEND_SMS_CODE: &str = "/v1/sendSMSCode";
    pub const CONFIRM_SMS_CODE: &str = "/v1/confirmSMSCode";
    pub const AUTHENTICATE: &str = "/v1/authenticate";

    /// Point details, the id percent-encoded as a single path segment
    pub fn point(point_id: &str) -> String {
        let mut url = Url::parse("http://localhost/v2/points").expect("valid points URL");
        url.path_segments_mut()
            .expect("points URL has a path")
            .push(point_id);
        url.path().to_string()
    }
}

/// Production API host
pub const API_BASE_URL: &str = "https://api-inmobile-pl.easypack24.net";

/// User agent of the official iOS app
pub const USER_AGENT: &str = "InPost-Mobile/3.18.0-release (iOS 17.1.1; iPhone14,2; pl)";

pub const ACCEPT_LANGUAGE: &str = "en-US";

/// Platform identifier sent with authentication and login confirmation
pub const PHONE_OS: &str = "Apple";

/// Error code the API uses when the access token has expired
pub const TOKEN_EXPIRED_ERROR: &str = "tokenExpiredException";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(10),
        }
    }
}

/// Configuration for InPostClient
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host every endpoint path is resolved against
    pub base_url: Url,

    pub user_agent: String,

    pub accept_language: String,

    /// Value of the `phoneOS` field in auth payloads
    pub phone_os: String,

    /// HTTP client timeouts
    pub http_timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Same headers and timeouts as production, different host.
    ///
    /// Used to point the client at a local mock server.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(API_BASE_URL).expect("valid API base URL"),
            user_agent: USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            phone_os: PHONE_OS.to_string(),
            http_timeouts: HttpTimeouts::default(),
        }
    }
}
