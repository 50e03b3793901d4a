use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{ClientConfig, endpoints};
use crate::errors::{InPostError, Result};
use crate::models::*;
use crate::session::Session;
use crate::store::ConfigStore;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Main client for the InPost Mobile API
///
/// Owns the session of one account. Every operation takes `&mut self`, so
/// a client serves one request at a time; wrap it in a mutex to share it
/// between threads.
pub struct InPostClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    store: Box<dyn ConfigStore>,
    session: Session,
}

impl std::fmt::Debug for InPostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InPostClient")
            .field("config", &self.config)
            .field("logged_in", &self.session.has_refresh_token())
            .finish_non_exhaustive()
    }
}

impl InPostClient {
    /// Create a client talking HTTP to `config.base_url`, restoring the
    /// session saved in `store`
    pub fn new(config: ClientConfig, store: impl ConfigStore + 'static) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport, store)
    }

    /// Create a client with a custom transport
    pub fn with_transport(
        config: ClientConfig,
        transport: impl Transport + 'static,
        store: impl ConfigStore + 'static,
    ) -> Result<Self> {
        let session = Session::from_bytes(&store.load()?);
        debug!(logged_in = session.has_refresh_token(), "Restored session");

        Ok(Self {
            config,
            transport: Box::new(transport),
            store: Box::new(store),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a refresh token from an earlier login is available
    pub fn is_logged_in(&self) -> bool {
        self.session.has_refresh_token()
    }

    fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<ApiResponse> {
        self.transport.send(ApiRequest {
            method,
            path: path.to_string(),
            body,
            authorization: self.session.access_token().map(str::to_string),
        })
    }

    fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None)
    }

    fn post<B: Serialize>(&self, path: &str, payload: &B) -> Result<ApiResponse> {
        let body = serde_json::to_vec(payload)?;
        self.send(Method::POST, path, Some(body))
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.session.to_bytes()?)?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token
    #[instrument(skip(self))]
    pub fn authenticate(&mut self) -> Result<()> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(InPostError::NotLoggedIn)?;

        debug!("Authenticating with refresh token");
        let response = self.post(
            endpoints::AUTHENTICATE,
            &AuthenticateRequest {
                refresh_token,
                phone_os: &self.config.phone_os,
            },
        )?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        let body: AuthenticateResponse = parse_body(&response, "authenticate")?;
        let auth_token = body
            .auth_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                InPostError::InvalidResponse("authenticate response has no authToken".to_string())
            })?;

        self.session.set_access_token(auth_token);
        self.persist()?;

        debug!("Access token renewed");
        Ok(())
    }

    /// Ask the API to text a login code to `phone_number`
    #[instrument(skip_all)]
    pub fn send_login_code(&self, phone_number: &str) -> Result<()> {
        debug!("Requesting SMS login code");
        let response = self.post(endpoints::SEND_SMS_CODE, &SendSmsCodeRequest { phone_number })?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        Ok(())
    }

    /// Finish the login flow, replacing both tokens
    #[instrument(skip_all)]
    pub fn confirm_login_code(&mut self, phone_number: &str, sms_code: &str) -> Result<()> {
        debug!("Confirming SMS login code");
        let response = self.post(
            endpoints::CONFIRM_SMS_CODE,
            &ConfirmSmsCodeRequest {
                phone_number,
                sms_code,
                phone_os: &self.config.phone_os,
            },
        )?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        let body: ConfirmSmsCodeResponse = parse_body(&response, "confirmSMSCode")?;
        let (Some(auth_token), Some(refresh_token)) = (
            body.auth_token.filter(|t| !t.is_empty()),
            body.refresh_token.filter(|t| !t.is_empty()),
        ) else {
            return Err(InPostError::InvalidResponse(
                "confirmSMSCode response is missing authToken or refreshToken".to_string(),
            ));
        };

        self.session.set_tokens(auth_token, refresh_token);
        self.persist()?;

        debug!("Logged in");
        Ok(())
    }

    /// Fetch a point, authenticating first when the access token is stale
    ///
    /// If the server still reports an expired token, the client
    /// re-authenticates and retries exactly once.
    #[instrument(skip(self))]
    pub fn get_point(&mut self, point_id: &str) -> Result<Point> {
        let mut reauthenticated = false;

        loop {
            if self.session.has_refresh_token() && !self.session.is_access_token_valid()? {
                debug!("Access token missing or expired");
                self.authenticate()?;
            }

            let response = self.get(&endpoints::point(point_id))?;

            if response.is_success() {
                return parse_body(&response, "point");
            }

            let error = ApiError::from_body(&response.body);

            if error.is_token_expired() && !reauthenticated {
                warn!("Server rejected access token as expired, re-authenticating");
                self.authenticate()?;
                reauthenticated = true;
                continue;
            }

            if response.status == StatusCode::UNAUTHORIZED && !self.session.has_refresh_token() {
                return Err(InPostError::NotLoggedIn);
            }

            return Err(InPostError::Api {
                status: response.status,
                error,
            });
        }
    }
}

fn api_error(response: &ApiResponse) -> InPostError {
    InPostError::Api {
        status: response.status,
        error: ApiError::from_body(&response.body),
    }
}

fn parse_body<T: DeserializeOwned>(response: &ApiResponse, what: &str) -> Result<T> {
    serde_json::from_slice(&response.body)
        .map_err(|e| InPostError::InvalidResponse(format!("Invalid {} response: {}", what, e)))
}
