//! Authentication against the identity service
//!
//! Access tokens are short-lived. A session is established by checking the
//! stored access token, then falling back to exchanging the refresh token
//! (`apitoken`), then to a username/password login.

use codestream_core::dto::auth::{
    AccessTokenResponse, LoginRequest, LoginResponse, RefreshTokenRequest,
};
use reqwest::Method;
use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::CodeStreamClient;
use crate::error::{ClientError, Result};

const LOGIN_PATH: &str = "/csp/gateway/am/api/login?access_token";
const TOKEN_PATH: &str = "/iaas/api/login";
const VERIFY_PATH: &str = "/iaas/api/projects";

/// Credentials of a target
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub domain: Option<String>,
    /// Refresh token
    pub api_token: Option<String>,
    /// Bearer token
    pub access_token: Option<String>,
}

impl Credentials {
    fn login_request(&self) -> Option<LoginRequest> {
        let username = non_empty(&self.username)?;
        let password = non_empty(&self.password)?;
        Some(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            domain: non_empty(&self.domain).map(str::to_string),
        })
    }
}

/// Tokens in effect after [`CodeStreamClient::ensure_session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub api_token: Option<String>,
    pub access_token: String,
    /// True when new tokens were issued and should be persisted
    pub refreshed: bool,
}

impl CodeStreamClient {
    /// Log in with username and password, returning a refresh token
    pub async fn login(&self, req: &LoginRequest) -> Result<String> {
        let response = self
            .anonymous(Method::POST, LOGIN_PATH)
            .header(ACCEPT, "application/json")
            .json(req)
            .send()
            .await?;

        let login: LoginResponse = self.handle_response(response).await?;
        Ok(login.refresh_token)
    }

    /// Exchange a refresh token for an access token
    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String> {
        let req = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = self
            .anonymous(Method::POST, TOKEN_PATH)
            .header(ACCEPT, "application/json")
            .json(&req)
            .send()
            .await?;

        let token: AccessTokenResponse = self.handle_response(response).await?;
        Ok(token.token)
    }

    /// Check whether the current access token is still accepted
    ///
    /// Returns `Ok(false)` for 401/403 and when no token is set; any other
    /// failure is an error.
    pub async fn verify_access_token(&self) -> Result<bool> {
        if self.access_token.is_none() {
            return Ok(false);
        }

        // identity endpoint: no pipeline apiVersion
        let response = self
            .authorized(Method::GET, VERIFY_PATH)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        match Self::check_status(response).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Make sure the client holds a working access token
    ///
    /// On success the token is set on the client. `Session::refreshed`
    /// tells the caller whether new tokens were issued.
    pub async fn ensure_session(&mut self, credentials: &Credentials) -> Result<Session> {
        if let Some(token) = non_empty(&credentials.access_token) {
            self.set_access_token(token);
            if self.verify_access_token().await? {
                debug!("stored access token is valid");
                return Ok(Session {
                    api_token: credentials.api_token.clone(),
                    access_token: token.to_string(),
                    refreshed: false,
                });
            }
            info!("access token expired, requesting a new one");
            self.access_token = None;
        }

        let login = credentials.login_request();

        if let Some(api_token) = non_empty(&credentials.api_token) {
            match self.exchange_refresh_token(api_token).await {
                Ok(access_token) => {
                    self.set_access_token(&access_token);
                    return Ok(Session {
                        api_token: Some(api_token.to_string()),
                        access_token,
                        refreshed: true,
                    });
                }
                Err(e) if e.is_client_error() && login.is_some() => {
                    info!("API token rejected ({}), logging in again", e);
                }
                Err(e) => return Err(e),
            }
        }

        let login = login.ok_or_else(|| {
            ClientError::Auth(
                "no valid access token, API token or username/password for target".to_string(),
            )
        })?;

        let api_token = self.login(&login).await.map_err(|e| match e {
            ClientError::Service { message, .. } => ClientError::Auth(message),
            other => other,
        })?;
        let access_token = self.exchange_refresh_token(&api_token).await?;
        self.set_access_token(&access_token);

        Ok(Session {
            api_token: Some(api_token),
            access_token,
            refreshed: true,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
