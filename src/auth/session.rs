//! Token-based session management.
//!
//! `SessionManager` owns the one bearer token for the process: it loads it
//! from the `TokenStore` at construction, replaces it on login, clears it on
//! logout, and injects it into outbound requests via [`SessionManager::decorate`].

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::error::{rejection, ClientError};
use crate::auth::TokenStore;

// ============================================================================
// Endpoints and fallback messages
// ============================================================================

const LOGIN_PATH: &str = "/api/v1/tokens/authentication";
const LOGOUT_PATH: &str = "/api/v1/logout";
const REGISTER_PATH: &str = "/api/v1/users";
const ACTIVATE_PATH: &str = "/api/v1/users/activated";

const LOGIN_FALLBACK: &str = "login failed";
const LOGOUT_FALLBACK: &str = "logout failed";
const REGISTER_FALLBACK: &str = "registration failed";
const ACTIVATE_FALLBACK: &str = "account activation failed";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    authentication_token: AuthenticationToken,
}

#[derive(Debug, Deserialize)]
struct AuthenticationToken {
    token: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ActivateRequest<'a> {
    token: &'a str,
}

/// Owns the current authentication credential and its persistence.
///
/// The token is either fully present or absent; memory and storage are
/// written together at each operation's single success point. Concurrent
/// session-mutating calls are not serialized here; callers must not overlap
/// them.
pub struct SessionManager {
    http: Client,
    base_url: String,
    store: Box<dyn TokenStore>,
    token: Option<String>,
}

impl SessionManager {
    /// Create a manager, reading any previously persisted token.
    ///
    /// An unreadable session file is treated as unauthenticated rather than
    /// a fatal error; the cause is logged.
    pub fn new(http: Client, base_url: impl Into<String>, store: Box<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "failed to load stored session, starting unauthenticated");
                None
            }
        };
        Self {
            http,
            base_url: base_url.into(),
            store,
            token,
        }
    }

    /// True iff a token is currently held. No side effects.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Add `Authorization: Bearer <token>` to the request iff a token is
    /// held; otherwise the builder is returned unchanged.
    pub fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// Success requires a 2xx status and an `authentication_token.token`
    /// field in the body; a success status without the field is reported as
    /// [`ClientError::MalformedResponse`].
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "login request failed");
                ClientError::Transport
            })?;

        if !response.status().is_success() {
            return Err(rejection(response, LOGIN_FALLBACK).await);
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "login response did not contain an authentication token");
            ClientError::MalformedResponse
        })?;

        let token = body.authentication_token.token;
        self.store.save(&token).map_err(ClientError::Storage)?;
        self.token = Some(token);
        debug!("login succeeded");
        Ok(())
    }

    /// Invalidate the session server-side, then forget the token.
    ///
    /// A no-op success when unauthenticated. On any failure the token is
    /// left in place; the server is not assumed to have logged us out.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let Some(token) = self.token.clone() else {
            debug!("logout with no active session, nothing to do");
            return Ok(());
        };

        let url = format!("{}{}", self.base_url, LOGOUT_PATH);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "logout request failed");
                ClientError::Transport
            })?;

        if !response.status().is_success() {
            return Err(rejection(response, LOGOUT_FALLBACK).await);
        }

        self.store.clear().map_err(ClientError::Storage)?;
        self.token = None;
        debug!("logout succeeded");
        Ok(())
    }

    /// Create an account. The server answers 202 Accepted and finishes the
    /// account asynchronously; any other status is a failure. No token is
    /// issued, the user logs in after activating.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, REGISTER_PATH);
        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "registration request failed");
                ClientError::Transport
            })?;

        if response.status() != StatusCode::ACCEPTED {
            return Err(rejection(response, REGISTER_FALLBACK).await);
        }

        debug!(username, "registration accepted");
        Ok(())
    }

    /// Activate a pending account with the token the server mailed out.
    /// No session token is issued.
    pub async fn activate(&self, activation_token: &str) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, ACTIVATE_PATH);
        let response = self
            .http
            .put(&url)
            .json(&ActivateRequest {
                token: activation_token,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "activation request failed");
                ClientError::Transport
            })?;

        if !response.status().is_success() {
            return Err(rejection(response, ACTIVATE_FALLBACK).await);
        }

        debug!("account activated");
        Ok(())
    }
}
