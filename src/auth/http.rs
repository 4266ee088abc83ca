use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{AuthBackend, AuthError};
use crate::protocol::{
    AuthResponse, LOGIN_PATH, LOGOUT_PATH, LoginRequest, LogoutRequest, PROFILE_PATH,
    REGISTER_PATH, RegisterRequest, TokenPair, User, extract_error_message,
};

/// Talks to the external account API over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<(StatusCode, String), AuthError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        self.send(path, request).await
    }

    async fn get(&self, path: &str, bearer: &str) -> Result<(StatusCode, String), AuthError> {
        let request = self.client.get(self.url(path)).bearer_auth(bearer);
        self.send(path, request).await
    }

    async fn send(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), AuthError> {
        debug!(path, "sending auth request");
        let response = request.send().await.map_err(|err| self.transport_error(err))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;
        debug!(path, status = status.as_u16(), "auth response");
        Ok((status, body))
    }

    fn transport_error(&self, err: reqwest::Error) -> AuthError {
        if err.is_connect() || err.is_timeout() {
            AuthError::Unreachable(self.base_url.clone())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}

fn failure(status: StatusCode, body: &str, fallback: &str) -> AuthError {
    let message = extract_error_message(body).unwrap_or_else(|| fallback.to_string());
    if status == StatusCode::UNAUTHORIZED {
        AuthError::Unauthorized(message)
    } else {
        AuthError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Validate a 2xx register/login body. A missing `tokens.access` or `user`
/// is a failure, never a panic.
pub fn parse_auth_response(body: &str) -> Result<AuthResponse, AuthError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| AuthError::MalformedResponse("body is not JSON".into()))?;

    let access = value
        .pointer("/tokens/access")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MalformedResponse("missing tokens.access".into()))?
        .to_string();
    let refresh = value
        .pointer("/tokens/refresh")
        .and_then(Value::as_str)
        .map(str::to_string);

    let user = value
        .get("user")
        .cloned()
        .ok_or_else(|| AuthError::MalformedResponse("missing user".into()))?;
    let user: User = serde_json::from_value(user)
        .map_err(|err| AuthError::MalformedResponse(format!("invalid user: {}", err)))?;

    Ok(AuthResponse {
        user,
        tokens: TokenPair { access, refresh },
    })
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let (status, body) = self.post(REGISTER_PATH, request, None).await?;
        if !status.is_success() {
            return Err(failure(status, &body, "Registration failed"));
        }
        parse_auth_response(&body)
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        let (status, body) = self.post(LOGIN_PATH, request, None).await?;
        if !status.is_success() {
            return Err(failure(status, &body, "Login failed"));
        }
        parse_auth_response(&body)
    }

    async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError> {
        let body = LogoutRequest {
            refresh: refresh_token.to_string(),
        };
        let bearer = Some(access_token).filter(|token| !token.is_empty());
        let (status, text) = self.post(LOGOUT_PATH, &body, bearer).await?;
        if !status.is_success() {
            return Err(failure(status, &text, "Logout failed"));
        }
        Ok(())
    }

    async fn profile(&self, access_token: &str) -> Result<User, AuthError> {
        let (status, body) = self.get(PROFILE_PATH, access_token).await?;
        if !status.is_success() {
            return Err(failure(status, &body, "Could not load the user profile"));
        }
        serde_json::from_str(&body)
            .map_err(|err| AuthError::MalformedResponse(format!("invalid user: {}", err)))
    }
}
