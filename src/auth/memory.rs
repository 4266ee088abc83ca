//! In-process account store for offline use and tests.
//!
//! Accounts live only as long as the process. Passwords are kept as given.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::validation::{has_min_password_length, is_valid_email};
use super::{AuthBackend, AuthError};
use crate::protocol::{AuthResponse, LoginRequest, RegisterRequest, TokenPair, User};

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct State {
    /// Accounts by user id.
    accounts: HashMap<String, Account>,
    /// Lowercased email to user id.
    email_to_id: HashMap<String, String>,
    /// Access token to user id.
    access_tokens: HashMap<String, String>,
    /// Refresh token to the access token it was issued with.
    refresh_tokens: HashMap<String, String>,
}

impl State {
    fn issue(&mut self, user_id: &str) -> TokenPair {
        let access = Uuid::new_v4().to_string();
        let refresh = Uuid::new_v4().to_string();
        self.access_tokens.insert(access.clone(), user_id.to_string());
        self.refresh_tokens.insert(refresh.clone(), access.clone());
        TokenPair {
            access,
            refresh: Some(refresh),
        }
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }
}

fn bad_request(message: &str) -> AuthError {
    AuthError::Rejected {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl AuthBackend for MemoryBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(bad_request("Email and password are required"));
        }
        if !is_valid_email(&request.email) {
            return Err(bad_request("Invalid email format"));
        }
        if !has_min_password_length(&request.password) {
            return Err(bad_request("Password must be at least 8 characters"));
        }
        if request.password != request.password_confirm {
            return Err(bad_request("Passwords do not match"));
        }

        let mut state = self.state.lock().await;
        let key = request.email.to_lowercase();
        if state.email_to_id.contains_key(&key) {
            return Err(AuthError::Rejected {
                status: 409,
                message: "This email is already registered".into(),
            });
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            display_name: request
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };
        state.email_to_id.insert(key, user.id.clone());
        state.accounts.insert(
            user.id.clone(),
            Account {
                user: user.clone(),
                password: request.password.clone(),
            },
        );
        let tokens = state.issue(&user.id);

        info!(user_id = %user.id, "registered account");
        Ok(AuthResponse { user, tokens })
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        let mut state = self.state.lock().await;
        let user = state
            .email_to_id
            .get(&request.email.to_lowercase())
            .and_then(|id| state.accounts.get(id))
            .filter(|account| account.password == request.password)
            .map(|account| account.user.clone())
            .ok_or_else(|| AuthError::Unauthorized("Invalid email or password".into()))?;

        let tokens = state.issue(&user.id);
        Ok(AuthResponse { user, tokens })
    }

    async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        let Some(paired_access) = state.refresh_tokens.remove(refresh_token) else {
            return Err(bad_request("Invalid refresh token"));
        };
        state.access_tokens.remove(&paired_access);
        if !access_token.is_empty() {
            state.access_tokens.remove(access_token);
        }
        Ok(())
    }

    async fn profile(&self, access_token: &str) -> Result<User, AuthError> {
        let state = self.state.lock().await;
        state
            .access_tokens
            .get(access_token)
            .and_then(|id| state.accounts.get(id))
            .map(|account| account.user.clone())
            .ok_or_else(|| AuthError::Unauthorized("Invalid or expired token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            password_confirm: confirm.into(),
            display_name: Some("Ada".into()),
        }
    }

    fn status_of(err: AuthError) -> u16 {
        match err {
            AuthError::Rejected { status, .. } => status,
            AuthError::Unauthorized(_) => 401,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn register_enforces_field_rules() {
        let backend = MemoryBackend::new();

        let cases = [
            registration("", "password1", "password1"),
            registration("not-an-email", "password1", "password1"),
            registration("ada@example.com", "short", "short"),
            registration("ada@example.com", "password1", "password2"),
        ];
        for case in &cases {
            let err = backend.register(case).await.unwrap_err();
            assert_eq!(status_of(err), 400, "{:?}", case.email);
        }
        assert_eq!(backend.user_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let backend = MemoryBackend::new();
        backend
            .register(&registration("ada@example.com", "password1", "password1"))
            .await
            .unwrap();

        let err = backend
            .register(&registration("ADA@example.com", "password1", "password1"))
            .await
            .unwrap_err();
        assert_eq!(status_of(err), 409);
        assert_eq!(backend.user_count().await, 1);
    }

    #[tokio::test]
    async fn login_checks_password() {
        let backend = MemoryBackend::new();
        let registered = backend
            .register(&registration("ada@example.com", "password1", "password1"))
            .await
            .unwrap();

        let wrong = LoginRequest {
            email: "ada@example.com".into(),
            password: "password2".into(),
        };
        assert_eq!(status_of(backend.login(&wrong).await.unwrap_err()), 401);

        let unknown = LoginRequest {
            email: "bob@example.com".into(),
            password: "password1".into(),
        };
        assert_eq!(status_of(backend.login(&unknown).await.unwrap_err()), 401);

        let right = LoginRequest {
            email: "ada@example.com".into(),
            password: "password1".into(),
        };
        let response = backend.login(&right).await.unwrap();
        assert_eq!(response.user, registered.user);
        assert_ne!(response.tokens.access, registered.tokens.access);
    }

    #[tokio::test]
    async fn logout_revokes_tokens() {
        let backend = MemoryBackend::new();
        let response = backend
            .register(&registration("ada@example.com", "password1", "password1"))
            .await
            .unwrap();
        let access = response.tokens.access.clone();
        let refresh = response.tokens.refresh.clone().unwrap();

        assert_eq!(backend.profile(&access).await.unwrap().email, "ada@example.com");

        backend.logout(&access, &refresh).await.unwrap();
        assert_eq!(status_of(backend.profile(&access).await.unwrap_err()), 401);
        assert_eq!(status_of(backend.logout(&access, &refresh).await.unwrap_err()), 400);
    }
}
