use std::sync::Arc;

use tracing::{info, warn};

use super::{AuthBackend, AuthError, AuthSession};
use crate::protocol::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::storage::{SlotStore, set_json};

use super::session::USER_SLOT;

/// Runs auth operations against a backend and mirrors the result into the slot store.
///
/// A failed operation leaves the previous session as it was, with two
/// exceptions: `logout` always clears it, and an `Unauthorized` answer to
/// `current_user` clears the stale token.
pub struct AuthFacade {
    backend: Box<dyn AuthBackend>,
    store: Arc<dyn SlotStore>,
    session: AuthSession,
}

impl AuthFacade {
    pub fn new(backend: Box<dyn AuthBackend>, store: Arc<dyn SlotStore>) -> Self {
        Self {
            backend,
            store,
            session: AuthSession::default(),
        }
    }

    /// Reload the session persisted by an earlier run. No request is made.
    pub fn restore(&mut self) -> &AuthSession {
        self.session = AuthSession::load(self.store.as_ref());
        &self.session
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        password_confirm: &str,
        display_name: Option<&str>,
    ) -> Result<User, AuthError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: password_confirm.to_string(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };

        let response = self
            .backend
            .register(&request)
            .await
            .inspect_err(|err| warn!(error = %err, "registration failed"))?;
        self.establish(response)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .backend
            .login(&request)
            .await
            .inspect_err(|err| warn!(error = %err, "login failed"))?;
        self.establish(response)
    }

    /// Tell the server (best effort) and then always drop the local session.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        if let Some(refresh) = self.session.refresh_token.as_deref() {
            let access = self.session.access_token.as_deref().unwrap_or_default();
            if let Err(err) = self.backend.logout(access, refresh).await {
                warn!(error = %err, "server logout failed, clearing local session anyway");
            }
        }

        self.session = AuthSession::default();
        AuthSession::clear(self.store.as_ref())?;
        info!("logged out");
        Ok(())
    }

    /// Fetch the profile for the stored token. A rejected token is cleared.
    pub async fn current_user(&mut self) -> Result<User, AuthError> {
        let Some(token) = self.session.access_token.clone() else {
            return Err(AuthError::NotAuthenticated);
        };

        match self.backend.profile(&token).await {
            Ok(user) => {
                set_json(self.store.as_ref(), USER_SLOT, &user)?;
                self.session.user = Some(user.clone());
                Ok(user)
            }
            Err(AuthError::Unauthorized(message)) => {
                warn!("stored token rejected, clearing session");
                self.session = AuthSession::default();
                AuthSession::clear(self.store.as_ref())?;
                Err(AuthError::Unauthorized(message))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn verify_token(&mut self) -> Result<User, AuthError> {
        self.current_user().await
    }

    fn establish(&mut self, response: AuthResponse) -> Result<User, AuthError> {
        let user = response.user.clone();
        let session = AuthSession::from(response);
        session.save(self.store.as_ref())?;
        self.session = session;
        info!(user = %user.id, "signed in");
        Ok(user)
    }
}
