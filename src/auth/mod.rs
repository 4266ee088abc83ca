//! Account sessions over a pluggable backend.

mod error;
mod facade;
mod http;
mod memory;
mod session;
pub mod validation;

use async_trait::async_trait;

use crate::protocol::{AuthResponse, LoginRequest, RegisterRequest, User};

pub use error::AuthError;
pub use facade::AuthFacade;
pub use http::{HttpBackend, parse_auth_response};
pub use memory::MemoryBackend;
pub use session::{ACCESS_TOKEN_SLOT, AUTH_TOKEN_SLOT, AuthSession, REFRESH_TOKEN_SLOT, USER_SLOT};

/// Where credentials are checked and tokens issued.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError>;

    async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<(), AuthError>;

    async fn profile(&self, access_token: &str) -> Result<User, AuthError>;
}
