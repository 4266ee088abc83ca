use std::fmt;

use tracing::warn;

use crate::protocol::{AuthResponse, User};
use crate::storage::{SlotStore, StoreError, get_json};

pub const AUTH_TOKEN_SLOT: &str = "authToken";
pub const ACCESS_TOKEN_SLOT: &str = "access_token";
pub const REFRESH_TOKEN_SLOT: &str = "refresh_token";
pub const USER_SLOT: &str = "user";

/// Client-side mirror of the server-issued tokens and the signed-in user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

impl AuthSession {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// Rebuild the session from persisted slots.
    pub fn load(store: &dyn SlotStore) -> Self {
        Self {
            access_token: store
                .get(ACCESS_TOKEN_SLOT)
                .or_else(|| store.get(AUTH_TOKEN_SLOT)),
            refresh_token: store.get(REFRESH_TOKEN_SLOT),
            user: get_json(store, USER_SLOT),
        }
    }

    /// Persist every slot in one write, so a failure leaves the previous
    /// session on disk intact.
    pub fn save(&self, store: &dyn SlotStore) -> Result<(), StoreError> {
        let user = self
            .user
            .as_ref()
            .map(|user| {
                serde_json::to_string(user).map_err(|source| StoreError::Encode {
                    key: USER_SLOT.to_string(),
                    source,
                })
            })
            .transpose()?;

        store.apply(&[
            (ACCESS_TOKEN_SLOT, self.access_token.clone()),
            (AUTH_TOKEN_SLOT, self.access_token.clone()),
            (REFRESH_TOKEN_SLOT, self.refresh_token.clone()),
            (USER_SLOT, user),
        ])
    }

    /// Remove every session slot. All removals are attempted; the first
    /// failure is returned.
    pub fn clear(store: &dyn SlotStore) -> Result<(), StoreError> {
        let mut first_error = None;
        for slot in [AUTH_TOKEN_SLOT, ACCESS_TOKEN_SLOT, REFRESH_TOKEN_SLOT, USER_SLOT] {
            if let Err(err) = store.remove(slot) {
                warn!(slot, error = %err, "failed to remove session slot");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl From<AuthResponse> for AuthSession {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: Some(response.tokens.access),
            refresh_token: response.tokens.refresh,
            user: Some(response.user),
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TokenPair;
    use crate::storage::MemoryStore;

    fn response() -> AuthResponse {
        AuthResponse {
            user: User {
                id: "1".into(),
                email: "ada@example.com".into(),
                display_name: None,
            },
            tokens: TokenPair {
                access: "access-1".into(),
                refresh: Some("refresh-1".into()),
            },
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let session = AuthSession::from(response());
        session.save(&store).unwrap();

        assert_eq!(store.get(AUTH_TOKEN_SLOT).as_deref(), Some("access-1"));
        assert_eq!(AuthSession::load(&store), session);
        assert!(session.is_authenticated());
    }

    #[test]
    fn legacy_token_slot_is_read() {
        let store = MemoryStore::new();
        store.set(AUTH_TOKEN_SLOT, "legacy").unwrap();
        let session = AuthSession::load(&store);
        assert_eq!(session.access_token.as_deref(), Some("legacy"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clear_removes_every_slot() {
        let store = MemoryStore::new();
        AuthSession::from(response()).save(&store).unwrap();
        AuthSession::clear(&store).unwrap();
        assert_eq!(AuthSession::load(&store), AuthSession::default());
    }

    #[test]
    fn debug_redacts_tokens() {
        let rendered = format!("{:?}", AuthSession::from(response()));
        assert!(!rendered.contains("access-1"));
        assert!(rendered.contains("<redacted>"));
    }

    /// Fails writes or removals of a single slot.
    struct BrokenSlot {
        inner: MemoryStore,
        slot: &'static str,
    }

    fn broken() -> StoreError {
        StoreError::Io {
            path: "state.json".into(),
            source: std::io::Error::other("read-only"),
        }
    }

    impl SlotStore for BrokenSlot {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.slot {
                return Err(broken());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            if key == self.slot {
                return Err(broken());
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_save_keeps_previous_session() {
        let store = BrokenSlot {
            inner: MemoryStore::new(),
            slot: "none",
        };
        let previous = AuthSession::from(response());
        previous.save(&store).unwrap();

        let store = BrokenSlot {
            slot: USER_SLOT,
            ..store
        };
        let next = AuthSession {
            access_token: Some("access-2".into()),
            refresh_token: Some("refresh-2".into()),
            user: Some(User {
                id: "2".into(),
                email: "bob@example.com".into(),
                display_name: None,
            }),
        };

        assert!(next.save(&store).is_err());
        assert_eq!(AuthSession::load(&store), previous);
        assert_eq!(store.get(AUTH_TOKEN_SLOT).as_deref(), Some("access-1"));
    }

    #[test]
    fn clear_keeps_going_after_a_failed_removal() {
        let store = BrokenSlot {
            inner: MemoryStore::new(),
            slot: "none",
        };
        AuthSession::from(response()).save(&store).unwrap();
        let store = BrokenSlot {
            slot: AUTH_TOKEN_SLOT,
            ..store
        };

        assert!(AuthSession::clear(&store).is_err());
        assert_eq!(store.get(ACCESS_TOKEN_SLOT), None);
        assert_eq!(store.get(REFRESH_TOKEN_SLOT), None);
        assert_eq!(store.get(USER_SLOT), None);
        assert!(!AuthSession::load(&store).is_authenticated());
    }
}
