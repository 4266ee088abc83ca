use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const LOGOUT_PATH: &str = "/api/auth/logout/";
pub const PROFILE_PATH: &str = "/api/users/profile/";

/// Default API host when no base URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh: String,
}

/// The account as the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    /// The display name, falling back to the local part of the email.
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Successful register or login body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenPair,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `detail`, `error` and `message` in that order, then at the first
/// field of a validation map such as `{"email": ["already taken"]}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["detail", "error", "message"] {
        if let Some(text) = object.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }

    object.iter().find_map(|(field, value)| {
        let text = match value {
            Value::String(text) => Some(text.as_str()),
            Value::Array(items) => items.iter().find_map(Value::as_str),
            _ => None,
        }?;
        Some(format!("{}: {}", field, text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_accepts_numeric_and_string_ids() {
        let numeric: User =
            serde_json::from_str(r#"{"id": 7, "email": "a@b.io", "display_name": "Ann"}"#).unwrap();
        assert_eq!(numeric.id, "7");

        let text: User = serde_json::from_str(r#"{"id": "user_1", "email": "a@b.io"}"#).unwrap();
        assert_eq!(text.id, "user_1");
        assert_eq!(text.display_name, None);
    }

    #[test]
    fn user_name_falls_back_to_email() {
        let user = User {
            id: "1".into(),
            email: "ada@example.com".into(),
            display_name: Some("  ".into()),
        };
        assert_eq!(user.name(), "ada");
    }

    #[test]
    fn register_request_uses_snake_case_fields() {
        let request = RegisterRequest {
            email: "a@b.io".into(),
            password: "password1".into(),
            password_confirm: "password1".into(),
            display_name: Some("Ann".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["password_confirm"], "password1");
        assert_eq!(json["display_name"], "Ann");
    }

    #[test]
    fn extracts_error_messages_in_priority_order() {
        assert_eq!(
            extract_error_message(r#"{"error": "e", "detail": "d"}"#).as_deref(),
            Some("d")
        );
        assert_eq!(
            extract_error_message(r#"{"message": "m"}"#).as_deref(),
            Some("m")
        );
        assert_eq!(
            extract_error_message(r#"{"email": ["already registered"]}"#).as_deref(),
            Some("email: already registered")
        );
        assert_eq!(extract_error_message("<html>"), None);
        assert_eq!(extract_error_message(r#"{"code": 3}"#), None);
    }
}
