//! Session-related types.
//!
//! The active session is a copy of the identity fields of a user record, so
//! pages can render the logged-in state without reading the registry.

use serde::{Deserialize, Serialize};

use mochileros_core::Email;

use super::UserRecord;

/// The currently logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: Email,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl SessionRecord {
    /// Name shown in greetings: name, else login, else email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.name.as_str(), self.login.as_str()]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.email.as_str())
    }
}

impl From<&UserRecord> for SessionRecord {
    fn from(user: &UserRecord) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            login: user.login.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session(name: &str, login: &str) -> SessionRecord {
        SessionRecord {
            email: Email::parse("ana@b.com").unwrap(),
            name: name.to_owned(),
            login: login.to_owned(),
            avatar: None,
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(session("Ana Gómez", "anag1").display_name(), "Ana Gómez");
        assert_eq!(session("", "anag1").display_name(), "anag1");
        assert_eq!(session(" ", "").display_name(), "ana@b.com");
    }

    #[test]
    fn test_loads_session_without_optional_fields() {
        let parsed: SessionRecord = serde_json::from_str(r#"{"email":"ana@b.com"}"#).unwrap();
        assert_eq!(parsed.display_name(), "ana@b.com");
    }
}
