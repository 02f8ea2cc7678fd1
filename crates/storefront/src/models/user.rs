//! User records.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mochileros_core::{Email, Registration};

/// A registered site user, as kept in the durable user registry.
///
/// The password is stored as typed; this is a demo site without a server.
/// `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Lower-cased, unique across the registry.
    pub email: Email,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Avatar as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserRecord {
    /// Build the record for a validated registration.
    #[must_use]
    pub fn from_registration(registration: &Registration, avatar: Option<String>) -> Self {
        Self {
            email: registration.email.normalized(),
            password: registration.password.clone(),
            name: registration.name.clone(),
            surname: registration.surname.clone(),
            login: registration.login.clone(),
            birth_date: Some(registration.birth_date),
            avatar,
        }
    }

    /// Case-insensitive email comparison.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.matches(email)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("login", &self.login)
            .field("birth_date", &self.birth_date)
            .field("avatar", &self.avatar.as_ref().map(|a| a.len()))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_stored_layout() {
        let raw = r#"{"name":"Ana","surname":"Gómez Díaz","email":"ana@b.com",
            "login":"anag1","password":"Abcd12!@","birthDate":"2004-05-01"}"#;
        let user: UserRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(user.birth_date, NaiveDate::from_ymd_opt(2004, 5, 1));
        assert_eq!(user.avatar, None);
        assert!(user.has_email("ANA@B.COM"));
    }

    #[test]
    fn test_serializes_camel_case_without_empty_avatar() {
        let user: UserRecord = serde_json::from_str(
            r#"{"name":"Ana","email":"ana@b.com","password":"x","birthDate":"2004-05-01"}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"birthDate\":\"2004-05-01\""));
        assert!(!json.contains("avatar"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let user: UserRecord =
            serde_json::from_str(r#"{"name":"Ana","email":"ana@b.com","password":"Secr3t!!"}"#)
                .unwrap();
        assert!(!format!("{user:?}").contains("Secr3t!!"));
    }
}
