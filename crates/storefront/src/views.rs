//! What bound page elements show.
//!
//! Page handlers never touch a document. They return these values and the
//! embedding shell applies them: header greeting, login link, sidebar name,
//! logout buttons, form messages and navigation.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use mochileros_core::ValidationErrors;

use crate::error::AppError;
use crate::models::SessionRecord;

/// Sidebar label when nobody is logged in.
pub const ANONYMOUS_NAME: &str = "Usuario";

/// Avatar shown when the user has none.
pub const DEFAULT_AVATAR: &str = "images/avatar.png";

/// Authentication-dependent page chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthView {
    pub greeting_visible: bool,
    /// Name inside the greeting; empty when logged out.
    pub display_name: String,
    pub login_link_visible: bool,
    pub login_href: String,
    pub sidebar_name: String,
    /// Logout buttons are shown and clickable.
    pub logout_enabled: bool,
    pub avatar_src: String,
}

impl AuthView {
    /// Compute the chrome for the current session.
    #[must_use]
    pub fn from_session(session: Option<&SessionRecord>, login_href: &Url) -> Self {
        match session {
            Some(session) => {
                let name = session.display_name();
                Self {
                    greeting_visible: true,
                    display_name: name.to_string(),
                    login_link_visible: false,
                    login_href: login_href.to_string(),
                    sidebar_name: if name.is_empty() {
                        ANONYMOUS_NAME.to_string()
                    } else {
                        name.to_string()
                    },
                    logout_enabled: true,
                    avatar_src: session
                        .avatar
                        .clone()
                        .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
                }
            }
            None => Self {
                greeting_visible: false,
                display_name: String::new(),
                login_link_visible: true,
                login_href: login_href.to_string(),
                sidebar_name: ANONYMOUS_NAME.to_string(),
                logout_enabled: false,
                avatar_src: DEFAULT_AVATAR.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.logout_enabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Error,
    Success,
}

impl MessageKind {
    /// Text color of a message of this kind.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Error => "#d32f2f",
            Self::Success => "#2e7d32",
            Self::Info => "#424242",
        }
    }
}

/// The summary line under a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    /// An empty message; clears the line.
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            kind: MessageKind::Info,
            text: String::new(),
        }
    }
}

/// Where the browser goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Go to `to` after `after`, optionally showing `alert` first.
    Redirect {
        to: Url,
        after: Duration,
        alert: Option<String>,
    },
    /// Reload the current page.
    Reload,
}

impl Navigation {
    /// Navigate now.
    #[must_use]
    pub const fn to(url: Url) -> Self {
        Self::Redirect {
            to: url,
            after: Duration::ZERO,
            alert: None,
        }
    }

    /// Navigate after a delay.
    #[must_use]
    pub const fn delayed(url: Url, after: Duration) -> Self {
        Self::Redirect {
            to: url,
            after,
            alert: None,
        }
    }

    /// Show an alert, then navigate.
    #[must_use]
    pub fn alert_then(alert: impl Into<String>, url: Url) -> Self {
        Self::Redirect {
            to: url,
            after: Duration::ZERO,
            alert: Some(alert.into()),
        }
    }
}

/// Everything a form submission changes on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    pub message: FormMessage,
    /// Inline errors as `(field, message)`.
    pub field_errors: Vec<(&'static str, String)>,
    /// Refreshed chrome, when the session may have changed.
    pub auth: Option<AuthView>,
    pub navigation: Option<Navigation>,
    /// Blocking alert shown before anything else.
    pub alert: Option<String>,
    /// Clear the form fields.
    pub reset_form: bool,
}

impl FormOutcome {
    /// A successful submission.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            message: FormMessage::success(text),
            field_errors: Vec::new(),
            auth: None,
            navigation: None,
            alert: None,
            reset_form: true,
        }
    }

    /// A rejected submission; the form keeps its values.
    #[must_use]
    pub fn failure(err: &AppError) -> Self {
        err.report();
        Self {
            message: FormMessage::error(err.user_message()),
            field_errors: err.field_errors().map(field_pairs).unwrap_or_default(),
            auth: None,
            navigation: None,
            alert: None,
            reset_form: false,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthView) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: Navigation) -> Self {
        self.navigation = Some(navigation);
        self
    }

    #[must_use]
    pub fn with_alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.message.kind, MessageKind::Success)
    }

    /// Inline error for `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }
}

fn field_pairs(errors: &ValidationErrors) -> Vec<(&'static str, String)> {
    errors
        .iter()
        .map(|e| (e.field, e.message.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mochileros_core::Email;

    use super::*;
    use crate::services::auth::AuthError;

    fn login_url() -> Url {
        Url::parse("http://localhost:8000/acceso.html").unwrap()
    }

    #[test]
    fn test_logged_out_view() {
        let view = AuthView::from_session(None, &login_url());
        assert!(!view.greeting_visible);
        assert!(view.login_link_visible);
        assert_eq!(view.login_href, "http://localhost:8000/acceso.html");
        assert_eq!(view.sidebar_name, "Usuario");
        assert!(!view.logout_enabled);
        assert_eq!(view.avatar_src, DEFAULT_AVATAR);
    }

    #[test]
    fn test_logged_in_view_uses_login_when_name_missing() {
        let session = SessionRecord {
            email: Email::parse("ana@b.com").unwrap(),
            name: String::new(),
            login: "anag1".to_string(),
            avatar: Some("data:image/png;base64,AAAA".to_string()),
        };
        let view = AuthView::from_session(Some(&session), &login_url());
        assert!(view.greeting_visible);
        assert!(!view.login_link_visible);
        assert_eq!(view.display_name, "anag1");
        assert_eq!(view.sidebar_name, "anag1");
        assert!(view.is_logged_in());
        assert_eq!(view.avatar_src, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_failure_outcome_keeps_form_and_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push("login", "El login debe tener al menos 5 caracteres.");
        let outcome = FormOutcome::failure(&AppError::from(AuthError::Validation(errors)));

        assert_eq!(outcome.message.kind, MessageKind::Error);
        assert_eq!(outcome.message.kind.color(), "#d32f2f");
        assert!(!outcome.reset_form);
        assert_eq!(
            outcome.field_error("login"),
            Some("El login debe tener al menos 5 caracteres.")
        );
        assert_eq!(outcome.field_error("email"), None);
    }

    #[test]
    fn test_message_kind_serializes_lowercase() {
        let json = serde_json::to_string(&FormMessage::success("ok")).unwrap();
        assert_eq!(json, r#"{"kind":"success","text":"ok"}"#);
    }
}
