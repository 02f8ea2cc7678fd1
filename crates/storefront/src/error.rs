//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before a message is shown to the visitor. Page handlers turn every
//! failure into `AppError::user_message`.

use thiserror::Error;

use mochileros_core::ValidationErrors;

use crate::services::auth::AuthError;
use crate::services::avatar::FileReadError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration or login failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A form other than login or registration failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),
}

impl AppError {
    /// Whether the error is a bug or an environment failure rather than
    /// something the visitor can fix.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Auth(AuthError::Storage(_) | AuthError::FileRead(FileReadError::Io { .. }))
        )
    }

    /// Report internal errors to Sentry and the log. Visitor errors are
    /// logged at debug level only.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Page error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected form submission");
        }
    }

    /// Message shown to the visitor. Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::Validation(errors) => errors.summary(),
                AuthError::DuplicateEmail => "Ese correo ya está registrado.".to_string(),
                AuthError::InvalidCredentials => {
                    "Credenciales no válidas. Intenta de nuevo.".to_string()
                }
                AuthError::FileRead(FileReadError::Empty { file_name }) => {
                    format!("No se pudo leer la imagen: {file_name} está vacía.")
                }
                AuthError::FileRead(FileReadError::Io { .. }) => {
                    "No se pudo leer la imagen seleccionada.".to_string()
                }
                AuthError::Storage(_) => {
                    "El almacenamiento del navegador no está disponible.".to_string()
                }
            },
            Self::Validation(errors) => errors.summary(),
        }
    }

    /// Inline errors per form field, if any.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Auth(AuthError::Validation(errors)) | Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after a session starts to associate errors with the visitor.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the visitor.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for visitor actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("purchase", "Entered confirmation page", Some(&[("allowed", "true")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_auth_messages() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).user_message(),
            "Credenciales no válidas. Intenta de nuevo."
        );
        assert_eq!(
            AppError::from(AuthError::DuplicateEmail).user_message(),
            "Ese correo ya está registrado."
        );
    }

    #[test]
    fn test_validation_message_and_fields() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "El nombre debe tener al menos 3 caracteres.");
        errors.push("cvv", "El CVV debe tener 3 dígitos.");
        let err = AppError::from(errors);

        assert_eq!(
            err.user_message(),
            "El nombre debe tener al menos 3 caracteres. El CVV debe tener 3 dígitos."
        );
        assert_eq!(err.field_errors().map(ValidationErrors::len), Some(2));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_storage_errors_are_internal_and_hidden() {
        let err = AppError::from(AuthError::from(StorageError::QuotaExceeded { limit: 10 }));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("10"));
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn test_report_without_sentry_client_is_noop() {
        AppError::from(AuthError::from(StorageError::Unavailable("disabled".to_string()))).report();
        AppError::from(AuthError::InvalidCredentials).report();
    }
}
