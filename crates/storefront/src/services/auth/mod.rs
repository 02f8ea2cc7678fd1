//! Authentication service.
//!
//! Keeps the durable user registry and the single active-session slot in
//! browser storage. Session reads degrade to "nothing stored" and session
//! writes are dropped with a warning. Registration is the exception: a
//! registry it cannot read or write fails the registration instead of
//! overwriting stored users.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use mochileros_core::{RegistrationForm, ValidationErrors};

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{SessionRecord, UserRecord};
use crate::services::avatar::read_avatar;
use crate::storage::{Storage, StorageError, keys, read_json, write_json};

/// Login form as submitted.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    /// Build a login form from raw input.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Session store service.
///
/// Constructed once per page load and shared by every component that needs
/// the logged-in state.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Create a session store on top of durable storage.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // =========================================================================
    // User Registry
    // =========================================================================

    /// Load every registered user.
    ///
    /// An unreadable registry yields an empty list; a single record that
    /// does not decode is skipped.
    #[must_use]
    pub fn load_users(&self) -> Vec<UserRecord> {
        match self.read_registry() {
            Ok(entries) => entries.into_iter().filter_map(decode_user).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read user registry");
                Vec::new()
            }
        }
    }

    /// Registry entries as stored. Kept undecoded so that a rewrite carries
    /// every existing record over verbatim.
    fn read_registry(&self) -> Result<Vec<Value>, StorageError> {
        Ok(read_json(self.storage.as_ref(), keys::USERS)?.unwrap_or_default())
    }

    /// Register a new user and log them in.
    ///
    /// Ages are checked against today's local date.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::register_on`].
    pub async fn register(&self, form: &RegistrationForm) -> Result<UserRecord, AuthError> {
        self.register_on(form, Local::now().date_naive()).await
    }

    /// Register a new user as of `today` and log them in.
    ///
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing every failed rule.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    /// Returns `AuthError::FileRead` if the avatar upload cannot be read.
    /// Returns `AuthError::Storage` if the registry cannot be read or the new
    /// record cannot be saved; stored records are left untouched and no
    /// session is started.
    pub async fn register_on(
        &self,
        form: &RegistrationForm,
        today: NaiveDate,
    ) -> Result<UserRecord, AuthError> {
        let registration = form.validate(today)?;

        if is_registered(&self.read_registry()?, registration.email.as_str()) {
            return Err(AuthError::DuplicateEmail);
        }

        let avatar = match &registration.avatar {
            Some(upload) => Some(read_avatar(upload).await?),
            None => None,
        };

        let user = UserRecord::from_registration(&registration, avatar);

        // Re-read after the avatar await; another page may have written meanwhile.
        let mut entries = self.read_registry()?;
        if is_registered(&entries, user.email.as_str()) {
            return Err(AuthError::DuplicateEmail);
        }
        entries.push(serde_json::to_value(&user).map_err(StorageError::from)?);
        write_json(self.storage.as_ref(), keys::USERS, &entries)?;

        tracing::info!(email = %user.email, "User registered");
        add_breadcrumb("auth", "User registered", None);

        self.start_session(&user);
        Ok(user)
    }

    /// Find the user matching `email` (case-insensitive) and `password` (exact).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email, a wrong
    /// password, or empty input.
    pub fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserRecord, AuthError> {
        let email = email.trim();
        let password = password.expose_secret();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        self.load_users()
            .into_iter()
            .find(|user| user.has_email(email) && user.password == password)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Check the login form, authenticate and start a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is empty.
    /// Returns `AuthError::InvalidCredentials` if authentication fails.
    pub fn login(&self, form: &LoginForm) -> Result<SessionRecord, AuthError> {
        if form.email.trim().is_empty() || form.password.expose_secret().is_empty() {
            return Err(ValidationErrors::single("email", "Completa correo y contraseña.").into());
        }

        let user = self.authenticate(&form.email, &form.password)?;
        Ok(self.start_session(&user))
    }

    // =========================================================================
    // Active Session
    // =========================================================================

    /// Make `user` the logged-in user, replacing any previous session.
    ///
    /// A failed write is logged and otherwise ignored; the returned record is
    /// what the page should display either way.
    pub fn start_session(&self, user: &UserRecord) -> SessionRecord {
        let session = SessionRecord::from(user);
        match write_json(self.storage.as_ref(), keys::SESSION, &session) {
            Ok(()) => {
                set_sentry_user(&session.login, Some(session.email.as_str()));
                add_breadcrumb("auth", "Session started", None);
                tracing::debug!(email = %session.email, "Session started");
            }
            Err(e) => tracing::warn!(error = %e, "Could not start session"),
        }
        session
    }

    /// The logged-in user, if any.
    ///
    /// A stored value that cannot be decoded is dropped.
    #[must_use]
    pub fn get_session(&self) -> Option<SessionRecord> {
        match read_json(self.storage.as_ref(), keys::SESSION) {
            Ok(session) => session,
            Err(e @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                self.remove_session_slot();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read session");
                None
            }
        }
    }

    /// Log out. Safe to call when nobody is logged in.
    pub fn clear_session(&self) {
        self.remove_session_slot();
        clear_sentry_user();
        add_breadcrumb("auth", "Session cleared", None);
    }

    fn remove_session_slot(&self) {
        if let Err(e) = self.storage.remove_item(keys::SESSION) {
            tracing::warn!(error = %e, "Could not clear session");
        }
    }

    /// Return the session, or run `on_missing` when nobody is logged in.
    pub fn require_session<F: FnOnce()>(&self, on_missing: F) -> Option<SessionRecord> {
        let session = self.get_session();
        if session.is_none() {
            on_missing();
        }
        session
    }
}

fn decode_user(entry: Value) -> Option<UserRecord> {
    serde_json::from_value(entry)
        .inspect_err(|e| tracing::warn!(error = %e, "Skipping unreadable user record"))
        .ok()
}

/// Whether any stored entry carries `email`, decodable or not.
fn is_registered(entries: &[Value], email: &str) -> bool {
    entries.iter().any(|entry| {
        entry
            .get("email")
            .and_then(Value::as_str)
            .is_some_and(|stored| stored.trim().to_lowercase() == email.trim().to_lowercase())
    })
}
