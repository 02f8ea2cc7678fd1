//! Login, registration and logout handlers.

use chrono::{Local, NaiveDate};
use url::Url;

use mochileros_core::RegistrationForm;

use crate::error::AppError;
use crate::middleware::RequireSession;
use crate::models::SessionRecord;
use crate::services::auth::LoginForm;
use crate::state::SiteState;
use crate::views::{FormOutcome, Navigation};

/// Shown while the registration redirect is pending.
pub const REGISTERED: &str = "Registro completado. Redirigiendo...";

// =============================================================================
// Login
// =============================================================================

/// Handle login form submission.
///
/// On success the form is cleared, the visitor is greeted and the chrome is
/// refreshed in place; there is no navigation.
pub fn login(state: &SiteState, form: &LoginForm) -> FormOutcome {
    match state.sessions().login(form) {
        Ok(session) => {
            tracing::info!(email = %session.email, "Login");
            FormOutcome::success(format!("¡Bienvenido {}!", session.display_name()))
                .with_auth(state.auth_view())
        }
        Err(e) => FormOutcome::failure(&AppError::from(e)).with_auth(state.auth_view()),
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Handle registration form submission, checking ages against today.
pub async fn register(state: &SiteState, form: &RegistrationForm) -> FormOutcome {
    register_on(state, form, Local::now().date_naive()).await
}

/// Handle registration form submission as of `today`.
///
/// On success the visitor is logged in and sent to the login page after the
/// configured delay.
pub async fn register_on(
    state: &SiteState,
    form: &RegistrationForm,
    today: NaiveDate,
) -> FormOutcome {
    match state.sessions().register_on(form, today).await {
        Ok(user) => {
            tracing::info!(email = %user.email, "Registration");
            FormOutcome::success(REGISTERED)
                .with_auth(state.auth_view())
                .with_navigation(Navigation::delayed(
                    state.config().login_url.clone(),
                    state.config().redirect_delay,
                ))
        }
        Err(e) => FormOutcome::failure(&AppError::from(e)),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle a logout button on the page at `current`.
///
/// The login page reloads itself; every other page goes home.
pub fn logout(state: &SiteState, current: &Url) -> Navigation {
    state.sessions().clear_session();
    tracing::info!("Logout");
    if state.config().is_login_page(current) {
        Navigation::Reload
    } else {
        Navigation::to(state.config().home_url.clone())
    }
}

// =============================================================================
// Protected Pages
// =============================================================================

/// Open a page that requires a session.
///
/// # Errors
///
/// Returns an alert followed by a redirect home when nobody is logged in.
pub fn protected_page(state: &SiteState) -> Result<SessionRecord, Navigation> {
    RequireSession::check(state).map(|RequireSession(session)| session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::SiteConfig;
    use crate::views::MessageKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Ana".to_string(),
            surname: "Gómez Díaz".to_string(),
            email: "ana@b.com".to_string(),
            email_confirmation: Some("ANA@b.com".to_string()),
            birth_date: "2000-02-29".to_string(),
            login: "anag1".to_string(),
            password: "Abcd12!@".to_string(),
            accepts_privacy: true,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_register_redirects_to_login_after_delay() {
        let state = SiteState::in_memory(SiteConfig::default());
        let outcome = register_on(&state, &form(), today()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.message.text, REGISTERED);
        assert!(outcome.reset_form);
        assert!(outcome.auth.as_ref().unwrap().is_logged_in());
        assert_eq!(
            outcome.navigation,
            Some(Navigation::delayed(
                state.config().login_url.clone(),
                Duration::from_millis(1200)
            ))
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_shows_message() {
        let state = SiteState::in_memory(SiteConfig::default());
        register_on(&state, &form(), today()).await;
        let outcome = register_on(&state, &form(), today()).await;

        assert_eq!(outcome.message.kind, MessageKind::Error);
        assert_eq!(outcome.message.text, "Ese correo ya está registrado.");
        assert!(outcome.navigation.is_none());
    }

    #[tokio::test]
    async fn test_login_greets_and_refreshes_chrome() {
        let state = SiteState::in_memory(SiteConfig::default());
        register_on(&state, &form(), today()).await;
        state.sessions().clear_session();

        let outcome = login(&state, &LoginForm::new("ANA@B.COM", "Abcd12!@"));
        assert_eq!(outcome.message.text, "¡Bienvenido Ana!");
        assert_eq!(outcome.auth.unwrap().display_name, "Ana");
        assert!(outcome.navigation.is_none());
    }

    #[test]
    fn test_login_failure_keeps_logged_out_chrome() {
        let state = SiteState::in_memory(SiteConfig::default());
        let outcome = login(&state, &LoginForm::new("nadie@b.com", "Abcd12!@"));
        assert_eq!(outcome.message.text, "Credenciales no válidas. Intenta de nuevo.");
        assert!(!outcome.auth.unwrap().is_logged_in());

        let outcome = login(&state, &LoginForm::new("", ""));
        assert_eq!(outcome.message.text, "Completa correo y contraseña.");
    }

    #[test]
    fn test_logout_reloads_login_page_otherwise_goes_home() {
        let state = SiteState::in_memory(SiteConfig::default());
        let config = state.config().clone();

        assert_eq!(logout(&state, &config.login_url), Navigation::Reload);
        assert_eq!(
            logout(&state, &config.confirmation_url),
            Navigation::to(config.home_url.clone())
        );
        assert!(!state.auth_view().is_logged_in());
    }

    #[test]
    fn test_protected_page_without_session() {
        let state = SiteState::in_memory(SiteConfig::default());
        assert!(matches!(
            protected_page(&state),
            Err(Navigation::Redirect { alert: Some(_), .. })
        ));
    }
}
