//! Session guards for protected pages.
//!
//! Provides guards for requiring a logged-in user before a page renders.

use crate::models::SessionRecord;
use crate::state::SiteState;
use crate::views::Navigation;

/// Alert shown when a protected page is opened without a session.
pub const LOGIN_REQUIRED: &str = "Debes iniciar sesión para acceder a esta página.";

/// Guard that requires a logged-in user.
///
/// If nobody is logged in, the page must alert and send the visitor home.
///
/// # Example
///
/// ```rust,ignore
/// fn profile_page(state: &SiteState) -> Result<String, Navigation> {
///     let RequireSession(session) = RequireSession::check(state)?;
///     Ok(format!("Hola, {}!", session.display_name()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionRecord);

impl RequireSession {
    /// Check for a session.
    ///
    /// # Errors
    ///
    /// Returns the navigation to perform when nobody is logged in.
    pub fn check(state: &SiteState) -> Result<Self, Navigation> {
        let mut rejection = None;
        let session = state.sessions().require_session(|| {
            tracing::debug!("Protected page opened without a session");
            rejection = Some(Navigation::alert_then(
                LOGIN_REQUIRED,
                state.config().home_url.clone(),
            ));
        });
        match (session, rejection) {
            (Some(session), _) => Ok(Self(session)),
            (None, Some(navigation)) => Err(navigation),
            (None, None) => Err(Navigation::to(state.config().home_url.clone())),
        }
    }
}
