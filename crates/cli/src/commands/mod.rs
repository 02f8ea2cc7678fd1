//! CLI subcommands.
//!
//! Each command calls the same page handlers a browser shell would and logs
//! what the page would show.

pub mod account;
pub mod carousel;
pub mod purchase;
pub mod tips;

use mochileros_storefront::views::{FormOutcome, MessageKind, Navigation};
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The page rejected the submitted form.
    #[error("{0}")]
    Rejected(String),

    /// The page refused to open.
    #[error("Redirected to {0}")]
    Refused(String),

    /// A command argument is malformed.
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(&'static str, String),
}

/// Log what a form submission changed and fail if it was rejected.
pub(crate) fn show_outcome(outcome: &FormOutcome) -> Result<(), CommandError> {
    if let Some(alert) = &outcome.alert {
        tracing::info!(alert = %alert, "Alert");
    }
    for (field, message) in &outcome.field_errors {
        tracing::info!(field, "{message}");
    }
    if let Some(auth) = &outcome.auth {
        tracing::debug!(?auth, "Page chrome refreshed");
    }
    if let Some(navigation) = &outcome.navigation {
        show_navigation(navigation);
    }

    match outcome.message.kind {
        MessageKind::Error => Err(CommandError::Rejected(outcome.message.text.clone())),
        MessageKind::Success | MessageKind::Info => {
            if !outcome.message.text.is_empty() {
                tracing::info!("{}", outcome.message.text);
            }
            Ok(())
        }
    }
}

/// Log a navigation the page would perform.
pub(crate) fn show_navigation(navigation: &Navigation) {
    match navigation {
        Navigation::Redirect { to, after, alert } => {
            if let Some(alert) = alert {
                tracing::info!(alert = %alert, "Alert");
            }
            tracing::info!(to = %to, after_ms = after.as_millis(), "Redirect");
        }
        Navigation::Reload => tracing::info!("Reload"),
    }
}
