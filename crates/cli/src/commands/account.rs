//! Account commands: register, login, logout, whoami.

use std::path::PathBuf;

use clap::Args;
use mochileros_core::{AvatarUpload, RegistrationForm};
use mochileros_storefront::pages;
use mochileros_storefront::services::auth::LoginForm;
use mochileros_storefront::state::SiteState;

use super::{CommandError, show_navigation, show_outcome};

/// Registration form fields.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// First name (at least 3 characters)
    #[arg(long)]
    name: String,

    /// Surnames (two words of at least 3 characters)
    #[arg(long)]
    surname: String,

    /// Email address
    #[arg(short, long)]
    email: String,

    /// Repeated email address
    #[arg(long)]
    email_confirmation: Option<String>,

    /// Birth date (`YYYY-MM-DD`)
    #[arg(long)]
    birth_date: String,

    /// Login (at least 5 characters)
    #[arg(long)]
    login: String,

    /// Password
    #[arg(short, long)]
    password: String,

    /// Accept the privacy policy
    #[arg(long)]
    accept_privacy: bool,

    /// Avatar image (webp, png, jpg or jpeg)
    #[arg(long)]
    avatar: Option<PathBuf>,
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        Self {
            name: args.name,
            surname: args.surname,
            email: args.email,
            email_confirmation: args.email_confirmation,
            birth_date: args.birth_date,
            login: args.login,
            password: args.password,
            accepts_privacy: args.accept_privacy,
            avatar: args.avatar.map(AvatarUpload::from_path),
        }
    }
}

/// Register and log in.
pub async fn register(state: &SiteState, args: RegisterArgs) -> Result<(), CommandError> {
    let form = RegistrationForm::from(args);
    show_outcome(&pages::register(state, &form).await)
}

/// Log in.
pub fn login(state: &SiteState, email: String, password: String) -> Result<(), CommandError> {
    show_outcome(&pages::login(state, &LoginForm::new(email, password)))
}

/// Log out as if the button on `page` was pressed (home page by default).
pub fn logout(state: &SiteState, page: Option<&str>) -> Result<(), CommandError> {
    let current = match page {
        Some(page) => state
            .config()
            .base_url
            .join(page)
            .map_err(|e| CommandError::InvalidArgument("page", e.to_string()))?,
        None => state.config().home_url.clone(),
    };
    show_navigation(&pages::logout(state, &current));
    Ok(())
}

/// Log the current session.
pub fn whoami(state: &SiteState) {
    let view = state.auth_view();
    if view.is_logged_in() {
        tracing::info!(sidebar = %view.sidebar_name, "Hola, {}", view.display_name);
    } else {
        tracing::info!(login = %view.login_href, "Not logged in");
    }
}
