//! Page handlers for the site.
//!
//! Each handler takes the page state and the submitted form, calls the
//! stores, and returns what the page must show next. Nothing here touches a
//! document or the browser history directly.
//!
//! # Page Structure
//!
//! ```text
//! mochileros_viajeros.html  - Home; carousels, "buy" buttons
//! acceso.html               - Login and registration forms
//! compra.html               - Purchase confirmation (requires a "buy" in this tab)
//! consejos.html             - Travel tips list and form
//!
//! # Every page
//! logout button             - Clear the session
//! ```

pub mod auth;
pub mod purchase;
pub mod tips;

pub use auth::{login, logout, protected_page, register, register_on};
pub use purchase::{buy, enter_confirmation, submit_purchase, submit_purchase_on};
pub use tips::{submit_tip, tips_page};
