//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - User registry and the active session
//! - `avatar` - Reading avatar uploads into data URLs
//! - `tips` - Travel tips list
//! - `purchase` - One-shot access to the purchase confirmation page

pub mod auth;
pub mod avatar;
pub mod purchase;
pub mod tips;
