//! Guards run before a page renders.

pub mod auth;

pub use auth::RequireSession;
