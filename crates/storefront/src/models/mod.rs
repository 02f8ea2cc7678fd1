//! Domain models for the storefront.
//!
//! These are the records persisted in browser storage. Field names follow
//! the JSON layout already stored by the site (`birthDate`, not
//! `birth_date`), so existing data keeps loading.

pub mod session;
pub mod tip;
pub mod user;

pub use session::SessionRecord;
pub use tip::TipRecord;
pub use user::UserRecord;
