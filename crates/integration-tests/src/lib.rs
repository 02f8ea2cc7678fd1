//! Integration tests for Mochileros Viajeros.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mochileros-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Registration, login, logout across page loads
//! - `purchase_flow` - Buy button, confirmation gate, purchase form
//! - `tips_flow` - Tip list seeding, ordering and cap
//! - `carousel` - Slide rotation with paused time
//! - `properties` - Property tests over the pure state machines
//!
//! Everything runs in memory; no browser, server or network is needed.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use mochileros_core::{AvatarUpload, PurchaseForm, RegistrationForm};
use mochileros_storefront::config::SiteConfig;
use mochileros_storefront::state::SiteState;
use mochileros_storefront::storage::{MemoryStorage, Storage};

/// The date every scenario runs on.
#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap_or_default()
}

/// Smallest valid PNG header; enough for an avatar upload.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// A browser: one origin-wide store shared by every tab and page load.
pub struct TestBrowser {
    pub config: SiteConfig,
    pub durable: Arc<MemoryStorage>,
}

impl Default for TestBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SiteConfig::default(),
            durable: Arc::new(MemoryStorage::new()),
        }
    }

    /// A fresh tab: shares durable storage, gets its own tab storage.
    #[must_use]
    pub fn open_tab(&self) -> SiteState {
        let durable: Arc<dyn Storage> = self.durable.clone();
        SiteState::new(self.config.clone(), durable, Arc::new(MemoryStorage::new()))
    }

    /// A page load in an existing tab: shares durable storage and the
    /// tab's own storage.
    #[must_use]
    pub fn load_page(&self, tab_storage: Arc<MemoryStorage>) -> SiteState {
        let durable: Arc<dyn Storage> = self.durable.clone();
        SiteState::new(self.config.clone(), durable, tab_storage)
    }
}

/// A registration for Ana, twenty years old on [`today`], with a PNG avatar.
#[must_use]
pub fn ana_registration() -> RegistrationForm {
    let birth = today()
        .checked_sub_months(Months::new(12 * 20))
        .unwrap_or_default();
    RegistrationForm {
        name: "Ana Gómez".to_string(),
        surname: "Gómez Díaz".to_string(),
        email: "a@b.com".to_string(),
        email_confirmation: Some("a@b.com".to_string()),
        birth_date: birth.format("%Y-%m-%d").to_string(),
        login: "anag1".to_string(),
        password: "Abcd12!@".to_string(),
        accepts_privacy: true,
        avatar: Some(AvatarUpload::from_bytes("ana.png", PNG_BYTES.to_vec())),
    }
}

/// A purchase that passes every rule on [`today`].
#[must_use]
pub fn valid_purchase() -> PurchaseForm {
    PurchaseForm {
        buyer_name: "Ana Gómez".to_string(),
        buyer_email: "a@b.com".to_string(),
        card_brand: "visa".to_string(),
        card_number: "4111 1111 1111 1111".to_string(),
        holder_name: "Ana Gómez".to_string(),
        expiry: "2027-01".to_string(),
        cvv: "123".to_string(),
    }
}
