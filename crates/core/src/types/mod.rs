//! Core types for Mochileros Viajeros.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod card;
pub mod email;

pub use card::{
    CardBrand, CardBrandError, CardExpiry, CardExpiryError, CardNumber, CardNumberError,
    format_card_number, luhn_valid,
};
pub use email::{Email, EmailError};
