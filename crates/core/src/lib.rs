//! Mochileros Core - Shared types and validation rules.
//!
//! This crate provides the pure building blocks used by every Mochileros
//! Viajeros component:
//! - `storefront` - Carousel, session store and page bindings
//! - `cli` - Command-line driver for the site behavior
//!
//! # Architecture
//!
//! The core crate contains only types and pure predicates - no storage, no
//! timers, no file reads. Forms are validated here and turned into typed,
//! normalized values; everything with side effects lives in `storefront`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails and payment cards
//! - [`validation`] - Field-level rules and aggregated validation errors
//! - [`forms`] - Registration, purchase and tip forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod forms;
pub mod types;
pub mod validation;

pub use forms::*;
pub use types::*;
pub use validation::{FieldError, ValidationErrors};
