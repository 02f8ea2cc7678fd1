//! Mochileros Viajeros site library.
//!
//! The behavior behind the site's pages, without a browser: rotating
//! carousels, the local user registry and session, travel tips and the
//! purchase-entry gate. Page handlers in [`pages`] return view values that
//! an embedding shell (or the `mv-cli` binary) applies.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pages;
pub mod services;
pub mod state;
pub mod storage;
pub mod views;
