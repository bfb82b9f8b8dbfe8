//! Comanda Core - Shared domain types.
//!
//! This crate provides the types shared by every Comanda component:
//! - `client` - REST client, views and page controllers
//! - `cli` - Terminal front end
//! - `integration-tests` - Fake backend and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no rendering.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, order statuses and employee roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
