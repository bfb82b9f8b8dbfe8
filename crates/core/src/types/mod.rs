//! Core types for Comanda.
//!
//! This module provides type-safe wrappers for the restaurant domain.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::Price;
pub use status::*;
