//! Restaurant backend REST API.
//!
//! This module provides:
//! - [`ApiClient`] for every endpoint the pages use
//! - Request/response types mirroring the backend's JSON
//! - [`ApiError`] with helpers for turning failures into staff-facing messages

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    ApiMessage, AuthStatus, CreatedOrder, Employee, HistoryEntry, LoginRequest, NewEmployee,
    NewOrder, Order, OrderItem, Product, ProductInput, Statistics, StatusUpdate,
};
