//! Comanda client library.
//!
//! Everything a staff front end needs to drive the restaurant backend:
//!
//! - [`config`] - Environment configuration
//! - [`api`] - REST client and wire types
//! - [`session`] - Authentication check shared by every page
//! - [`screen`] - The UI seam page controllers render through
//! - [`views`] - Askama view models and templates
//! - [`cart`] - In-memory order cart
//! - [`pages`] - Page controllers with typed events
//! - [`poller`] - Periodic dashboard refresh
//!
//! # Security
//!
//! The backend is the only authority on permissions and order transitions.
//! Role checks here only decide which controls are shown.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod pages;
pub mod poller;
pub mod screen;
pub mod session;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use cart::{Cart, CartItem};
pub use config::{ClientConfig, ConfigError};
pub use screen::{Element, Notice, NoticeLevel, Route, Screen};
pub use session::{Session, SessionCheck};
