//! View models and askama templates for page fragments.
//!
//! View models hold display-ready strings: prices already formatted, dates
//! already localised, action buttons already resolved from the status. The
//! templates only lay them out. Askama escapes every interpolated value.

mod cart;
mod employees;
mod format;
mod orders;
mod products;
mod stats;

use thiserror::Error;

pub use cart::{CartLineView, CartView};
pub use employees::{EmployeeCardView, EmployeeListView};
pub use format::{MISSING_DATE, format_timestamp};
pub use orders::{
    ActionButtonView, HistoryEntryView, HistoryListView, ItemLineView, OrderAction,
    OrderCardView, OrderListView, OrderStats, available_actions,
};
pub use products::{CatalogView, ManageProductsView, ProductCardView, ProductPickerView};
pub use stats::StatisticsView;

/// Errors raised while rendering a fragment.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),
}
