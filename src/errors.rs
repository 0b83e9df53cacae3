//! Unified error types and result handling.
//!
//! Every caller-facing failure is a distinct variant so a presentation layer can
//! render its own message. [`Error::category`] groups the variants into the
//! coarse classes a caller usually branches on.

use std::path::PathBuf;
use thiserror::Error;

use crate::entities::OrderStatus;

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or missing input
    Validation,
    /// Clashes with or misses existing records
    Conflict,
    /// The record is not in the state the operation requires
    State,
    /// Login or permission failures
    Auth,
    /// Backing store failures
    Io,
}

impl ErrorCategory {
    /// Get the string name for this category
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::State => "state",
            Self::Auth => "auth",
            Self::Io => "io",
        }
    }
}

/// Every failure the core reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be read or holds invalid values
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A form field is empty or malformed
    #[error("Invalid value for field '{field}'")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
    },

    /// Price text is not a non-negative decimal
    #[error("Invalid price: '{input}'")]
    InvalidPrice {
        /// Text as entered
        input: String,
    },

    /// Stock text is not a non-negative whole number
    #[error("Invalid stock quantity: '{input}'")]
    InvalidStock {
        /// Text as entered
        input: String,
    },

    /// Order form without an item name
    #[error("Item name cannot be empty")]
    EmptyItemName,

    /// Order quantity is not a positive whole number
    #[error("Invalid order quantity: '{input}'")]
    InvalidQuantity {
        /// Text as entered
        input: String,
    },

    /// Order form without a delivery mode
    #[error("Delivery mode cannot be empty")]
    EmptyDeliveryMode,

    /// Order total does not fit in a decimal
    #[error("Order total for {quantity} x '{name}' is too large")]
    TotalOverflow {
        /// Item being priced
        name: String,
        /// Requested quantity
        quantity: u32,
    },

    /// Import file header lacks required columns
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Missing column names, sorted
        columns: Vec<String>,
    },

    /// Login already used by a buyer or a company
    #[error("Login '{login}' is already taken")]
    DuplicateLogin {
        /// The clashing login
        login: String,
    },

    /// Company registration key does not match the configured one
    #[error("Wrong company registration key")]
    WrongCompanyKey,

    /// No item with this name or ID
    #[error("Item '{name}' not found")]
    ItemNotFound {
        /// Name or ID looked up
        name: String,
    },

    /// No active order with this ID visible to the caller
    #[error("Order {id} not found")]
    OrderNotFound {
        /// Order ID looked up
        id: i64,
    },

    /// Order quantity exceeds the item's stock
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Quantity asked for
        requested: u32,
        /// Quantity in stock
        available: u32,
    },

    /// Home delivery requested for a pickup-only item
    #[error("Item '{name}' cannot be delivered, pickup only")]
    DeliveryNotSupported {
        /// Item name
        name: String,
    },

    /// Collection attempted before the order reached `Delivered`
    #[error("Order {id} has not been delivered yet")]
    OrderNotDelivered {
        /// Order ID
        id: i64,
    },

    /// Status change that would move an order backwards
    #[error("Order status cannot move from {from} back to {to}")]
    InvalidTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// No account matches the login and password
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// The operation needs a logged-in account
    #[error("No account is logged in")]
    NotAuthenticated,

    /// The logged-in account has the wrong role
    #[error("This operation is not available to the current account")]
    Forbidden,

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A collection file is malformed or could not be kept consistent
    #[error("Store error in {path:?}: {message}")]
    Store {
        /// File concerned
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

impl Error {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. }
            | Self::InvalidField { .. }
            | Self::InvalidPrice { .. }
            | Self::InvalidStock { .. }
            | Self::EmptyItemName
            | Self::InvalidQuantity { .. }
            | Self::EmptyDeliveryMode
            | Self::TotalOverflow { .. }
            | Self::MissingColumns { .. } => ErrorCategory::Validation,
            Self::DuplicateLogin { .. }
            | Self::WrongCompanyKey
            | Self::ItemNotFound { .. }
            | Self::OrderNotFound { .. } => ErrorCategory::Conflict,
            Self::InsufficientStock { .. }
            | Self::DeliveryNotSupported { .. }
            | Self::OrderNotDelivered { .. }
            | Self::InvalidTransition { .. } => ErrorCategory::State,
            Self::InvalidCredentials | Self::NotAuthenticated | Self::Forbidden => {
                ErrorCategory::Auth
            }
            Self::Io(_) | Self::Csv(_) | Self::Store { .. } => ErrorCategory::Io,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
