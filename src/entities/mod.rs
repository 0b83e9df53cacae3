//! Entity module - typed records for every persisted collection.
//! Each entity maps one-to-one onto a CSV row and implements
//! [`Record`](crate::store::Record) so the store can load and save it.

/// Buyer and company accounts
pub mod account;
/// Catalog items
pub mod item;
/// Orders and order history
pub mod order;

pub use account::{Account, Buyer, Company, Role};
pub use item::Item;
pub use order::{DeliveryMode, HistoryEntry, Order, OrderStatus};
