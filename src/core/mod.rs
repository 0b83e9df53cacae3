//! Core business logic - framework-agnostic accounts, catalog and order operations.
//!
//! [`Shop`] owns the record store and the in-memory mirror of every collection.
//! The operation modules take a `&mut Shop` (or `&Shop` for queries) the same
//! way a repository function takes a connection, so no component ever holds a
//! raw mutable collection of its own.

/// Registration, login and profile lookups
pub mod accounts;
/// Item management and stock bookkeeping
pub mod catalog;
/// Bulk item import from CSV files
pub mod import;
/// Order placement, status updates and collection
pub mod orders;
/// The currently authenticated identity
pub mod session;

use crate::{
    config::Settings,
    entities::{Buyer, Company, HistoryEntry, Item, Order},
    errors::Result,
    store::{RecordStore, Table},
};
use chrono::{Local, NaiveDate};
use session::Session;
use std::fmt;
use tracing::{debug, info};

/// Change notifications for a presentation layer that keeps listings on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopEvent {
    /// A buyer or company account was added
    AccountsChanged,
    /// Items were added, removed, imported, or their stock changed
    ItemsChanged,
    /// Active orders were added, updated, or collected
    OrdersChanged,
    /// An order was archived into history
    HistoryChanged,
}

/// Receives [`ShopEvent`]s after each committed mutation.
pub trait ShopListener {
    /// Called once per event, after the change is on disk.
    fn on_event(&self, event: ShopEvent);
}

impl<F: Fn(ShopEvent)> ShopListener for F {
    fn on_event(&self, event: ShopEvent) {
        self(event);
    }
}

/// Storefront service: record store, collection mirrors, and session.
pub struct Shop {
    pub(crate) store: RecordStore,
    pub(crate) settings: Settings,
    pub(crate) buyers: Table<Buyer>,
    pub(crate) companies: Table<Company>,
    pub(crate) items: Table<Item>,
    pub(crate) orders: Table<Order>,
    pub(crate) history: Table<HistoryEntry>,
    pub(crate) session: Session,
    listeners: Vec<Box<dyn ShopListener>>,
}

impl fmt::Debug for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shop")
            .field("data_dir", &self.store.data_dir())
            .field("buyers", &self.buyers.records().len())
            .field("companies", &self.companies.records().len())
            .field("items", &self.items.records().len())
            .field("orders", &self.orders.records().len())
            .field("history", &self.history.records().len())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Shop {
    /// Loads all five collections from `store`.
    ///
    /// Absent collection files are treated as empty, so this also works on a
    /// brand new data directory.
    pub fn open(store: RecordStore, settings: Settings) -> Result<Self> {
        let shop = Self {
            buyers: Table::load(&store)?,
            companies: Table::load(&store)?,
            items: Table::load(&store)?,
            orders: Table::load(&store)?,
            history: Table::load(&store)?,
            store,
            settings,
            session: Session::default(),
            listeners: Vec::new(),
        };

        info!(
            "Shop opened: {} buyers, {} companies, {} items, {} orders, {} archived",
            shop.buyers.records().len(),
            shop.companies.records().len(),
            shop.items.records().len(),
            shop.orders.records().len(),
            shop.history.records().len()
        );
        Ok(shop)
    }

    #[must_use]
    /// Settings this shop was opened with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    /// The current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Registers a listener for change notifications.
    pub fn subscribe<L: ShopListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn notify(&self, event: ShopEvent) {
        debug!("Notifying {} listeners of {:?}", self.listeners.len(), event);
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

    pub(crate) fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}
