//! Shared test utilities for the storefront core.
//!
//! This module provides helpers that open a shop on a throwaway data directory
//! and fill it with accounts and items using sensible defaults.

use crate::{
    config::Settings,
    core::{
        Shop,
        accounts::{self, Registration},
        catalog::{self, NewItem},
        session::Identity,
    },
    entities::{Item, Role},
    errors::Result,
    store::RecordStore,
};
use rust_decimal::Decimal;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Builds an item record directly, bypassing validation.
#[must_use]
pub fn sample_item(id: i64, name: &str, price: Decimal, stock: u32) -> Item {
    Item {
        id,
        name: name.to_string(),
        price,
        stock,
        description: format!("{name} description"),
        delivery_eligible: true,
        owner_company_id: 1,
        image_path: String::new(),
    }
}

/// Settings pointing at `dir`.
#[must_use]
pub fn test_settings(dir: &TempDir) -> Settings {
    Settings {
        data_dir: dir.path().join("data"),
        images_dir: dir.path().join("images"),
        ..Settings::default()
    }
}

/// Opens an empty shop in a fresh temporary directory.
///
/// The `TempDir` must be kept alive for as long as the shop is used.
pub fn setup_shop() -> Result<(TempDir, Shop)> {
    init_test_tracing();
    let dir = TempDir::new()?;
    let settings = test_settings(&dir);
    let store = RecordStore::open(&settings.data_dir)?;
    let shop = Shop::open(store, settings)?;
    Ok((dir, shop))
}

/// Item form input.
#[must_use]
pub fn item_form(name: &str, price: &str, stock: &str, delivery_eligible: bool) -> NewItem {
    NewItem {
        name: name.to_string(),
        price: price.to_string(),
        stock: stock.to_string(),
        description: String::new(),
        delivery_eligible,
        image_path: String::new(),
    }
}

/// Buyer registration form with valid defaults.
///
/// # Defaults
/// * `address`: "1 Main St"
/// * `phone`: "5550100"
/// * `password`: "password"
#[must_use]
pub fn buyer_form(name: &str, login: &str) -> Registration {
    Registration {
        name: name.to_string(),
        address: "1 Main St".to_string(),
        phone: "5550100".to_string(),
        login: login.to_string(),
        password: "password".to_string(),
        key: String::new(),
        avatar_path: String::new(),
    }
}

/// Company registration form carrying the default company key.
#[must_use]
pub fn company_form(login: &str) -> Registration {
    Registration {
        name: "Acme".to_string(),
        address: "2 Industrial Way".to_string(),
        phone: "5550199".to_string(),
        login: login.to_string(),
        password: "password".to_string(),
        key: Settings::default().company_key,
        avatar_path: String::new(),
    }
}

/// Sets up a shop with one "Widget" item: price 10.00, stock 5, deliverable,
/// owned by company 1. No accounts are registered.
pub fn setup_with_item() -> Result<(TempDir, Shop, Item)> {
    let (dir, mut shop) = setup_shop()?;
    let item = catalog::add_item(&mut shop, 1, item_form("Widget", "10.00", "5", true))?;
    Ok((dir, shop, item))
}

/// Sets up a shop with company "acme", buyer "Alice" (login "alice") and the
/// "Widget" item listed by acme. Nobody is logged in.
pub fn setup_market() -> Result<(TempDir, Shop, Item)> {
    let (dir, mut shop) = setup_shop()?;
    let company = accounts::register(&mut shop, Role::Company, company_form("acme"))?;
    accounts::register(&mut shop, Role::Buyer, buyer_form("Alice", "alice"))?;
    let item = catalog::add_item(
        &mut shop,
        company.id(),
        item_form("Widget", "10.00", "5", true),
    )?;
    Ok((dir, shop, item))
}

/// Logs in as the buyer created by [`setup_market`].
pub fn login_buyer(shop: &mut Shop) -> Result<Identity> {
    accounts::authenticate(shop, "alice", "password")
}

/// Logs in as the company created by [`setup_market`].
pub fn login_company(shop: &mut Shop) -> Result<Identity> {
    accounts::authenticate(shop, "acme", "password")
}
