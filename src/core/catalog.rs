//! Catalog business logic - item creation, removal, lookup and stock bookkeeping.
//!
//! Items are looked up by exact name when ordering, because that is how buyers
//! refer to them. Duplicate names are allowed and the first listed item wins;
//! callers that know the ID should use [`find_by_id`] instead.

use super::{Shop, ShopEvent};
use crate::{
    entities::Item,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

/// Raw item form input as typed by a company user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    /// Item name
    pub name: String,
    /// Price text, parsed with [`parse_price`]
    pub price: String,
    /// Stock text, parsed with [`parse_stock`]
    pub stock: String,
    /// Free-form description
    pub description: String,
    /// Whether home delivery is offered
    pub delivery_eligible: bool,
    /// Picture path, stored as given
    pub image_path: String,
}

/// Parses a non-negative price.
///
/// # Errors
/// Returns `InvalidPrice` if the text is not a decimal number or is negative.
pub fn parse_price(input: &str) -> Result<Decimal> {
    let invalid = || Error::InvalidPrice {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    let price = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid());
    }
    Ok(price)
}

/// Parses a non-negative whole stock quantity.
///
/// # Errors
/// Returns `InvalidStock` if the text is not a non-negative integer.
pub fn parse_stock(input: &str) -> Result<u32> {
    input.trim().parse::<u32>().map_err(|_| Error::InvalidStock {
        input: input.to_string(),
    })
}

/// Validates the form and builds an item with the given ID.
pub(crate) fn build_item(id: i64, owner_id: i64, fields: NewItem) -> Result<Item> {
    if fields.name.trim().is_empty() {
        return Err(Error::InvalidField { field: "name" });
    }
    let price = parse_price(&fields.price)?;
    let stock = parse_stock(&fields.stock)?;

    Ok(Item {
        id,
        name: fields.name.trim().to_string(),
        price,
        stock,
        description: fields.description,
        delivery_eligible: fields.delivery_eligible,
        owner_company_id: owner_id,
        image_path: fields.image_path,
    })
}

/// Adds a new item owned by `owner_id` and persists the catalog.
///
/// # Errors
/// Returns an error if:
/// - The name is empty (`InvalidField`)
/// - The price is not a non-negative number (`InvalidPrice`)
/// - The stock is not a non-negative integer (`InvalidStock`)
/// - The catalog cannot be written
pub fn add_item(shop: &mut Shop, owner_id: i64, fields: NewItem) -> Result<Item> {
    let item = build_item(shop.items.next_id(), owner_id, fields)?;

    let mut staged = shop.items.staged();
    staged.push(item.clone());
    shop.items.commit(&shop.store, staged)?;

    info!(
        "Company {} added item '{}' (id {}, stock {})",
        owner_id, item.name, item.id, item.stock
    );
    shop.notify(ShopEvent::ItemsChanged);
    Ok(item)
}

/// Removes an item and persists the catalog.
///
/// Orders that mention the item are left alone; they carry the item name, not
/// a reference.
///
/// # Errors
/// Returns `ItemNotFound` if no item has this ID.
pub fn remove_item(shop: &mut Shop, item_id: i64) -> Result<Item> {
    let mut staged = shop.items.staged();
    let position = staged
        .iter()
        .position(|item| item.id == item_id)
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })?;
    let removed = staged.remove(position);
    shop.items.commit(&shop.store, staged)?;

    info!("Removed item '{}' (id {})", removed.name, removed.id);
    shop.notify(ShopEvent::ItemsChanged);
    Ok(removed)
}

/// Finds the first item whose name matches exactly.
///
/// # Errors
/// Returns `ItemNotFound` if no item has this name.
pub fn find_by_name<'a>(shop: &'a Shop, name: &str) -> Result<&'a Item> {
    shop.items
        .records()
        .iter()
        .find(|item| item.name == name)
        .ok_or_else(|| Error::ItemNotFound {
            name: name.to_string(),
        })
}

/// Finds an item by its unique ID.
///
/// # Errors
/// Returns `ItemNotFound` if no item has this ID.
pub fn find_by_id(shop: &Shop, item_id: i64) -> Result<&Item> {
    shop.items
        .records()
        .iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })
}

/// Returns a copy of `items` with `quantity` taken off the stock of `item_id`.
pub(crate) fn with_stock_decremented(
    items: &[Item],
    item_id: i64,
    quantity: u32,
) -> Result<Vec<Item>> {
    let mut staged = items.to_vec();
    let item = staged
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })?;

    item.stock = item
        .stock
        .checked_sub(quantity)
        .ok_or(Error::InsufficientStock {
            requested: quantity,
            available: item.stock,
        })?;
    debug!("Item {} stock {} after taking {}", item_id, item.stock, quantity);
    Ok(staged)
}

/// Takes `quantity` units off an item's stock and persists the catalog.
///
/// # Errors
/// Returns `InsufficientStock` if `quantity` exceeds the current stock, and
/// `ItemNotFound` for an unknown ID. Nothing changes on failure.
pub fn decrement_stock(shop: &mut Shop, item_id: i64, quantity: u32) -> Result<Item> {
    let staged = with_stock_decremented(shop.items.records(), item_id, quantity)?;
    shop.items.commit(&shop.store, staged)?;
    shop.notify(ShopEvent::ItemsChanged);
    find_by_id(shop, item_id).cloned()
}

/// All items, in listing order.
#[must_use]
pub fn list_items(shop: &Shop) -> &[Item] {
    shop.items.records()
}

/// Items listed by one company.
#[must_use]
pub fn list_items_for_company(shop: &Shop, owner_id: i64) -> Vec<&Item> {
    shop.items
        .records()
        .iter()
        .filter(|item| item.owner_company_id == owner_id)
        .collect()
}
