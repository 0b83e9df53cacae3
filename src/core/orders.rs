//! Order business logic - placement, status updates, collection and listings.
//!
//! Placing an order touches two collections: the new order goes into the
//! order list and the item loses stock. Every check runs before anything is
//! written, and both collections are committed together through
//! [`commit_pair`], so a buyer never ends up with an order whose stock was not
//! taken (or the reverse). Collecting an order moves it from the active list
//! into history the same way.
//!
//! Status updates are company-driven and only move forward:
//! `Placed -> Shipped -> Confirmed -> Delivered`. Statuses may be skipped but
//! never revisited. Collection is the buyer's step and requires `Delivered`.

use super::{Shop, ShopEvent, catalog, session::Identity};
use crate::{
    entities::{DeliveryMode, HistoryEntry, Item, Order, OrderStatus, Role},
    errors::{Error, Result},
    store::commit_pair,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Parses a positive whole order quantity.
///
/// # Errors
/// Returns `InvalidQuantity` for non-integers, zero, and negatives.
pub fn parse_quantity(input: &str) -> Result<u32> {
    match input.trim().parse::<u32>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(Error::InvalidQuantity {
            input: input.to_string(),
        }),
    }
}

/// Checks stock and delivery eligibility, and prices the order.
///
/// Totals that do not fit in a `Decimal` are rejected with `TotalOverflow`.
fn price_order(
    item: &Item,
    quantity: u32,
    mode: DeliveryMode,
    surcharge: Decimal,
) -> Result<Decimal> {
    if quantity > item.stock {
        return Err(Error::InsufficientStock {
            requested: quantity,
            available: item.stock,
        });
    }
    if mode == DeliveryMode::Delivery && !item.delivery_eligible {
        return Err(Error::DeliveryNotSupported {
            name: item.name.clone(),
        });
    }

    let overflow = || Error::TotalOverflow {
        name: item.name.clone(),
        quantity,
    };
    let total = item
        .price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(overflow)?;
    if mode == DeliveryMode::Delivery {
        return total.checked_add(surcharge).ok_or_else(overflow);
    }
    Ok(total)
}

/// Next order ID, past every active and collected order.
///
/// Collected orders keep their ID in history, so IDs are never handed out
/// twice.
fn next_order_id(shop: &Shop) -> i64 {
    shop.orders.next_id().max(shop.history.next_id())
}

/// Checks the raw order form fields in the order they appear on the form.
fn parse_order_form(item_name: &str, quantity: &str, delivery_mode: &str) -> Result<(u32, DeliveryMode)> {
    if item_name.trim().is_empty() {
        return Err(Error::EmptyItemName);
    }
    let quantity = parse_quantity(quantity)?;
    let mode = delivery_mode.parse::<DeliveryMode>()?;
    Ok((quantity, mode))
}

/// Computes what an order would cost without placing it.
///
/// # Errors
/// Fails with the same errors as [`place_order`] would for these inputs.
pub fn quote(shop: &Shop, item_name: &str, quantity: &str, delivery_mode: &str) -> Result<Decimal> {
    let (quantity, mode) = parse_order_form(item_name, quantity, delivery_mode)?;
    let item = catalog::find_by_name(shop, item_name)?;
    price_order(item, quantity, mode, shop.settings.delivery_surcharge)
}

/// Places an order for `buyer` and takes the quantity off the item's stock.
///
/// The address falls back to the buyer's profile address when left empty.
///
/// # Errors
/// Returns an error if:
/// - `buyer` is not a buyer (`Forbidden`)
/// - The item name is empty (`EmptyItemName`)
/// - The quantity is not a positive integer (`InvalidQuantity`)
/// - The delivery mode is empty or unknown (`EmptyDeliveryMode`, `InvalidField`)
/// - No item has this name (`ItemNotFound`)
/// - The quantity exceeds the stock (`InsufficientStock`)
/// - Delivery was requested for a pickup-only item (`DeliveryNotSupported`)
/// - The total does not fit in a decimal (`TotalOverflow`)
/// - Either collection cannot be written; nothing changes in that case
pub fn place_order(
    shop: &mut Shop,
    buyer: &Identity,
    item_name: &str,
    quantity: &str,
    delivery_mode: &str,
    address: &str,
) -> Result<Order> {
    buyer.ensure_role(Role::Buyer)?;
    let (quantity, mode) = parse_order_form(item_name, quantity, delivery_mode)?;

    let item = catalog::find_by_name(shop, item_name)?;
    let total_price = price_order(item, quantity, mode, shop.settings.delivery_surcharge)?;
    let item_id = item.id;

    let address = if address.trim().is_empty() {
        buyer
            .profile
            .as_ref()
            .map(|profile| profile.address.clone())
            .unwrap_or_default()
    } else {
        address.to_string()
    };

    let order = Order {
        id: next_order_id(shop),
        buyer_name: buyer.display_name.clone(),
        address,
        status: OrderStatus::Placed,
        item_name: item_name.to_string(),
        quantity,
        total_price,
        delivery_mode: mode,
        order_date: Shop::today(),
    };

    let staged_items = catalog::with_stock_decremented(shop.items.records(), item_id, quantity)?;
    let mut staged_orders = shop.orders.staged();
    staged_orders.push(order.clone());

    commit_pair(
        &shop.store,
        &mut shop.items,
        staged_items,
        &mut shop.orders,
        staged_orders,
    )?;

    info!(
        "Order {} placed by '{}': {} x '{}' ({}), total {}",
        order.id, order.buyer_name, order.quantity, order.item_name, order.delivery_mode, order.total_price
    );
    shop.notify(ShopEvent::OrdersChanged);
    shop.notify(ShopEvent::ItemsChanged);
    Ok(order)
}

/// Sets the status of an active order. Company only.
///
/// Setting the current status again is accepted and changes nothing.
///
/// # Errors
/// Returns an error if:
/// - `actor` is not a company (`Forbidden`)
/// - No active order has this ID (`OrderNotFound`)
/// - The new status comes before the current one (`InvalidTransition`)
/// - The order collection cannot be written
pub fn advance_status(
    shop: &mut Shop,
    actor: &Identity,
    order_id: i64,
    new_status: OrderStatus,
) -> Result<Order> {
    actor.ensure_role(Role::Company)?;

    let mut staged = shop.orders.staged();
    let order = staged
        .iter_mut()
        .find(|order| order.id == order_id)
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if new_status < order.status {
        return Err(Error::InvalidTransition {
            from: order.status,
            to: new_status,
        });
    }
    if new_status == order.status {
        debug!("Order {} already {}", order_id, new_status);
        return Ok(order.clone());
    }

    let previous = order.status;
    order.status = new_status;
    let updated = order.clone();
    shop.orders.commit(&shop.store, staged)?;

    info!(
        "Order {} moved from {} to {} by '{}'",
        order_id, previous, new_status, actor.login
    );
    shop.notify(ShopEvent::OrdersChanged);
    Ok(updated)
}

/// Moves a delivered order into history on behalf of the buyer who placed it.
///
/// # Errors
/// Returns an error if:
/// - `buyer` is not a buyer (`Forbidden`)
/// - The buyer has no active order with this ID (`OrderNotFound`)
/// - The order is not `Delivered` yet (`OrderNotDelivered`)
/// - Either collection cannot be written; nothing changes in that case
pub fn collect_order(shop: &mut Shop, buyer: &Identity, order_id: i64) -> Result<HistoryEntry> {
    buyer.ensure_role(Role::Buyer)?;

    let mut staged_orders = shop.orders.staged();
    let position = staged_orders
        .iter()
        .position(|order| order.id == order_id && order.buyer_name == buyer.display_name)
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if staged_orders[position].status != OrderStatus::Delivered {
        return Err(Error::OrderNotDelivered { id: order_id });
    }

    let order = staged_orders.remove(position);
    let entry = HistoryEntry::from_order(order, Shop::today());
    let mut staged_history = shop.history.staged();
    staged_history.push(entry.clone());

    commit_pair(
        &shop.store,
        &mut shop.history,
        staged_history,
        &mut shop.orders,
        staged_orders,
    )?;

    info!("Order {} collected by '{}'", order_id, buyer.display_name);
    shop.notify(ShopEvent::OrdersChanged);
    shop.notify(ShopEvent::HistoryChanged);
    Ok(entry)
}

/// Active orders placed under `buyer_name`.
#[must_use]
pub fn list_orders_for<'a>(shop: &'a Shop, buyer_name: &str) -> Vec<&'a Order> {
    shop.orders
        .records()
        .iter()
        .filter(|order| order.buyer_name == buyer_name)
        .collect()
}

/// Every active order, for company staff.
#[must_use]
pub fn list_all_orders(shop: &Shop) -> &[Order] {
    shop.orders.records()
}

/// Collected orders of `buyer_name`.
#[must_use]
pub fn history_for<'a>(shop: &'a Shop, buyer_name: &str) -> Vec<&'a HistoryEntry> {
    shop.history
        .records()
        .iter()
        .filter(|entry| entry.buyer_name == buyer_name)
        .collect()
}
