//! Plain-text rendering of listings for the terminal.

use crate::{
    core::session::Profile,
    entities::{HistoryEntry, Item, Order},
};
use rust_decimal::Decimal;
use std::fmt::Write as _;

/// Formats an amount with two decimal places.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Renders the catalog, one item per line.
#[must_use]
pub fn items_table(items: &[&Item]) -> String {
    if items.is_empty() {
        return "No items listed.\n".to_string();
    }

    let mut out = format!(
        "{:>4}  {:<24} {:>10} {:>6}  {:<8} {}\n",
        "ID", "Name", "Price", "Stock", "Delivery", "Description"
    );
    for item in items {
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:>10} {:>6}  {:<8} {}",
            item.id,
            item.name,
            format_money(item.price),
            item.stock,
            if item.delivery_eligible { "yes" } else { "pickup" },
            item.description
        );
    }
    out
}

/// Renders active orders. `with_buyer` adds the buyer column company staff see.
#[must_use]
pub fn orders_table(orders: &[&Order], with_buyer: bool) -> String {
    if orders.is_empty() {
        return "No active orders.\n".to_string();
    }

    let mut out = format!(
        "{:>4}  {:<24} {:>4} {:>10}  {:<10} {:<9}",
        "ID", "Item", "Qty", "Total", "Date", "Status"
    );
    if with_buyer {
        out.push_str(" Buyer");
    }
    out.push('\n');

    for order in orders {
        let _ = write!(
            out,
            "{:>4}  {:<24} {:>4} {:>10}  {:<10} {:<9}",
            order.id,
            order.item_name,
            order.quantity,
            format_money(order.total_price),
            order.order_date,
            order.status
        );
        if with_buyer {
            let _ = write!(out, " {}", order.buyer_name);
        }
        out.push('\n');
    }
    out
}

/// Renders collected orders.
#[must_use]
pub fn history_table(entries: &[&HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No collected orders yet.\n".to_string();
    }

    let mut out = format!(
        "{:>4}  {:<24} {:>4} {:>10}  {:<10} {}\n",
        "ID", "Item", "Qty", "Total", "Ordered", "Collected"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:>4} {:>10}  {:<10} {}",
            entry.id,
            entry.item_name,
            entry.quantity,
            format_money(entry.total_price),
            entry.order_date,
            entry.delivery_date
        );
    }
    out
}

/// Multi-line card with the buyer profile fields.
#[must_use]
pub fn profile_card(profile: &Profile) -> String {
    let avatar = if profile.avatar_path.is_empty() {
        "(none)"
    } else {
        profile.avatar_path.as_str()
    };
    format!(
        "Name:    {}\nAddress: {}\nPhone:   {}\nAvatar:  {}\n",
        profile.name, profile.address, profile.phone, avatar
    )
}
