//! Order entities - active orders and collected order history.
//!
//! An order is created `Placed`, moves forward through the delivery statuses,
//! and once collected is turned into a [`HistoryEntry`] and removed from the
//! active collection.

use crate::errors::Error;
use crate::store::{Collection, Record};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Delivery lifecycle of an order, in progression order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created by the buyer
    Placed,
    /// Sent out by the company
    Shipped,
    /// Confirmed by the carrier
    Confirmed,
    /// Ready to be collected
    Delivered,
}

impl OrderStatus {
    /// All statuses, in progression order
    pub const ALL: [Self; 4] = [Self::Placed, Self::Shipped, Self::Confirmed, Self::Delivered];

    /// Name as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::Shipped => "Shipped",
            Self::Confirmed => "Confirmed",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(Error::InvalidField { field: "status" })
    }
}

/// How the buyer receives the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Shipped to the buyer's address, with a surcharge
    Delivery,
    /// Picked up by the buyer
    Pickup,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivery => f.write_str("Delivery"),
            Self::Pickup => f.write_str("Pickup"),
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(Error::EmptyDeliveryMode)
        } else if s.eq_ignore_ascii_case("delivery") {
            Ok(Self::Delivery)
        } else if s.eq_ignore_ascii_case("pickup") {
            Ok(Self::Pickup)
        } else {
            Err(Error::InvalidField {
                field: "delivery_mode",
            })
        }
    }
}

/// Active order row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier for the order
    pub id: i64,
    /// Name (not login) of the buyer who placed the order
    pub buyer_name: String,
    /// Delivery address given at checkout
    pub address: String,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Name of the ordered item at the time of ordering
    pub item_name: String,
    /// Number of units, always positive
    pub quantity: u32,
    /// Total charged, including any delivery surcharge
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    /// Delivery or pickup
    pub delivery_mode: DeliveryMode,
    /// Day the order was placed
    pub order_date: NaiveDate,
}

impl Record for Order {
    const COLLECTION: Collection = Collection::Orders;
    const HEADER: &'static [&'static str] = &[
        "id",
        "buyer_name",
        "address",
        "status",
        "item_name",
        "quantity",
        "total_price",
        "delivery_mode",
        "order_date",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

/// Collected order row. Written once, never modified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ID the order had while active
    pub id: i64,
    /// Name of the buyer who placed the order
    pub buyer_name: String,
    /// Delivery address given at checkout
    pub address: String,
    /// Status at collection time, always `Delivered`
    pub status: OrderStatus,
    /// Name of the ordered item
    pub item_name: String,
    /// Number of units
    pub quantity: u32,
    /// Total charged
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    /// Delivery or pickup
    pub delivery_mode: DeliveryMode,
    /// Day the order was placed
    pub order_date: NaiveDate,
    /// Day the buyer collected the order
    pub delivery_date: NaiveDate,
}

impl HistoryEntry {
    /// Archives `order` as collected on `delivery_date`.
    #[must_use]
    pub fn from_order(order: Order, delivery_date: NaiveDate) -> Self {
        Self {
            id: order.id,
            buyer_name: order.buyer_name,
            address: order.address,
            status: order.status,
            item_name: order.item_name,
            quantity: order.quantity,
            total_price: order.total_price,
            delivery_mode: order.delivery_mode,
            order_date: order.order_date,
            delivery_date,
        }
    }
}

impl Record for HistoryEntry {
    const COLLECTION: Collection = Collection::OrderHistory;
    const HEADER: &'static [&'static str] = &[
        "id",
        "buyer_name",
        "address",
        "status",
        "item_name",
        "quantity",
        "total_price",
        "delivery_mode",
        "order_date",
        "delivery_date",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_progression_order() {
        assert!(OrderStatus::Placed < OrderStatus::Shipped);
        assert!(OrderStatus::Shipped < OrderStatus::Confirmed);
        assert!(OrderStatus::Confirmed < OrderStatus::Delivered);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("shipped".parse::<OrderStatus>().ok(), Some(OrderStatus::Shipped));
        assert_eq!(" Delivered ".parse::<OrderStatus>().ok(), Some(OrderStatus::Delivered));
        assert!(matches!(
            "lost".parse::<OrderStatus>(),
            Err(Error::InvalidField { field: "status" })
        ));
    }

    #[test]
    fn test_parse_delivery_mode() {
        assert_eq!("Delivery".parse::<DeliveryMode>().ok(), Some(DeliveryMode::Delivery));
        assert_eq!("pickup".parse::<DeliveryMode>().ok(), Some(DeliveryMode::Pickup));
        assert!(matches!("".parse::<DeliveryMode>(), Err(Error::EmptyDeliveryMode)));
        assert!(matches!(
            "drone".parse::<DeliveryMode>(),
            Err(Error::InvalidField {
                field: "delivery_mode"
            })
        ));
    }
}
