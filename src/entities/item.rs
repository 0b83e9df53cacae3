//! Item entity - a catalog entry owned by a company.
//!
//! Stock is unsigned, so the non-negative invariant is carried by the type;
//! orders that would take it below zero are rejected before any subtraction.

use crate::store::{Collection, Record};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog item row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier for the item
    pub id: i64,
    /// Item name; orders refer to items by this name
    pub name: String,
    /// Unit price, never negative
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Units currently available
    pub stock: u32,
    /// Free-form description
    pub description: String,
    /// Whether the item may be ordered with home delivery
    pub delivery_eligible: bool,
    /// ID of the company that listed the item
    pub owner_company_id: i64,
    /// Path to the item picture, empty when there is none
    pub image_path: String,
}

impl Record for Item {
    const COLLECTION: Collection = Collection::Items;
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "price",
        "stock",
        "description",
        "delivery_eligible",
        "owner_company_id",
        "image_path",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}
