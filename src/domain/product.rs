use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryName, Money, ProductCode, ProductId, ProductName, ProductQuantity};

/// A product record held in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub product_code: ProductCode,
    pub name: ProductName,
    pub category: CategoryName,
    pub price: Money,
    pub quantity: ProductQuantity,
    /// Assigned by the store on insert and never changed afterwards.
    pub created_at: NaiveDateTime,
}

/// Mutable state of a [`Product`], used both for inserts and full updates.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub product_code: ProductCode,
    pub name: ProductName,
    pub category: CategoryName,
    pub price: Money,
    pub quantity: ProductQuantity,
}
