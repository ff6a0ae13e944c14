use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    CategoryName, Money, ProductCode, ProductName, ProductQuantity, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub product_code: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub product_code: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

/// Full-replacement changeset. `created_at` is never updated.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub product_code: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub quantity: i32,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            product_code: ProductCode::new(product.product_code)?,
            name: ProductName::new(product.name)?,
            category: CategoryName::new(product.category)?,
            price: Money::new(product.price_cents)?,
            quantity: ProductQuantity::new(product.quantity)?,
            created_at: product.created_at,
        })
    }
}

impl NewProduct {
    pub fn from_domain(product: &DomainNewProduct, created_at: NaiveDateTime) -> Self {
        Self {
            product_code: product.product_code.as_str().to_string(),
            name: product.name.as_str().to_string(),
            category: product.category.as_str().to_string(),
            price_cents: product.price.cents(),
            quantity: product.quantity.get(),
            created_at,
        }
    }
}

impl From<&DomainNewProduct> for ProductChangeset {
    fn from(product: &DomainNewProduct) -> Self {
        Self {
            product_code: product.product_code.as_str().to_string(),
            name: product.name.as_str().to_string(),
            category: product.category.as_str().to_string(),
            price_cents: product.price.cents(),
            quantity: product.quantity.get(),
        }
    }
}
