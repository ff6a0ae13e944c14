use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration};

use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{CategoryName, Money, ProductCode, ProductId};
use crate::pagination::SortDirection;
use crate::repository::{
    ProductFilter, ProductListQuery, ProductReader, ProductSortField, ProductStatsReader,
    ProductWriter, RepositoryError, RepositoryResult,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    products: Mutex<Vec<Product>>,
    fail: bool,
}

impl TestRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            fail: false,
        }
    }

    /// Repository whose every call fails as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            products: Mutex::new(vec![]),
            fail: true,
        }
    }

    fn snapshot(&self) -> RepositoryResult<Vec<Product>> {
        if self.fail {
            return Err(RepositoryError::ConnectionError("database is down".into()));
        }
        Ok(self.products.lock().unwrap().clone())
    }

    fn matches(filter: &ProductFilter, product: &Product) -> bool {
        let name = product.name.to_lowercase();
        match filter {
            ProductFilter::All => true,
            ProductFilter::Keyword(keyword) => name.contains(&keyword.to_lowercase()),
            ProductFilter::Advanced(search) => {
                search
                    .name
                    .as_ref()
                    .is_none_or(|n| name.contains(&n.to_lowercase()))
                    && search
                        .category
                        .as_ref()
                        .is_none_or(|c| product.category.as_str() == c)
                    && search.min_price.is_none_or(|min| product.price >= min)
                    && search.max_price.is_none_or(|max| product.price <= max)
            }
        }
    }

    fn compare(field: ProductSortField, a: &Product, b: &Product) -> Ordering {
        match field {
            ProductSortField::Id => a.id.cmp(&b.id),
            ProductSortField::ProductCode => a.product_code.cmp(&b.product_code),
            ProductSortField::Name => a.name.cmp(&b.name),
            ProductSortField::Category => a.category.cmp(&b.category),
            ProductSortField::Price => a.price.cmp(&b.price),
            ProductSortField::Quantity => a.quantity.cmp(&b.quantity),
            ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let field = ProductSortField::parse(&query.page.sort.field)?;
        let mut items = self.snapshot()?;
        items.retain(|p| Self::matches(&query.filter, p));
        items.sort_by(|a, b| {
            let ordering = Self::compare(field, a, b);
            let ordering = match query.page.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then(a.id.cmp(&b.id))
        });
        let total = items.len();
        let items = items
            .into_iter()
            .skip(query.page.offset())
            .take(query.page.page_size)
            .collect();
        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.snapshot()?.into_iter().find(|p| p.id == id))
    }

    fn product_code_exists(&self, code: &ProductCode) -> RepositoryResult<bool> {
        Ok(self.snapshot()?.iter().any(|p| &p.product_code == code))
    }

    fn list_products_by_category(&self, category: &CategoryName) -> RepositoryResult<Vec<Product>> {
        let mut items = self.snapshot()?;
        items.retain(|p| &p.category == category);
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    fn list_categories(&self) -> RepositoryResult<Vec<CategoryName>> {
        let categories: BTreeSet<CategoryName> =
            self.snapshot()?.into_iter().map(|p| p.category).collect();
        Ok(categories.into_iter().collect())
    }
}

impl ProductStatsReader for TestRepository {
    fn count_products(&self) -> RepositoryResult<usize> {
        Ok(self.snapshot()?.len())
    }

    fn count_products_by_category(&self, category: &CategoryName) -> RepositoryResult<usize> {
        Ok(self
            .snapshot()?
            .iter()
            .filter(|p| &p.category == category)
            .count())
    }

    fn total_inventory_value(&self) -> RepositoryResult<Money> {
        let cents = self
            .snapshot()?
            .iter()
            .map(|p| p.price.cents() * i64::from(p.quantity.get()))
            .sum();
        Ok(Money::new(cents)?)
    }

    fn average_price(&self) -> RepositoryResult<Money> {
        let items = self.snapshot()?;
        let total: i64 = items.iter().map(|p| p.price.cents()).sum();
        Ok(Money::mean(Money::new(total)?, items.len())?)
    }

    fn list_low_stock_products(&self, threshold: i32) -> RepositoryResult<Vec<Product>> {
        let mut items = self.snapshot()?;
        items.retain(|p| p.quantity.get() < threshold);
        Ok(items)
    }

    fn list_recent_products(&self, limit: usize) -> RepositoryResult<Vec<Product>> {
        let mut items = self.snapshot()?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items.truncate(limit);
        Ok(items)
    }
}

impl ProductWriter for TestRepository {
    fn save_product(&self, id: Option<ProductId>, product: &NewProduct) -> RepositoryResult<Product> {
        if self.fail {
            return Err(RepositoryError::ConnectionError("database is down".into()));
        }
        let mut products = self.products.lock().unwrap();
        if products
            .iter()
            .any(|p| p.product_code == product.product_code && Some(p.id) != id)
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "product code '{}' already exists",
                product.product_code
            )));
        }

        match id {
            Some(id) => {
                let existing = products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                existing.product_code = product.product_code.clone();
                existing.name = product.name.clone();
                existing.category = product.category.clone();
                existing.price = product.price;
                existing.quantity = product.quantity;
                Ok(existing.clone())
            }
            None => {
                let next_id = products.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
                let created_at = DateTime::from_timestamp(0, 0).unwrap().naive_utc()
                    + Duration::seconds(i64::from(next_id));
                let saved = Product {
                    id: ProductId::new(next_id)?,
                    product_code: product.product_code.clone(),
                    name: product.name.clone(),
                    category: product.category.clone(),
                    price: product.price,
                    quantity: product.quantity,
                    created_at,
                };
                products.push(saved.clone());
                Ok(saved)
            }
        }
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        if self.fail {
            return Err(RepositoryError::ConnectionError("database is down".into()));
        }
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(before - products.len())
    }
}
