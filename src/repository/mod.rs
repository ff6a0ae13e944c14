use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{CategoryName, Money, ProductCode, ProductId};
use crate::pagination::PageRequest;

pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Multi-field search; every present predicate must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedSearch {
    /// Substring of the product name.
    pub name: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
}

/// Predicate applied to products before ordering and pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProductFilter {
    /// No predicate.
    #[default]
    All,
    /// Name contains the keyword.
    Keyword(String),
    Advanced(AdvancedSearch),
}

/// Query parameters used when listing or searching products.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    pub filter: ProductFilter,
    pub page: PageRequest,
}

impl ProductListQuery {
    pub fn new(page: PageRequest) -> Self {
        Self {
            filter: ProductFilter::All,
            page,
        }
    }
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.filter = ProductFilter::Keyword(keyword.into());
        self
    }
    pub fn advanced(mut self, search: AdvancedSearch) -> Self {
        self.filter = ProductFilter::Advanced(search);
        self
    }
    pub fn filter(mut self, filter: ProductFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Product columns the store knows how to order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortField {
    Id,
    ProductCode,
    Name,
    Category,
    Price,
    Quantity,
    CreatedAt,
}

impl ProductSortField {
    /// Accepts snake_case column names and their camelCase spellings.
    pub fn parse(field: &str) -> RepositoryResult<Self> {
        match field {
            "id" => Ok(Self::Id),
            "product_code" | "productCode" => Ok(Self::ProductCode),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "price" => Ok(Self::Price),
            "quantity" => Ok(Self::Quantity),
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            other => Err(RepositoryError::InvalidSortField(other.to_string())),
        }
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied filter, returning the filtered
    /// total alongside the requested page.
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Whether any product carries the given code.
    fn product_code_exists(&self, code: &ProductCode) -> RepositoryResult<bool>;
    /// All products in a category, ordered by name.
    fn list_products_by_category(&self, category: &CategoryName) -> RepositoryResult<Vec<Product>>;
    /// Distinct categories in alphabetical order.
    fn list_categories(&self) -> RepositoryResult<Vec<CategoryName>>;
}

/// Aggregate queries feeding the dashboard.
pub trait ProductStatsReader {
    fn count_products(&self) -> RepositoryResult<usize>;
    fn count_products_by_category(&self, category: &CategoryName) -> RepositoryResult<usize>;
    /// Sum of price times quantity; zero for an empty store.
    fn total_inventory_value(&self) -> RepositoryResult<Money>;
    /// Mean price rounded to the cent; zero for an empty store.
    fn average_price(&self) -> RepositoryResult<Money>;
    /// Products whose quantity is strictly below `threshold`.
    fn list_low_stock_products(&self, threshold: i32) -> RepositoryResult<Vec<Product>>;
    /// The `limit` most recently created products, newest first.
    fn list_recent_products(&self, limit: usize) -> RepositoryResult<Vec<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Insert when `id` is `None`, otherwise replace the stored state.
    ///
    /// Fails with [`RepositoryError::ConstraintViolation`] when another
    /// product already uses the code and with [`RepositoryError::NotFound`]
    /// when updating a missing id.
    fn save_product(&self, id: Option<ProductId>, product: &NewProduct) -> RepositoryResult<Product>;
    /// Delete a product, returning the number of removed rows.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}
