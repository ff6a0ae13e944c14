use serde::Serialize;

use crate::domain::product::Product;
use crate::domain::types::{CategoryName, Money};

/// Number of products filed under a category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryCount {
    pub category: CategoryName,
    pub count: usize,
}

/// Aggregate inventory figures rendered on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_count: usize,
    pub total_value: Money,
    pub average_price: Money,
    pub low_stock_products: Vec<Product>,
    pub recent_products: Vec<Product>,
    pub categories: Vec<CategoryName>,
    pub category_counts: Vec<CategoryCount>,
}
