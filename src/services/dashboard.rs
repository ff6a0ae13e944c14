use crate::domain::dashboard::{CategoryCount, DashboardStats};
use crate::repository::{ProductReader, ProductStatsReader, RepositoryResult};

use super::{ServiceError, ServiceResult};

/// Products with fewer units than this are listed as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;
/// Number of newest products shown on the dashboard.
pub const RECENT_PRODUCTS_LIMIT: usize = 5;

fn collect_stats<R>(repo: &R) -> RepositoryResult<DashboardStats>
where
    R: ProductReader + ProductStatsReader,
{
    let categories = repo.list_categories()?;
    let category_counts = categories
        .iter()
        .map(|category| {
            repo.count_products_by_category(category)
                .map(|count| CategoryCount {
                    category: category.clone(),
                    count,
                })
        })
        .collect::<RepositoryResult<Vec<_>>>()?;

    Ok(DashboardStats {
        total_count: repo.count_products()?,
        total_value: repo.total_inventory_value()?,
        average_price: repo.average_price()?,
        low_stock_products: repo.list_low_stock_products(LOW_STOCK_THRESHOLD)?,
        recent_products: repo.list_recent_products(RECENT_PRODUCTS_LIMIT)?,
        categories,
        category_counts,
    })
}

/// Collects every figure rendered on the dashboard.
///
/// Aggregates over an empty inventory are zero rather than missing.
pub fn show_dashboard<R>(repo: &R) -> ServiceResult<DashboardStats>
where
    R: ProductReader + ProductStatsReader,
{
    collect_stats(repo).map_err(|e| {
        log::error!("Failed to compute dashboard statistics: {e}");
        ServiceError::from(e)
    })
}
