use crate::domain::product::Product;
use crate::domain::types::{CategoryName, ProductId};
use crate::forms::products::SaveProductFormPayload;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::{
    AdvancedSearch, ProductFilter, ProductListQuery, ProductReader, ProductWriter,
    RepositoryError,
};

use super::{ServiceError, ServiceResult};

/// Log store failures; caller-facing conditions pass through quietly.
fn repository_error(action: &str, err: RepositoryError) -> ServiceError {
    match &err {
        RepositoryError::ConnectionError(_)
        | RepositoryError::DatabaseError(_)
        | RepositoryError::ValidationError(_) => log::error!("Failed to {action}: {err}"),
        _ => log::warn!("Could not {action}: {err}"),
    }
    err.into()
}

/// Run a filtered, sorted, paginated product query.
///
/// The totals of the returned page describe the filtered set, so
/// `total_pages` always agrees with the items.
pub fn query_products<R>(
    filter: ProductFilter,
    page: PageRequest,
    repo: &R,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader,
{
    let query = ProductListQuery::new(page).filter(filter);
    match repo.list_products(&query) {
        Ok((total, items)) => Ok(Paginated::new(items, &query.page, total)),
        Err(e) => Err(repository_error("list products", e)),
    }
}

/// Plain listing, or quick search by name when a keyword is given.
pub fn list_products<R>(
    keyword: Option<String>,
    page: PageRequest,
    repo: &R,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader,
{
    let filter = keyword.map_or(ProductFilter::All, ProductFilter::Keyword);
    query_products(filter, page, repo)
}

/// Advanced search combining the present predicates with AND.
pub fn advanced_search<R>(
    search: AdvancedSearch,
    page: PageRequest,
    repo: &R,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader,
{
    query_products(ProductFilter::Advanced(search), page, repo)
}

/// Distinct categories, alphabetically.
pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryName>>
where
    R: ProductReader,
{
    repo.list_categories()
        .map_err(|e| repository_error("list categories", e))
}

/// Products filed under `category`, ordered by name.
pub fn list_products_in_category<R>(category: &str, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    let category = CategoryName::new(category)?;
    repo.list_products_by_category(&category)
        .map_err(|e| repository_error("list products by category", e))
}

/// Load a product for editing.
pub fn show_product<R>(product_id: i32, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let Ok(product_id) = ProductId::new(product_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_error("get product", e)),
    }
}

/// Insert or fully replace a product.
///
/// A product code already used by a different product fails with
/// [`ServiceError::ConstraintViolation`] and leaves stored data untouched.
pub fn save_product<R>(payload: SaveProductFormPayload, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
{
    if payload.id.is_none() {
        match repo.product_code_exists(&payload.product.product_code) {
            Ok(true) => {
                return Err(ServiceError::ConstraintViolation(format!(
                    "product code '{}' already exists",
                    payload.product.product_code
                )));
            }
            Ok(false) => {}
            Err(e) => return Err(repository_error("check product code", e)),
        }
    }

    repo.save_product(payload.id, &payload.product)
        .map_err(|e| repository_error("save product", e))
}

/// Delete a product. Unknown identifiers are a no-op.
pub fn delete_product<R>(product_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let Ok(product_id) = ProductId::new(product_id) else {
        return Ok(());
    };

    match repo.delete_product(product_id) {
        Ok(_) => Ok(()),
        Err(e) => Err(repository_error("delete product", e)),
    }
}
