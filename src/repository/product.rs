use chrono::Utc;
use diesel::dsl::{exists, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::Sqlite;

use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{CategoryName, Money, ProductCode, ProductId};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::pagination::SortDirection;
use crate::repository::{
    DieselRepository, ProductFilter, ProductListQuery, ProductReader, ProductSortField,
    ProductStatsReader, ProductWriter, RepositoryError, RepositoryResult,
};
use crate::schema::products;

/// `LIKE` pattern matching `value` anywhere, with wildcards in `value` escaped.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filtered(filter: &ProductFilter) -> products::BoxedQuery<'_, Sqlite> {
    let mut items = products::table.into_boxed::<Sqlite>();

    match filter {
        ProductFilter::All => {}
        ProductFilter::Keyword(keyword) => {
            items = items.filter(products::name.like(contains_pattern(keyword)).escape('\\'));
        }
        ProductFilter::Advanced(search) => {
            if let Some(name) = &search.name {
                items = items.filter(products::name.like(contains_pattern(name)).escape('\\'));
            }
            if let Some(category) = &search.category {
                items = items.filter(products::category.eq(category.as_str()));
            }
            if let Some(min_price) = search.min_price {
                items = items.filter(products::price_cents.ge(min_price.cents()));
            }
            if let Some(max_price) = search.max_price {
                items = items.filter(products::price_cents.le(max_price.cents()));
            }
        }
    }

    items
}

macro_rules! order_by {
    ($items:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $items.order($column.asc()),
            SortDirection::Desc => $items.order($column.desc()),
        }
    };
}

fn ordered<'a>(
    items: products::BoxedQuery<'a, Sqlite>,
    field: ProductSortField,
    direction: SortDirection,
) -> products::BoxedQuery<'a, Sqlite> {
    let items = match field {
        ProductSortField::Id => order_by!(items, products::id, direction),
        ProductSortField::ProductCode => order_by!(items, products::product_code, direction),
        ProductSortField::Name => order_by!(items, products::name, direction),
        ProductSortField::Category => order_by!(items, products::category, direction),
        ProductSortField::Price => order_by!(items, products::price_cents, direction),
        ProductSortField::Quantity => order_by!(items, products::quantity, direction),
        ProductSortField::CreatedAt => order_by!(items, products::created_at, direction),
    };
    // Stable pages when the sort column has duplicates.
    items.then_order_by(products::id.asc())
}

fn into_domain(rows: Vec<DbProduct>) -> RepositoryResult<Vec<Product>> {
    Ok(rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Product>, _>>()?)
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let sort_field = ProductSortField::parse(&query.page.sort.field)?;

        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        // Past i64::MAX the page is necessarily empty; never let it wrap.
        let offset = i64::try_from(query.page.offset()).unwrap_or(i64::MAX);
        let limit = i64::try_from(query.page.page_size).unwrap_or(i64::MAX);

        let rows = ordered(filtered(&query.filter), sort_field, query.page.sort.direction)
            .offset(offset)
            .limit(limit)
            .load::<DbProduct>(&mut conn)?;

        Ok((total, into_domain(rows)?))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let product = products::table
            .find(id.get())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn product_code_exists(&self, code: &ProductCode) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let found = diesel::select(exists(
            products::table.filter(products::product_code.eq(code.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }

    fn list_products_by_category(&self, category: &CategoryName) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.conn()?;

        let rows = products::table
            .filter(products::category.eq(category.as_str()))
            .order((products::name.asc(), products::id.asc()))
            .load::<DbProduct>(&mut conn)?;

        into_domain(rows)
    }

    fn list_categories(&self) -> RepositoryResult<Vec<CategoryName>> {
        let mut conn = self.conn()?;

        let categories = products::table
            .select(products::category)
            .distinct()
            .order(products::category.asc())
            .load::<String>(&mut conn)?;

        Ok(categories
            .into_iter()
            .map(CategoryName::new)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ProductStatsReader for DieselRepository {
    fn count_products(&self) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = products::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn count_products_by_category(&self, category: &CategoryName) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = products::table
            .filter(products::category.eq(category.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn total_inventory_value(&self) -> RepositoryResult<Money> {
        let mut conn = self.conn()?;
        let cents = products::table
            .select(sql::<BigInt>("COALESCE(SUM(price_cents * quantity), 0)"))
            .get_result::<i64>(&mut conn)?;
        Ok(Money::new(cents)?)
    }

    fn average_price(&self) -> RepositoryResult<Money> {
        let mut conn = self.conn()?;
        let total_cents = products::table
            .select(sql::<BigInt>("COALESCE(SUM(price_cents), 0)"))
            .get_result::<i64>(&mut conn)?;
        let count = products::table.count().get_result::<i64>(&mut conn)?;
        Ok(Money::mean(Money::new(total_cents)?, count as usize)?)
    }

    fn list_low_stock_products(&self, threshold: i32) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.conn()?;

        let rows = products::table
            .filter(products::quantity.lt(threshold))
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        into_domain(rows)
    }

    fn list_recent_products(&self, limit: usize) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.conn()?;

        let rows = products::table
            .order((products::created_at.desc(), products::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .load::<DbProduct>(&mut conn)?;

        into_domain(rows)
    }
}

impl ProductWriter for DieselRepository {
    fn save_product(&self, id: Option<ProductId>, product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let saved = conn.immediate_transaction(|conn| {
            let mut duplicate = products::table
                .filter(products::product_code.eq(product.product_code.as_str()))
                .select(products::id)
                .into_boxed::<Sqlite>();
            if let Some(id) = id {
                duplicate = duplicate.filter(products::id.ne(id.get()));
            }
            if duplicate.first::<i32>(conn).optional()?.is_some() {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "product code '{}' already exists",
                    product.product_code
                )));
            }

            match id {
                None => diesel::insert_into(products::table)
                    .values(DbNewProduct::from_domain(product, Utc::now().naive_utc()))
                    .get_result::<DbProduct>(conn)
                    .map_err(RepositoryError::from),
                Some(id) => diesel::update(products::table.find(id.get()))
                    .set(ProductChangeset::from(product))
                    .get_result::<DbProduct>(conn)
                    .optional()?
                    .ok_or(RepositoryError::NotFound),
            }
        })?;

        Ok(Product::try_from(saved)?)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(products::table.find(id.get())).execute(&mut conn)?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(contains_pattern("tea"), "%tea%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
