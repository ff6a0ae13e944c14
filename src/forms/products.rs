use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{
    CategoryName, Money, ProductCode, ProductId, ProductName, ProductQuantity,
    TypeConstraintError,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, PageRequest, SortDirection};
use crate::repository::{AdvancedSearch, ProductFilter};

/// Treat empty or whitespace-only filter values as absent.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ToString::to_string)
}

fn page_request(
    page: Option<usize>,
    size: Option<usize>,
    sort_by: Option<&str>,
    sort_dir: Option<&str>,
    default_sort: &str,
) -> PageRequest {
    PageRequest::new(
        page.unwrap_or(1),
        size.unwrap_or(DEFAULT_ITEMS_PER_PAGE),
        sort_by.unwrap_or(default_sort),
        sort_dir.map_or(SortDirection::Asc, SortDirection::parse),
    )
}

fn parse_price(value: Option<&str>, field: &'static str) -> Result<Option<Money>, TypeConstraintError> {
    non_blank(value)
        .map(|v| Money::parse_for_field(&v, field))
        .transpose()
}

/// Query string of the product list and quick search.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProductListParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub keyword: Option<String>,
}

impl ProductListParams {
    pub fn page_request(&self) -> PageRequest {
        page_request(
            self.page,
            self.size,
            self.sort_by.as_deref(),
            self.sort_dir.as_deref(),
            "id",
        )
    }

    pub fn keyword(&self) -> Option<String> {
        non_blank(self.keyword.as_deref())
    }
}

/// Query string of the advanced search page.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AdvancedSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
}

#[derive(Debug, Error)]
pub enum SearchParamsError {
    #[error("Search parameters contain invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for SearchParamsError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl AdvancedSearchParams {
    pub fn page_request(&self) -> PageRequest {
        page_request(
            self.page,
            self.size,
            self.sort_by.as_deref(),
            self.sort_dir.as_deref(),
            "name",
        )
    }

    pub fn search(&self) -> Result<AdvancedSearch, SearchParamsError> {
        Ok(AdvancedSearch {
            name: non_blank(self.name.as_deref()),
            category: non_blank(self.category.as_deref()),
            min_price: parse_price(self.min_price.as_deref(), "minimum price")?,
            max_price: parse_price(self.max_price.as_deref(), "maximum price")?,
        })
    }
}

/// Query string accepted by the JSON product listing.
///
/// Any advanced field selects advanced search; otherwise a keyword selects
/// quick search; otherwise all products are listed.
#[derive(Debug, Default, Deserialize)]
pub struct ApiProductsParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub keyword: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ApiProductsParams {
    pub fn page_request(&self) -> PageRequest {
        page_request(
            self.page,
            self.size,
            self.sort_by.as_deref(),
            self.sort_dir.as_deref(),
            "id",
        )
    }

    pub fn filter(&self) -> Result<ProductFilter, SearchParamsError> {
        let search = AdvancedSearch {
            name: non_blank(self.name.as_deref()),
            category: non_blank(self.category.as_deref()),
            min_price: parse_price(self.min_price.as_deref(), "minimum price")?,
            max_price: parse_price(self.max_price.as_deref(), "maximum price")?,
        };
        if search != AdvancedSearch::default() {
            return Ok(ProductFilter::Advanced(search));
        }
        Ok(non_blank(self.keyword.as_deref()).map_or(ProductFilter::All, ProductFilter::Keyword))
    }
}

/// Create/update form. An empty `id` means insert.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SaveProductForm {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub product_code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1))]
    pub price: String,
    #[validate(range(min = 0))]
    pub quantity: i32,
}

impl From<&Product> for SaveProductForm {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.to_string()),
            product_code: product.product_code.to_string(),
            name: product.name.to_string(),
            category: product.category.to_string(),
            price: product.price.to_string(),
            quantity: product.quantity.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveProductFormPayload {
    pub id: Option<ProductId>,
    pub product: NewProduct,
}

#[derive(Debug, Error)]
pub enum SaveProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SaveProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SaveProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SaveProductForm> for SaveProductFormPayload {
    type Error = SaveProductFormError;

    fn try_from(value: SaveProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let id = match non_blank(value.id.as_deref()) {
            Some(raw) => {
                let raw: i32 = raw.trim().parse().map_err(|_| {
                    TypeConstraintError::InvalidValue(format!("product id: {raw}"))
                })?;
                Some(ProductId::new(raw)?)
            }
            None => None,
        };

        Ok(Self {
            id,
            product: NewProduct {
                product_code: ProductCode::new(value.product_code)?,
                name: ProductName::new(value.name)?,
                category: CategoryName::new(value.category)?,
                price: value.price.parse()?,
                quantity: ProductQuantity::new(value.quantity)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> SaveProductForm {
        SaveProductForm {
            id: Some(String::new()),
            product_code: "P-001".into(),
            name: "Green Tea".into(),
            category: "Tea".into(),
            price: "12.50".into(),
            quantity: 3,
        }
    }

    #[test]
    fn blank_id_means_insert() {
        let payload: SaveProductFormPayload = sample_form().try_into().unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.product.price.cents(), 1250);
        assert_eq!(payload.product.quantity.get(), 3);
    }

    #[test]
    fn present_id_means_update() {
        let form = SaveProductForm {
            id: Some("7".into()),
            ..sample_form()
        };
        let payload: SaveProductFormPayload = form.try_into().unwrap();
        assert_eq!(payload.id, Some(ProductId::new(7).unwrap()));
    }

    #[test]
    fn rejects_negative_quantity_and_price() {
        let form = SaveProductForm {
            quantity: -1,
            ..sample_form()
        };
        assert!(matches!(
            SaveProductFormPayload::try_from(form),
            Err(SaveProductFormError::Validation(_))
        ));

        let form = SaveProductForm {
            price: "-0.01".into(),
            ..sample_form()
        };
        assert!(SaveProductFormPayload::try_from(form).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let form = SaveProductForm {
            product_code: String::new(),
            ..sample_form()
        };
        assert!(matches!(
            SaveProductFormPayload::try_from(form),
            Err(SaveProductFormError::Validation(_))
        ));
    }

    #[test]
    fn list_params_apply_defaults() {
        let params = ProductListParams::default();
        let request = params.page_request();
        assert_eq!(request.page_index, 0);
        assert_eq!(request.page_size, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(request.sort.field, "id");
        assert_eq!(request.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn blank_keyword_is_absent() {
        let params = ProductListParams {
            keyword: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(params.keyword(), None);
    }

    #[test]
    fn advanced_params_normalize_blank_filters() {
        let params = AdvancedSearchParams {
            name: Some("".into()),
            category: Some("  ".into()),
            min_price: Some("10".into()),
            max_price: Some(" ".into()),
            ..Default::default()
        };
        let search = params.search().unwrap();
        assert_eq!(search.name, None);
        assert_eq!(search.category, None);
        assert_eq!(search.min_price, Some(Money::new(1000).unwrap()));
        assert_eq!(search.max_price, None);
        assert_eq!(params.page_request().sort.field, "name");
    }

    #[test]
    fn advanced_params_reject_malformed_price() {
        let params = AdvancedSearchParams {
            min_price: Some("ten".into()),
            ..Default::default()
        };
        assert!(params.search().is_err());
    }

    #[test]
    fn api_params_choose_filter_mode() {
        let params = ApiProductsParams {
            keyword: Some("tea".into()),
            ..Default::default()
        };
        assert_eq!(params.filter().unwrap(), ProductFilter::Keyword("tea".into()));

        let params = ApiProductsParams {
            keyword: Some("tea".into()),
            category: Some("Tea".into()),
            ..Default::default()
        };
        assert!(matches!(params.filter().unwrap(), ProductFilter::Advanced(_)));

        assert_eq!(
            ApiProductsParams::default().filter().unwrap(),
            ProductFilter::All
        );
    }
}
