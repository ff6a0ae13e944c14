use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::domain::product::Product;
use crate::forms::products::{
    AdvancedSearchParams, ProductListParams, SaveProductForm, SaveProductFormPayload,
};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::DieselRepository;
use crate::routes::{base_context, categories_or_empty, redirect, render_template};
use crate::services::ServiceError;
use crate::services::products::{
    advanced_search as advanced_search_service, delete_product as delete_product_service,
    list_products as list_products_service, save_product as save_product_service,
    show_product as show_product_service,
};

/// Sortable columns of the product table: field name and header label.
const SORT_FIELDS: [(&str, &str); 7] = [
    ("id", "ID"),
    ("product_code", "Code"),
    ("name", "Name"),
    ("category", "Category"),
    ("price", "Price"),
    ("quantity", "Quantity"),
    ("created_at", "Created"),
];

fn insert_listing(
    context: &mut Context,
    products: &Paginated<Product>,
    page: &PageRequest,
    base_url: &str,
) {
    context.insert("products", products);
    context.insert("sort_by", &page.sort.field);
    context.insert("sort_dir", page.sort.direction.as_str());
    context.insert("reverse_sort_dir", page.sort.direction.reverse().as_str());
    context.insert("base_url", base_url);
    context.insert("sort_fields", &SORT_FIELDS);
}

fn listing_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::InvalidSortField(_) | ServiceError::Form(_) => {
            FlashMessage::error(err.to_string()).send();
            redirect("/products")
        }
        err => {
            log::error!("Failed to render products page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductListParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page_request();
    let keyword = params.keyword();

    match list_products_service(keyword.clone(), page.clone(), repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "products");
            insert_listing(&mut context, &products, &page, "/products");
            if let Some(keyword) = &keyword {
                context.insert("keyword", keyword);
            }
            context.insert("search", &AdvancedSearchParams::default());
            context.insert("categories", &categories_or_empty(repo.get_ref()));
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => listing_error(err),
    }
}

#[get("/products/advanced-search")]
pub async fn advanced_search(
    params: web::Query<AdvancedSearchParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let page = params.page_request();
    let search = match params.search() {
        Ok(search) => search,
        Err(e) => return listing_error(e.into()),
    };

    match advanced_search_service(search, page.clone(), repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "products");
            insert_listing(&mut context, &products, &page, "/products/advanced-search");
            context.insert("search", &params);
            context.insert("categories", &categories_or_empty(repo.get_ref()));
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => listing_error(err),
    }
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    form: &SaveProductForm,
    errors: &[String],
) -> HttpResponse {
    let mut context = base_context(flash_messages, "products");
    context.insert("product", form);
    context.insert("errors", errors);
    render_template(tera, "products/form.html", &context)
}

#[get("/products/new")]
pub async fn new_product(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(&tera, &flash_messages, &SaveProductForm::default(), &[])
}

#[get("/products/edit/{product_id}")]
pub async fn edit_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => render_form(
            &tera,
            &flash_messages,
            &SaveProductForm::from(&product),
            &[],
        ),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to load product for editing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/save")]
pub async fn save_product(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SaveProductForm>,
) -> impl Responder {
    let payload: SaveProductFormPayload = match form.clone().try_into() {
        Ok(payload) => payload,
        Err(e) => return render_form(&tera, &flash_messages, &form, &[e.to_string()]),
    };

    match save_product_service(payload, repo.get_ref()) {
        Ok(_) => FlashMessage::success("Saved successfully!").send(),
        Err(err) => FlashMessage::error(format!("Error: {err}")).send(),
    }

    redirect("/products")
}

#[post("/products/delete/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(()) => FlashMessage::success("Product deleted!").send(),
        Err(err) => FlashMessage::error(format!("Error: {err}")).send(),
    }

    redirect("/products")
}
