use actix_web::{HttpResponse, Responder, get, web};

use crate::forms::products::ApiProductsParams;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::dashboard::show_dashboard;
use crate::services::products::{list_products_in_category, query_products};

fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(_)
        | ServiceError::InvalidSortField(_)
        | ServiceError::ConstraintViolation(_) => HttpResponse::BadRequest().body(err.to_string()),
        ServiceError::StoreUnavailable(_) => HttpResponse::InternalServerError().finish(),
    }
}

#[get("/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ApiProductsParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let filter = match params.filter() {
        Ok(filter) => filter,
        Err(e) => return error_response(e.into()),
    };

    match query_products(filter, params.page_request(), repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[get("/v1/categories/{category}/products")]
pub async fn api_v1_category_products(
    category: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_products_in_category(&category, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[get("/v1/dashboard")]
pub async fn api_v1_dashboard(repo: web::Data<DieselRepository>) -> impl Responder {
    match show_dashboard(repo.get_ref()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => error_response(err),
    }
}
