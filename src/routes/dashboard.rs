use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::dashboard::{LOW_STOCK_THRESHOLD, show_dashboard as show_dashboard_service};

#[get("/dashboard")]
pub async fn show_dashboard(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_dashboard_service(repo.get_ref()) {
        Ok(stats) => {
            let mut context = base_context(&flash_messages, "dashboard");
            context.insert("stats", &stats);
            context.insert("low_stock_threshold", &LOW_STOCK_THRESHOLD);
            render_template(&tera, "dashboard/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
