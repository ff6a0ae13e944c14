use std::process;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tera::Tera;

use product_inventory::db::establish_connection_pool;
use product_inventory::models::config::ServerConfig;
use product_inventory::repository::DieselRepository;
use product_inventory::routes::api::{api_v1_category_products, api_v1_dashboard, api_v1_products};
use product_inventory::routes::dashboard::show_dashboard;
use product_inventory::routes::main::index;
use product_inventory::routes::products::{
    advanced_search, delete_product, edit_product, new_product, save_product, show_products,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Signing key for flash cookies. Falls back to a random key, which
/// invalidates pending flash messages on restart.
fn flash_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            log::warn!("Invalid secret_key ({e}); generating a random one");
            Key::generate()
        }
        None => {
            log::warn!("No secret_key configured; generating a random one");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = conn.run_pending_migrations(MIGRATIONS) {
                log::error!("Failed to run migrations: {e}");
                process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get database connection: {e}");
            process::exit(1);
        }
    }

    let tera = match Tera::new(&format!("{}/**/*", server_config.templates_dir)) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            process::exit(1);
        }
    };

    let message_store =
        CookieMessageStore::builder(flash_key(server_config.secret_key.as_deref())).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting product inventory at http://{}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(
                web::scope("/api")
                    .service(api_v1_products)
                    .service(api_v1_category_products)
                    .service(api_v1_dashboard),
            )
            .service(index)
            .service(show_products)
            .service(advanced_search)
            .service(new_product)
            .service(edit_product)
            .service(save_product)
            .service(delete_product)
            .service(show_dashboard)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
