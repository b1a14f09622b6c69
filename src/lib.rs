pub mod api_doc;
pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use state::AppState;

use crate::api_doc::ApiDoc;
use crate::domain::errors::DomainError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("migrations failed: {e}")))?;
    Ok(())
}

/// Registers every API route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{customers, deliveries, items, orders, partners, website};

    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/customer")
                    .route("", web::get().to(customers::get_customer))
                    .route("", web::post().to(customers::create_customer))
                    .route("/fcm-token", web::put().to(customers::update_fcm_token))
                    .route("/addresses", web::get().to(customers::list_addresses))
                    .route("/addresses", web::post().to(customers::create_address))
                    .route("/addresses/{id}", web::put().to(customers::update_address)),
            )
            .route("/item-groups", web::get().to(items::get_all_item_groups))
            .route("/items", web::get().to(items::get_items))
            .route("/items/{route}", web::get().to(items::get_item))
            .service(
                web::scope("/orders")
                    .route("", web::get().to(orders::list_orders))
                    .route("", web::post().to(orders::create_order))
                    .route("/{id}", web::get().to(orders::get_order)),
            )
            .service(
                web::scope("/partner")
                    .route("", web::get().to(partners::get_partner))
                    .route("/signup", web::post().to(partners::signup))
                    .route("/fcm-token", web::put().to(partners::update_fcm_token))
                    .route("/deliveries", web::get().to(deliveries::list_deliveries))
                    .route(
                        "/deliveries/{id}/{action}",
                        web::post().to(deliveries::transition),
                    ),
            )
            .service(
                web::scope("/admin")
                    .route("/partners", web::post().to(partners::create_partner))
                    .route(
                        "/partners/{id}/signup-code",
                        web::post().to(partners::generate_signup_code),
                    )
                    .route(
                        "/orders/{id}/items-to-assign",
                        web::get().to(orders::get_items_to_assign),
                    )
                    .route(
                        "/orders/{id}/assignments",
                        web::post().to(orders::assign_partners),
                    ),
            )
            .route("/website/settings", web::get().to(website::get_settings)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
