pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::OrderService;
pub use config::Config;
pub use db::{create_pool, DbPool};
use domain::ports::OrderStore;
pub use infrastructure::DieselOrderRepository;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::catalog::list_products,
        handlers::catalog::list_connections,
        handlers::catalog::reconcile_line,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
    ),
    components(schemas(
        handlers::catalog::ProductResponse,
        handlers::catalog::BusinessResponse,
        handlers::catalog::RawQuantity,
        handlers::catalog::ReconcileLineRequest,
        handlers::catalog::ReconcileLineResponse,
        handlers::orders::CreateOrderLineRequest,
        handlers::orders::CreateOrderRequest,
        handlers::orders::CreateOrderResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::orders::ListOrdersResponse,
        domain::order::OrderStatus,
        domain::order::Direction,
        domain::reconciler::EditKind,
        domain::reconciler::Step,
    )),
    tags(
        (name = "catalog", description = "Stores, products and line quantities"),
        (name = "orders", description = "Placing and tracking orders"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Register every route against an `OrderService<R>` stored as app data.
pub fn configure<R: OrderStore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(handlers::orders::create_order::<R>))
            .route("/{id}", web::get().to(handlers::orders::get_order::<R>)),
    )
    .service(
        web::scope("/businesses/{id}")
            .route(
                "/orders",
                web::get().to(handlers::orders::list_orders::<R>),
            )
            .route(
                "/connections",
                web::get().to(handlers::catalog::list_connections::<R>),
            ),
    )
    .route(
        "/stores/{id}/products",
        web::get().to(handlers::catalog::list_products::<R>),
    )
    .route(
        "/order-lines/reconcile",
        web::post().to(handlers::catalog::reconcile_line::<R>),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(OrderService::new(DieselOrderRepository::new(pool)));
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure::<DieselOrderRepository>)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
