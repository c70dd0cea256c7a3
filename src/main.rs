use dotenvy::dotenv;
use order_desk::{build_server, create_pool, run_migrations, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = create_pool(&config.database_url, config.pool_size).map_err(|e| {
        log::error!("failed to create database pool: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;
    run_migrations(&pool).map_err(|e| {
        log::error!("failed to run database migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(pool, &config.host, config.port)?.await
}
