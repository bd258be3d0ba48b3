use cineplex::api::create_routes;
use cineplex::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let db = db_config.create_pool().await?;

    // Schema, reference data, and the upload directory must all exist
    // before the service accepts traffic.
    run_migrations(&db).await?;
    DatabaseSeeder::new(db.clone()).seed_all().await?;
    tokio::fs::create_dir_all(config.avatar_dir()).await?;

    let address = config.server_address();
    let app = create_routes(db, config);

    let listener = TcpListener::bind(&address).await?;
    info!("Movie recommendation server starting on http://{address}");

    axum::serve(listener, app).await?;

    Ok(())
}
