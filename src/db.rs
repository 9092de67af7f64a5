use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;

pub async fn connect(db_path: &str) -> DatabaseConnection {
    // Ensure parent directory exists
    if let Some(parent) = Path::new(db_path).parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let url = format!("sqlite:{db_path}?mode=rwc");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

async fn run_migrations(pool: &SqlitePool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        tracing::error!("Database migration failed: {}", e);
        // We probably shouldn't continue if migrations failed
        panic!("Database migration failed: {}", e);
    }

    tracing::info!("Database migrations applied successfully");
}
