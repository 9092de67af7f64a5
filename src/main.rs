use clap::Parser;

use flatfinder_server::{api_router, cors_layer, db, state::AppState, storage};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Database path
    #[arg(short, long, env = "DATABASE_PATH", default_value = "flatfinder.db")]
    db_path: String,

    /// Directory holding uploaded listing images
    #[arg(long, env = "UPLOAD_DIR", default_value = "static/uploads")]
    upload_dir: String,

    /// Browser origin allowed to call the API with credentials
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    cors_origin: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    tracing::info!("Initializing database at {}", args.db_path);
    let db = db::connect(&args.db_path).await;

    let uploads = storage::UploadStore::new(args.upload_dir.into(), storage::MAX_IMAGE_SIZE)
        .await
        .expect("Failed to initialize upload store");

    let state = AppState::new(db, uploads);
    let app = api_router(state).layer(cors_layer(&args.cors_origin));

    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("FlatFinder server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
