use gpx_pnezd::api::create_router;
use gpx_pnezd::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match Config::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    tracing::info!(srs = %config.target_srs, "default PNEZD reference system");

    let app = create_router(config);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind port");

    tracing::info!("Listening on http://0.0.0.0:3000");
    tracing::info!("  POST /api/gpx-to-pnezd (multipart/form-data: file + optional srs)");
    tracing::info!("  POST /api/pnezd-to-gpx (multipart/form-data: file + optional srs)");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
