use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wardview::api::{self, ApiContext};
use wardview::{config, dataset};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let path = config::dataset_path();
    let dataset = match dataset::load_dataset(&path) {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!(path = %path.display(), "dataset load failed: {e}");
            std::process::exit(1);
        }
    };

    let ctx = ApiContext::new(Arc::new(dataset), config::uploads_dir());
    let mut server = match api::start_dashboard_server(ctx).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    tracing::info!("dashboard available at http://{}", server.addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
}
