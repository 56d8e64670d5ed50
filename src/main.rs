use quickstart::{
    token::{PetNameIdentityGenerator, TokenConfig, UniqueIdentityGenerator},
    AppState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickstart=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting video quickstart token server");

    let app_state = AppState::new(
        TokenConfig::new(),
        Arc::new(UniqueIdentityGenerator::new(PetNameIdentityGenerator::new())),
    );
    let app = quickstart::app(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(port, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    info!("Server running on http://localhost:{}", port);

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
