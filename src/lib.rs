pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod vcs;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::AppError;
pub use logic::{CloneCoordinator, GraphBuilder, HISTORY_LIMIT, MAX_CHANGED_FILES};
pub use model::*;
pub use vcs::{GitBackend, Vcs, Workspace};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    let context = Arc::new(crate::api::handlers::AppContext {
        vcs: crate::vcs::GitBackend::new(),
        workspace: crate::vcs::Workspace::new(&config.workspace.dir),
    });

    // Create router with state
    let app = crate::api::routes::create_router().with_state(context);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
