use axum::serve;
use repograph::api::handlers::AppContext;
use repograph::api::routes::create_router;
use repograph::config::AppConfig;
use repograph::vcs::{GitBackend, Workspace};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new().filter_level(LevelFilter::Info).init();

    println!("Repograph: Commit Graph Server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}, workspace={}",
        config.server.host, config.server.port, config.workspace.dir
    );

    let context = Arc::new(AppContext {
        vcs: GitBackend::new(),
        workspace: Workspace::new(&config.workspace.dir),
    });

    run_server(create_router().with_state(context), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Repograph server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
