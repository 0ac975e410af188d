use blog_api::{AppState, app, config::Config};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    let addr = config.bind_addr.clone();

    // Create application state
    let state = AppState::new(config);

    // Expired index pages are dropped in the background
    let page_cache = state.page_cache.clone();
    let sweep_every = page_cache.ttl().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            page_cache.cleanup();
        }
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    info!("Server running on http://{}", addr);
    info!("API Endpoints:");
    info!("  GET    /health                        - Health check");
    info!("  POST   /auth/signup                   - Create account");
    info!("  GET    /auth/login                    - Login entry point");
    info!("  POST   /auth/login                    - Login");
    info!("  GET    /users/me                      - Current author (auth)");
    info!("  GET    /                              - All posts (cached, paginated)");
    info!("  GET    /group/:slug                   - Group posts (paginated)");
    info!("  GET    /groups                        - List groups");
    info!("  POST   /groups                        - Create group (auth)");
    info!("  GET    /profile/:username             - Author posts (paginated)");
    info!("  POST   /profile/:username/follow      - Follow author (auth)");
    info!("  POST   /profile/:username/unfollow    - Unfollow author (auth)");
    info!("  GET    /follow                        - Followed authors' posts (auth)");
    info!("  GET    /create                        - Post form (auth)");
    info!("  POST   /create                        - Create post (auth)");
    info!("  GET    /posts/:id                     - Post with comments");
    info!("  GET    /posts/:id/edit                - Edit form (auth, owner only)");
    info!("  POST   /posts/:id/edit                - Edit post (auth, owner only)");
    info!("  POST   /posts/:id/comment             - Add comment (auth)");

    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
