use practice_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: loads configuration, sets up logging, builds the gateway and
/// serves the page routers behind it.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: invalid gateway configuration: {e}");
            std::process::exit(1);
        }
    };

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise gateway decisions at debug, HTTP traces at info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "practice_portal=debug,tower_http=info,axum=info".into());

    // 3. Log format follows APP_ENV.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    tracing::info!(
        protected = ?config.rules.protected_prefixes,
        auth_only = ?config.rules.auth_only_paths,
        admin_only = ?config.rules.admin_only_paths,
        login = %config.rules.login_path,
        landing = %config.rules.landing_path,
        admin_role_id = config.rules.admin_role_id,
        "Access gateway configured"
    );

    // 4. Router and Server Startup
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(config));

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("FATAL: failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {bind_addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server terminated: {e}");
        std::process::exit(1);
    }
}
