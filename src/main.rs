use food_diary::{app, config::AppConfig, state::AppState};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "food_diary=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Read while still single-threaded; see AppConfig::from_env.
    let config = AppConfig::from_env()?;
    tracing::info!(offset = %config.utc_offset, page_size = config.page_size, "configuration loaded");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let state = AppState::init(config)?;
            app::serve(app::build_app(state)).await
        })
}
