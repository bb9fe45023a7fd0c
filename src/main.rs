use calcserve::{app, config::AppConfig, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let _log_guard = telemetry::init(&config.log)?;

    let addr = config.bind_addr();
    let app_state = AppState::init(config).await?;
    let router = app::build_app(app_state);

    app::serve(router, &addr).await
}
