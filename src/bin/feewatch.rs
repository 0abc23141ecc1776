use {
    feewatch::{
        app::{App, AppSettings},
        config::Config,
        error::FeeWatchResult,
        history::HttpHistoryClient,
        stream::HttpEventSource,
        ui,
    },
    std::sync::Arc,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> FeeWatchResult<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr; the UI draws on the alternate screen
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env()?;

    log::info!("🚀 Starting feewatch...");
    log::info!("📊 Configuration:");
    log::info!("   SERVER_URL: {}", config.server_url);
    log::info!("   SOCKET_SERVER_URL: {}", config.socket_server_url);
    log::info!("   PAGE_SIZE: {}", config.page_size);
    log::info!("   STREAM_BUFFER_CAPACITY: {}", config.stream_buffer_capacity);
    log::info!("   RUST_LOG: {}", config.rust_log);

    let history = Arc::new(HttpHistoryClient::new(
        &config.server_url,
        config.request_timeout,
    )?);
    log::info!("🔌 History endpoint: {}", history.endpoint());

    let events = HttpEventSource::new(&config.socket_server_url)?;
    let mut app = App::open(AppSettings::from(&config), history, &events).await?;

    let result = ui::run_ui(&mut app).await;
    if let Err(e) = &result {
        log::error!("UI error: {}", e);
    }

    app.close();
    log::info!("✅ Shutdown complete");
    result
}
