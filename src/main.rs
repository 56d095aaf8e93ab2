use steamsearch::client::create_catalog_client;
use steamsearch::config::loader::ConfigLoader;
use steamsearch::observability::{ClientMetrics, init_tracing};
use steamsearch::view::runtime::Runtime;
use tokio::io::BufReader;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let tokio_runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = tokio_runtime.block_on(explore());
    // stdin 读取阻塞在后台线程上，不等待它结束
    tokio_runtime.shutdown_background();
    result
}

async fn explore() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    let _log_guard = init_tracing(&config.logging)?;
    info!(
        app = %config.app_name,
        environment = %config.environment,
        base_url = %config.service.base_url,
        "Starting SteamSearch explorer..."
    );

    let client = create_catalog_client(&config.service)?;
    info!("Catalog client initialized");

    let runtime = Runtime::new(client, ClientMetrics::default());
    let stdin = BufReader::new(tokio::io::stdin());
    runtime.run(stdin, std::io::stdout()).await?;

    info!("SteamSearch explorer stopped");
    Ok(())
}
