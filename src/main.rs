use anyhow::Context;
use recordcast::{config::Settings, logging::init_logging, network::shutdown_signal, App};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    let logging = init_logging(&settings.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    let addr = settings.listen_address;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let app = App::build(settings)?;
    app.serve(listener, shutdown_signal()).await?;

    logging.shutdown();
    Ok(())
}
