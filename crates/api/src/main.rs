use anyhow::Context;

use demandcast_forecast::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    demandcast_observability::init();

    let addr = std::env::var(demandcast_api::ENV_ADDR).unwrap_or_else(|_| {
        tracing::info!(
            "{} not set; using {}",
            demandcast_api::ENV_ADDR,
            demandcast_api::DEFAULT_ADDR
        );
        demandcast_api::DEFAULT_ADDR.to_string()
    });

    let settings = Settings::from_env();
    let app = demandcast_api::app::build_app(settings).context("invalid forecast settings")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        horizon = settings.horizon,
        band = %settings.forecast.band,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
