use activities_server::{app, Config, DataContext, Mediator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let context = DataContext::open(&config.db_path)?;
    let app = app(Mediator::new(context));

    let addr = config.addr();
    tracing::info!(%addr, db = %config.db_path.display(), "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
