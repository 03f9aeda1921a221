use anyhow::Result;
use tinyapp::{app, config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::load()?;

    app::run(config).await
}
