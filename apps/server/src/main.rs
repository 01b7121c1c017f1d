use anyhow::Context;
use autoani::domain::config::ApiConfig;
use autoani::kernel::config::load_config;
use autoani_server::{Server, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let cfg: ApiConfig = load_config(config_path.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    Server::builder().config(cfg).build().await?.run().await
}
