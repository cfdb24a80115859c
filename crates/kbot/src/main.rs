use std::sync::Arc;

use kbot_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), kbot_core::Error> {
    kbot_core::logging::init("kbot")?;

    let cfg = Arc::new(Config::load()?);

    kbot_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| kbot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
