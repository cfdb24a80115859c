use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use kbot_core::{
    config::Config,
    github::{client::GithubClient, RepoReportBuilder},
    messaging::port::MessagingPort,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub repo_report: Arc<RepoReportBuilder>,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "kbot started"),
        Err(e) => warn!(error = %e, "get_me failed; continuing"),
    }
    info!(
        repository = %cfg.github_repository,
        api = %cfg.github_api_base,
        image = %cfg.bot_image_path.display(),
        "repo report configured"
    );

    let github = GithubClient::new(cfg.github_client_config())?;
    let repo_report = Arc::new(RepoReportBuilder::new(github, cfg.report_settings()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let state = Arc::new(AppState {
        cfg,
        messenger,
        repo_report,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
