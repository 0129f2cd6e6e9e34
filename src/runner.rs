//! Process wiring: bot client, relay, aggregator and the teloxide dispatcher.

use crate::bot::handlers::{self, get_user_id_safe, inbound_event, Command};
use crate::bot::TelegramGateway;
use crate::config::Settings;
use crate::links::LinkReplacer;
use crate::relay::{spawn_media_group_aggregator, AggregatorConfig, DispatchGateway, Relay};
use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Runs the bot until Ctrl-C, then flushes buffered albums.
///
/// # Errors
///
/// Returns an error if the link patterns fail to build or the aggregator task
/// panics.
pub async fn run_bot(settings: Arc<Settings>) -> Result<()> {
    let replacer = Arc::new(LinkReplacer::new(settings.replacement_link.clone())?);
    info!(
        categories = replacer.table().categories().count(),
        "Link replacer initialized."
    );

    let bot = Bot::new(settings.bot_token.clone());
    let gateway: Arc<dyn DispatchGateway> = Arc::new(TelegramGateway::new(bot.clone()));

    let shutdown = CancellationToken::new();
    let config = AggregatorConfig::new(settings.media_group_quiet_interval());
    let (groups, aggregator) =
        spawn_media_group_aggregator(Arc::clone(&gateway), config, shutdown.clone());
    info!(
        quiet_ms = settings.media_group_quiet_ms,
        "Media group aggregator started."
    );

    let relay = Arc::new(Relay::new(replacer, gateway, groups));

    info!("Bot is running...");

    Dispatcher::builder(bot, setup_handler())
        .dependencies(dptree::deps![relay, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, flushing pending media groups...");
    shutdown.cancel();
    let stats = aggregator.await?;
    info!(
        groups = stats.groups_flushed,
        items = stats.items_flushed,
        failures = stats.dispatch_failures,
        "Shutdown complete."
    );
    Ok(())
}

/// Update routing: known commands, ignored unknown commands, everything else
/// goes to the relay.
#[must_use]
pub fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(|t| t.starts_with('/')))
                .endpoint(ignore_command),
        )
        .branch(dptree::endpoint(handle_message))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    relay: Arc<Relay>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => handlers::start(bot, msg, relay).await,
        Command::Help => handlers::help(bot, msg).await,
        Command::Status => handlers::status(bot, msg, relay).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn ignore_command(msg: Message) -> Result<(), teloxide::RequestError> {
    debug!(
        user_id = get_user_id_safe(&msg),
        "Ignoring unknown command"
    );
    respond(())
}

async fn handle_message(msg: Message, relay: Arc<Relay>) -> Result<(), teloxide::RequestError> {
    match inbound_event(&msg) {
        Some(event) => relay.handle(event).await,
        None => debug!(
            chat_id = msg.chat.id.0,
            message_id = msg.id.0,
            "Ignoring unsupported message"
        ),
    }
    respond(())
}
