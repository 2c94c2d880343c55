//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the desk into Discord: prefix and slash commands, the
//! component and modal handlers, shared bot state and the framework setup.

/// Discord command implementations (boards, listings, general)
pub mod commands;
/// Discord interaction handlers (buttons, selects, modals)
pub mod handlers;

use crate::{
    config::Settings,
    core::TicketDesk,
    errors::{Error, Result},
    store::SqlStore,
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Prefix of text commands, e.g. `dio!ticketboard`
pub const COMMAND_PREFIX: &str = "dio!";

/// The desk as the bot runs it, backed by `SQLite`.
pub type Desk = TicketDesk<SqlStore>;

/// Shared data available to all bot commands and interaction handlers.
pub struct BotData {
    /// Ticket lifecycle, ratings and vouches
    pub desk: Arc<Desk>,
    /// Guild ids, board options and tunables
    pub settings: Arc<Settings>,
}

impl BotData {
    /// Creates a new `BotData` instance from the desk and the loaded settings.
    #[must_use]
    pub const fn new(desk: Arc<Desk>, settings: Arc<Settings>) -> Self {
        Self { desk, settings }
    }
}

/// Handles command failures: rejections are shown to the invoker, internal
/// errors are logged and replaced with a generic message.
async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            if error.is_user_facing() {
                tracing::debug!("Command `{}` rejected: {error}", ctx.command().name);
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
            }
            let reply = poise::CreateReply::default()
                .content(error.user_message())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the framework, connects to Discord and runs until the gateway closes.
#[instrument(skip(token, settings, desk))]
pub async fn run_bot(token: String, settings: Arc<Settings>, desk: Arc<Desk>) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::rules(),
                commands::ticketboard(),
                commands::applicationboard(),
                commands::staffratings(),
                commands::vouches(),
                commands::allvouches(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(COMMAND_PREFIX.to_string()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(desk, settings))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
