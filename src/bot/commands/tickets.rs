//! Board commands - post the ticket selector and the application buttons.
//!
//! The boards carry no state of their own; every option is encoded into the
//! component ids, so a board keeps working across restarts.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::views},
        errors::{Error, Result},
    };
    use tracing::info;

    /// Posts the ticket board with one option per configured ticket kind.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_CHANNELS"
    )]
    pub async fn ticketboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let kinds = &ctx.data().settings.ticket_kinds;
        if kinds.is_empty() {
            ctx.say("❌ No ticket kinds are configured.").await?;
            return Ok(());
        }

        ctx.send(
            poise::CreateReply::default()
                .content("🎫 Select a ticket type below:")
                .components(views::ticket_board(kinds)),
        )
        .await?;
        info!(channel_id = ctx.channel_id().get(), "Ticket board posted");
        Ok(())
    }

    /// Posts the application board with one button per application kind.
    #[poise::command(
        slash_command,
        prefix_command,
        aliases("application"),
        guild_only,
        required_permissions = "MANAGE_CHANNELS"
    )]
    pub async fn applicationboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let kinds = &ctx.data().settings.application_kinds;
        if kinds.is_empty() {
            ctx.say("❌ No application kinds are configured.").await?;
            return Ok(());
        }

        ctx.send(
            poise::CreateReply::default()
                .content("Click a button below to apply:")
                .components(views::application_board(kinds)),
        )
        .await?;
        info!(channel_id = ctx.channel_id().get(), "Application board posted");
        Ok(())
    }
}

pub use inner::*;
