//! General Discord commands - ping, help, rules, and other utility commands.
//! This module contains simple commands that don't touch the desk.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, COMMAND_PREFIX, handlers::views},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let entries = [
            ("ticketboard", "Post the ticket board to create a ticket."),
            ("applicationboard", "Post the staff application board."),
            ("staffratings", "Show staff ratings."),
            ("vouches [user] [page]", "Show vouches written by a user."),
            ("allvouches [page]", "Show every vouch, newest first."),
            ("rules", "Show the server rules."),
            ("ping", "Check that the bot is responsive."),
        ];

        let embed = serenity::CreateEmbed::default()
            .title("Ticket Bot Commands")
            .color(0x002E_CC71)
            .fields(
                entries
                    .iter()
                    .map(|(usage, what)| (format!("{COMMAND_PREFIX}{usage}"), *what, false)),
            );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the server rules; staff can page on to the staff guide.
    #[poise::command(slash_command, prefix_command, guild_only)]
    pub async fn rules(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .embed(views::rules_embed(views::RULES_PAGE))
                .components(views::rules_buttons(ctx.author().id.get())),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
