//! Rating and vouch listings.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::views},
        core::vouch::VouchPage,
        errors::{Error, Result},
        models::VouchScope,
    };
    use poise::serenity_prelude as serenity;

    /// Shows every rated staff member with their rating count and average.
    #[poise::command(slash_command, prefix_command)]
    pub async fn staffratings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let summaries = ctx.data().desk.staff_summaries().await?;
        if summaries.is_empty() {
            ctx.say("No ratings yet.").await?;
            return Ok(());
        }

        // Embeds hold at most 25 fields
        let mut rows = Vec::new();
        for summary in summaries.into_iter().take(25) {
            let name = match serenity::UserId::new(summary.staff_id).to_user(ctx).await {
                Ok(user) => user.name,
                Err(_) => format!("ID:{}", summary.staff_id),
            };
            rows.push((name, summary));
        }

        ctx.send(poise::CreateReply::default().embed(views::staff_ratings_embed(&rows)))
            .await?;
        Ok(())
    }

    /// Shows the vouches a user has written, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn vouches(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whose vouches to show (defaults to you)"] user: Option<serenity::User>,
        #[description = "Page number"]
        #[min = 1]
        page: Option<u64>,
    ) -> Result<()> {
        let user = user.as_ref().unwrap_or_else(|| ctx.author());
        let page_size = ctx.data().settings.desk.vouch_page_size;
        let listing = ctx
            .data()
            .desk
            .list_vouches(VouchScope::ByUser(user.id.get()), page.unwrap_or(1), page_size)
            .await?;
        send_listing(ctx, &listing, Some(&user.name)).await
    }

    /// Shows every vouch, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn allvouches(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Page number"]
        #[min = 1]
        page: Option<u64>,
    ) -> Result<()> {
        let page_size = ctx.data().settings.desk.all_vouches_page_size;
        let listing = ctx
            .data()
            .desk
            .list_vouches(VouchScope::All, page.unwrap_or(1), page_size)
            .await?;
        send_listing(ctx, &listing, None).await
    }

    async fn send_listing(
        ctx: poise::Context<'_, BotData, Error>,
        listing: &VouchPage,
        owner_name: Option<&str>,
    ) -> Result<()> {
        if listing.vouches.is_empty() {
            ctx.say(views::empty_page_text(listing)).await?;
            return Ok(());
        }

        ctx.send(
            poise::CreateReply::default()
                .embed(views::vouch_page_embed(listing, owner_name))
                .components(views::pagination_buttons(listing)),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
