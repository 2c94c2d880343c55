//! Component and modal interactions.
//!
//! Every button, select and modal the desk sends comes back through
//! [`event_handler`]. The custom id is decoded into a [`DeskComponent`], the
//! matching desk operation runs first, and only then does the bot touch
//! Discord. Rejections from the desk are answered with an ephemeral reply.

use crate::{
    bot::{
        BotData,
        handlers::{
            components::{DeskComponent, VOUCH_TEXT_INPUT_ID},
            views,
        },
    },
    core::{RatingPrompt, counter::ChannelKind},
    errors::{Error, Result},
    models::VouchScope,
};
use poise::serenity_prelude as serenity;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Framework event hook; handles the desk's component and modal interactions.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        info!("Logged in as {}", data_about_bot.user.name);
        return Ok(());
    }

    let serenity::FullEvent::InteractionCreate { interaction } = event else {
        return Ok(());
    };

    if let Some(modal) = interaction.as_modal_submit() {
        let Some(component) = DeskComponent::parse(&modal.data.custom_id) else {
            return Ok(());
        };
        if let Err(error) = handle_modal(ctx, data, modal, component).await {
            log_failure(&error);
            if let Err(e) = modal
                .create_response(&ctx.http, ephemeral(error.user_message()))
                .await
            {
                warn!("Failed to send error reply: {e}");
            }
        }
    } else if let Some(press) = interaction.as_message_component() {
        let Some(component) = DeskComponent::parse(&press.data.custom_id) else {
            return Ok(());
        };
        if let Err(error) = handle_component(ctx, data, press, component).await {
            log_failure(&error);
            if let Err(e) = press
                .create_response(&ctx.http, ephemeral(error.user_message()))
                .await
            {
                warn!("Failed to send error reply: {e}");
            }
        }
    }
    Ok(())
}

fn log_failure(error: &Error) {
    if error.is_user_facing() {
        debug!("Interaction rejected: {error}");
    } else {
        error!("Interaction failed: {error:?}");
    }
}

fn ephemeral(content: impl Into<String>) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

async fn handle_component(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
    component: DeskComponent,
) -> Result<()> {
    match component {
        DeskComponent::TicketKindSelect => {
            let serenity::ComponentInteractionDataKind::StringSelect { values } = &press.data.kind
            else {
                return Ok(());
            };
            let Some(kind) = values.first() else {
                return Ok(());
            };
            open_ticket(ctx, data, press, kind).await
        }
        DeskComponent::Apply { kind } => open_application(ctx, data, press, &kind).await,
        DeskComponent::AcceptApplication { kind, user_id } => {
            accept_application(ctx, data, press, &kind, user_id).await
        }
        DeskComponent::RejectApplication { user_id } => {
            ensure_staff(data, press)?;
            info!(user_id, reviewer = press.user.id.get(), "Application rejected");
            press
                .create_response(&ctx.http, ephemeral(views::application_rejected_text(user_id)))
                .await?;
            Ok(())
        }
        DeskComponent::Claim => claim_ticket(ctx, data, press).await,
        DeskComponent::Delete => delete_ticket(ctx, data, press).await,
        DeskComponent::Rate {
            ticket_id,
            staff_id,
            stars,
        } => rate_staff(ctx, data, press, ticket_id, staff_id, stars).await,
        DeskComponent::VouchStars { staff_id } => {
            let serenity::ComponentInteractionDataKind::StringSelect { values } = &press.data.kind
            else {
                return Ok(());
            };
            let Some(stars) = values.first().and_then(|v| v.parse::<u8>().ok()) else {
                return Ok(());
            };
            press
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::Modal(views::vouch_modal(staff_id, stars)),
                )
                .await?;
            Ok(())
        }
        DeskComponent::VouchPage { scope, page } => {
            let page_size = match scope {
                VouchScope::ByUser(_) => data.settings.desk.vouch_page_size,
                VouchScope::All => data.settings.desk.all_vouches_page_size,
            };
            let listing = data.desk.list_vouches(scope, page, page_size).await?;
            let owner_name = match scope {
                VouchScope::ByUser(user_id) => serenity::UserId::new(user_id)
                    .to_user(ctx)
                    .await
                    .ok()
                    .map(|user| user.name),
                VouchScope::All => None,
            };
            press
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .embed(views::vouch_page_embed(&listing, owner_name.as_deref()))
                            .components(views::pagination_buttons(&listing)),
                    ),
                )
                .await?;
            Ok(())
        }
        DeskComponent::RulesPage { author_id, page } => {
            rules_page_access(press.user.id.get(), author_id, page, is_staff(data, press))?;
            press
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .embed(views::rules_embed(page))
                            .components(views::rules_buttons(author_id)),
                    ),
                )
                .await?;
            Ok(())
        }
        DeskComponent::VouchModal { .. } => Ok(()),
    }
}

async fn handle_modal(
    ctx: &serenity::Context,
    data: &BotData,
    modal: &serenity::ModalInteraction,
    component: DeskComponent,
) -> Result<()> {
    let DeskComponent::VouchModal { staff_id, stars } = component else {
        return Ok(());
    };

    let description = modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input)
                if input.custom_id == VOUCH_TEXT_INPUT_ID =>
            {
                input.value.clone()
            }
            _ => None,
        });

    let vouch = data
        .desk
        .submit_vouch(staff_id, modal.user.id.get(), i64::from(stars), description)
        .await?;

    modal
        .create_response(&ctx.http, ephemeral(views::vouch_thanks(&vouch)))
        .await?;

    let log_channel = serenity::ChannelId::new(data.settings.guild.log_channel_id);
    best_effort(
        log_channel
            .send_message(
                &ctx.http,
                serenity::CreateMessage::new().embed(views::vouch_log_embed(&vouch)),
            )
            .await,
        "log vouch",
    );
    Ok(())
}

/// Posts to the log channel never fail the interaction that caused them.
fn best_effort<T>(result: serenity::Result<T>, action: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to {action}: {e}");
            None
        }
    }
}

fn is_staff(data: &BotData, press: &serenity::ComponentInteraction) -> bool {
    let staff_role = serenity::RoleId::new(data.settings.guild.staff_role_id);
    press
        .member
        .as_ref()
        .is_some_and(|member| member.roles.contains(&staff_role))
}

fn ensure_staff(data: &BotData, press: &serenity::ComponentInteraction) -> Result<()> {
    if is_staff(data, press) { Ok(()) } else { Err(Error::NotStaff) }
}

/// Only the user who ran the rules command turns its pages, and only staff
/// see the staff guide.
fn rules_page_access(
    viewer_id: u64,
    author_id: u64,
    page: u8,
    viewer_is_staff: bool,
) -> Result<()> {
    if viewer_id != author_id {
        Err(Error::NotViewOwner)
    } else if page == views::STAFF_GUIDE_PAGE && !viewer_is_staff {
        Err(Error::NotStaff)
    } else {
        Ok(())
    }
}

/// Permission overwrites hiding a desk channel from everyone but its opener
/// and the staff role.
fn private_channel_overwrites(
    guild_id: serenity::GuildId,
    opener: serenity::UserId,
    staff_role_id: u64,
) -> Vec<serenity::PermissionOverwrite> {
    use serenity::Permissions;

    vec![
        serenity::PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild_id.get())),
        },
        serenity::PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL
                | Permissions::SEND_MESSAGES
                | Permissions::ATTACH_FILES
                | Permissions::EMBED_LINKS,
            deny: Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(opener),
        },
        serenity::PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            deny: Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(staff_role_id)),
        },
    ]
}

async fn create_private_channel(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
    name: String,
) -> Result<serenity::GuildChannel> {
    let guild_id = press
        .guild_id
        .unwrap_or_else(|| serenity::GuildId::new(data.settings.guild.guild_id));
    let builder = serenity::CreateChannel::new(name)
        .kind(serenity::ChannelType::Text)
        .category(serenity::ChannelId::new(data.settings.guild.ticket_category_id))
        .permissions(private_channel_overwrites(
            guild_id,
            press.user.id,
            data.settings.guild.staff_role_id,
        ));
    Ok(guild_id.create_channel(&ctx.http, builder).await?)
}

/// Removes a channel that was created for a ticket the desk then refused.
async fn discard_channel(ctx: &serenity::Context, channel: &serenity::GuildChannel) {
    if let Err(e) = channel.id.delete(&ctx.http).await {
        warn!(channel_id = channel.id.get(), "Failed to discard channel: {e}");
    }
}

#[instrument(skip(ctx, data, press), fields(user_id = press.user.id.get()))]
async fn open_ticket(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
    kind_name: &str,
) -> Result<()> {
    let kind = data
        .settings
        .ticket_kind(kind_name)
        .ok_or_else(|| Error::UnknownKind {
            name: kind_name.to_string(),
        })?;

    let name = data
        .desk
        .next_channel_name(ChannelKind::Ticket, &kind.name)
        .await?;
    let channel = create_private_channel(ctx, data, press, name).await?;

    if let Err(e) = data
        .desk
        .open(channel.id.get(), press.user.id.get(), &kind.name)
        .await
    {
        discard_channel(ctx, &channel).await;
        return Err(e);
    }

    channel
        .id
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content(views::ticket_opened_text(press.user.id.get(), kind))
                .components(views::ticket_controls(false)),
        )
        .await?;

    press
        .create_response(
            &ctx.http,
            ephemeral(format!(
                "✅ Your ticket has been created: {}",
                views::channel_mention(channel.id.get())
            )),
        )
        .await?;

    // A select keeps its last choice; repost the board so the same kind can be picked again.
    best_effort(
        press
            .channel_id
            .edit_message(
                &ctx.http,
                press.message.id,
                serenity::EditMessage::new()
                    .components(views::ticket_board(&data.settings.ticket_kinds)),
            )
            .await,
        "reset ticket board",
    );
    Ok(())
}

#[instrument(skip(ctx, data, press), fields(user_id = press.user.id.get()))]
async fn open_application(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
    kind_name: &str,
) -> Result<()> {
    let kind = data
        .settings
        .application_kind(kind_name)
        .ok_or_else(|| Error::UnknownKind {
            name: kind_name.to_string(),
        })?;

    let name = data
        .desk
        .next_channel_name(ChannelKind::Application, &kind.name)
        .await?;
    let channel = create_private_channel(ctx, data, press, name).await?;

    let user_id = press.user.id.get();
    if let Err(e) = data
        .desk
        .open_application(channel.id.get(), user_id, &kind.name)
        .await
    {
        discard_channel(ctx, &channel).await;
        return Err(e);
    }

    press
        .create_response(
            &ctx.http,
            ephemeral(format!(
                "✅ Application created: {}",
                views::channel_mention(channel.id.get())
            )),
        )
        .await?;

    channel
        .id
        .say(
            &ctx.http,
            format!("{}\n{}", views::user_mention(user_id), views::APPLICATION_WELCOME),
        )
        .await?;
    channel
        .id
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content("Staff controls:")
                .components(views::application_controls(&kind.name, user_id)),
        )
        .await?;
    Ok(())
}

#[instrument(skip(ctx, data, press), fields(reviewer = press.user.id.get()))]
async fn accept_application(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
    kind_name: &str,
    user_id: u64,
) -> Result<()> {
    ensure_staff(data, press)?;
    let kind = data
        .settings
        .application_kind(kind_name)
        .ok_or_else(|| Error::UnknownKind {
            name: kind_name.to_string(),
        })?;

    let guild_id = press
        .guild_id
        .unwrap_or_else(|| serenity::GuildId::new(data.settings.guild.guild_id));
    for role_id in &kind.grant_role_ids {
        ctx.http
            .add_member_role(
                guild_id,
                serenity::UserId::new(user_id),
                serenity::RoleId::new(*role_id),
                Some("Application accepted"),
            )
            .await?;
    }
    info!(user_id, kind = kind_name, "Application accepted");

    press
        .create_response(&ctx.http, ephemeral(views::application_accepted_text(user_id)))
        .await?;
    Ok(())
}

#[instrument(skip(ctx, data, press), fields(channel_id = press.channel_id.get()))]
async fn claim_ticket(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
) -> Result<()> {
    let staff_id = press.user.id.get();
    data.desk.claim(press.channel_id.get(), staff_id).await?;

    press
        .create_response(&ctx.http, ephemeral("🎯 You claimed this request!"))
        .await?;
    press
        .channel_id
        .say(&ctx.http, views::claim_announcement(staff_id))
        .await?;
    if let Err(e) = press
        .channel_id
        .edit_message(
            &ctx.http,
            press.message.id,
            serenity::EditMessage::new().components(views::ticket_controls(true)),
        )
        .await
    {
        warn!("Failed to disable claim button: {e}");
    }
    Ok(())
}

#[instrument(skip(ctx, data, press), fields(channel_id = press.channel_id.get()))]
async fn delete_ticket(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
) -> Result<()> {
    let closed = data
        .desk
        .close(press.channel_id.get(), press.user.id.get())
        .await?;

    let delay_secs = data.settings.desk.close_delay_secs;
    press
        .create_response(&ctx.http, ephemeral(views::ticket_deleted_text(delay_secs)))
        .await?;
    schedule_channel_deletion(
        Arc::clone(&ctx.http),
        press.channel_id,
        Duration::from_secs(delay_secs),
    );

    if let Some(prompt) = closed.rating_prompt {
        send_rating_prompt(ctx, prompt).await;
    }
    Ok(())
}

/// DMs the creator the star buttons and the vouch invite. Closed DMs are logged
/// and otherwise ignored.
async fn send_rating_prompt(ctx: &serenity::Context, prompt: RatingPrompt) {
    let creator = serenity::UserId::new(prompt.creator_id);
    let rating = serenity::CreateMessage::new()
        .content(views::rating_prompt_text(prompt.staff_id))
        .components(views::rating_buttons(prompt.ticket_id, prompt.staff_id));
    let invite = serenity::CreateMessage::new()
        .content(views::VOUCH_INVITE)
        .components(views::vouch_star_select(prompt.staff_id));

    for message in [rating, invite] {
        if let Err(e) = creator.direct_message(&ctx.http, message).await {
            warn!(creator_id = prompt.creator_id, "Could not DM rating prompt: {e}");
            return;
        }
    }
}

#[instrument(skip(ctx, data, press), fields(rater = press.user.id.get()))]
async fn rate_staff(
    ctx: &serenity::Context,
    data: &BotData,
    press: &serenity::ComponentInteraction,
    ticket_id: u64,
    staff_id: u64,
    stars: u8,
) -> Result<()> {
    let rater_id = press.user.id.get();
    let rated = data
        .desk
        .rate(ticket_id, staff_id, i64::from(stars), rater_id)
        .await?;

    press
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(views::rated_text(rated.rating.stars))
                    .components(Vec::new()),
            ),
        )
        .await?;

    let log_channel = serenity::ChannelId::new(data.settings.guild.log_channel_id);
    best_effort(
        log_channel
            .say(
                &ctx.http,
                views::rating_log_line(rated.rating.stars, rater_id, staff_id),
            )
            .await,
        "log rating",
    );

    if let Some(promotion) = rated.promotion {
        let guild_id = serenity::GuildId::new(data.settings.guild.guild_id);
        if let Err(e) = ctx
            .http
            .add_member_role(
                guild_id,
                serenity::UserId::new(staff_id),
                serenity::RoleId::new(data.settings.guild.promotion_role_id),
                Some("Five-star promotion"),
            )
            .await
        {
            error!(staff_id, "Failed to grant promotion role: {e}");
        }
        best_effort(
            log_channel
                .say(&ctx.http, views::promotion_announcement(&promotion))
                .await,
            "announce promotion",
        );
    }
    Ok(())
}

/// Deletes `channel_id` after `delay` on a background task.
///
/// Failures are logged; the desk row is already gone at this point.
pub fn schedule_channel_deletion(
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match channel_id.delete(&http).await {
            Ok(_) => debug!(channel_id = channel_id.get(), "Ticket channel deleted"),
            Err(e) => warn!(channel_id = channel_id.get(), "Failed to delete ticket channel: {e}"),
        }
    })
}
