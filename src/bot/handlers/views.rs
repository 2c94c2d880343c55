//! Messages, embeds and components the desk sends.
//!
//! Builders return serenity types; the text they contain comes from small
//! string helpers so the wording can be checked without a gateway.

use crate::{
    bot::handlers::components::{DeskComponent, VOUCH_TEXT_INPUT_ID},
    config::{ApplicationKindConfig, TicketKindConfig},
    core::{promotion::Promotion, summary, vouch::{MAX_DESCRIPTION_CHARS, VouchPage}},
    models::{Stars, StaffRatingSummary, Vouch, VouchScope},
};
use poise::serenity_prelude as serenity;

const GREEN: u32 = 0x002E_CC71;
const GOLD: u32 = 0x00F1_C40F;
const BLURPLE: u32 = 0x0058_65F2;
const BLUE: u32 = 0x0034_98DB;
const RED: u32 = 0x00E7_4C3C;

/// First page of the rules view, shown to everyone
pub const RULES_PAGE: u8 = 1;
/// Second page of the rules view, staff only
pub const STAFF_GUIDE_PAGE: u8 = 2;

const RULES_TEXT: &str = "**Welcome to AVS, a fun community for ALS, ASTDX, and chill chats!**\n\n\
**🌟 1. Respect & Kindness**\n\
• Be respectful to everyone.\n\
• No harassment, hate, threats, or toxic behavior. Jokes are fine, harmful ones are not.\n\
• If someone bothers you, don't retaliate. Report them.\n\n\
**📢 2. Language & Behavior**\n\
• Keep chats appropriate for all ages.\n\
• Swearing is okay in moderation. No slurs or hate speech.\n\
• No spam, flooding or mass pings.\n\n\
**📌 3. Use the Right Channels**\n\
• Chat in general, memes in #memes, help in #support, etc.\n\n\
**🧠 4. Content Rules**\n\
• No NSFW/NSFL, illegal, pirated, or disturbing content.\n\n\
**🚫 5. Alts & Raids**\n\
• No alts unless approved. Trolls = instant ban.\n\n\
**✅ Final:**\n\
• No disrespect to helpers. Major = ban. Minor = mute.";

const STAFF_GUIDE_TEXT: &str = "• **Take Requests:** When a ticket appears, check what the member needs. \
If you're confident you can help, press **Take Request**.\n\n\
• **Deletion & Ratings:** After completing the request, ask the member to press \
**Delete Ticket** to leave a rating.\n\n\
• **Choices:** You don't have to take every ticket. Only take the ones you can handle.\n\n\
• **Respect:** Always respect members. If someone disrespects you, stop helping and report it.\n\n\
• **Benefits:** Staff can join exclusive giveaways and perks.";

/// Posted in a new application channel under the applicant's mention.
pub const APPLICATION_WELCOME: &str = "Welcome! We are glad you want to join our Helpers. \
Before you start, please read how helping works here.\n\n\
**1. Respect**\n\
- Treat people with respect. If someone is disrespectful or ungrateful, report it with proof.\n\n\
**2. Choices**\n\
- Pick the requests you want to work on. If you cannot handle one, leave it to someone else.\n\n\
**3. Ratings**\n\
- When a request is done, ask the member to press **Delete Ticket** so they can rate you. \
Enough 5-star ratings unlock a promotion!";

/// Mention markup for a user id
#[must_use]
pub fn user_mention(user_id: u64) -> String {
    format!("<@{user_id}>")
}

/// Mention markup for a role id
#[must_use]
pub fn role_mention(role_id: u64) -> String {
    format!("<@&{role_id}>")
}

/// Mention markup for a channel id
#[must_use]
pub fn channel_mention(channel_id: u64) -> String {
    format!("<#{channel_id}>")
}

// ---- Ticket board and ticket channels ----

/// The ticket kind selector.
#[must_use]
pub fn ticket_board(kinds: &[TicketKindConfig]) -> Vec<serenity::CreateActionRow> {
    let options = kinds
        .iter()
        .map(|kind| {
            let option = serenity::CreateSelectMenuOption::new(&kind.label, &kind.name);
            match &kind.description {
                Some(description) => option.description(description),
                None => option,
            }
        })
        .collect();

    let menu = serenity::CreateSelectMenu::new(
        DeskComponent::TicketKindSelect.to_string(),
        serenity::CreateSelectMenuKind::String { options },
    )
    .placeholder("Ticket Selector")
    .min_values(1)
    .max_values(1);

    vec![serenity::CreateActionRow::SelectMenu(menu)]
}

/// First message of a ticket channel.
#[must_use]
pub fn ticket_opened_text(creator_id: u64, kind: &TicketKindConfig) -> String {
    let mut text = format!(
        "{} has opened a **{}** support ticket!",
        user_mention(creator_id),
        kind.name.to_uppercase()
    );
    if let Some(role_id) = kind.role_id {
        text.push('\n');
        text.push_str(&role_mention(role_id));
    }
    text
}

/// Take Request and Delete Ticket buttons.
#[must_use]
pub fn ticket_controls(claimed: bool) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(DeskComponent::Claim.to_string())
            .label("🎯 Take Request")
            .style(serenity::ButtonStyle::Primary)
            .disabled(claimed),
        delete_button(),
    ])]
}

fn delete_button() -> serenity::CreateButton {
    serenity::CreateButton::new(DeskComponent::Delete.to_string())
        .label("🗑️ Delete Ticket")
        .style(serenity::ButtonStyle::Danger)
}

/// Posted in the channel once a staff member claims the ticket.
#[must_use]
pub fn claim_announcement(staff_id: u64) -> String {
    format!("✅ This request has been taken by {}.", user_mention(staff_id))
}

/// Ephemeral confirmation for the creator deleting a ticket.
#[must_use]
pub fn ticket_deleted_text(close_delay_secs: u64) -> String {
    format!("🗑️ Ticket deleted. This channel will be removed in {close_delay_secs} seconds...")
}

// ---- Application board and application channels ----

/// One Apply button per application kind, five per row.
#[must_use]
pub fn application_board(kinds: &[ApplicationKindConfig]) -> Vec<serenity::CreateActionRow> {
    kinds
        .chunks(5)
        .map(|chunk| {
            serenity::CreateActionRow::Buttons(
                chunk
                    .iter()
                    .map(|kind| {
                        serenity::CreateButton::new(
                            DeskComponent::Apply {
                                kind: kind.name.clone(),
                            }
                            .to_string(),
                        )
                        .label(&kind.label)
                        .style(serenity::ButtonStyle::Primary)
                    })
                    .collect(),
            )
        })
        .collect()
}

/// Accept, Reject and Delete Ticket buttons of an application channel.
#[must_use]
pub fn application_controls(kind: &str, user_id: u64) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(
            DeskComponent::AcceptApplication {
                kind: kind.to_string(),
                user_id,
            }
            .to_string(),
        )
        .label("✅ Accept")
        .style(serenity::ButtonStyle::Success),
        serenity::CreateButton::new(DeskComponent::RejectApplication { user_id }.to_string())
            .label("❌ Reject")
            .style(serenity::ButtonStyle::Danger),
        delete_button(),
    ])]
}

/// Staff reply after accepting an applicant.
#[must_use]
pub fn application_accepted_text(user_id: u64) -> String {
    format!("✅ {} has been accepted and given roles.", user_mention(user_id))
}

/// Staff reply after rejecting an applicant.
#[must_use]
pub fn application_rejected_text(user_id: u64) -> String {
    format!("❌ {}'s application was rejected.", user_mention(user_id))
}

// ---- Rating prompt and vouch invite (sent by DM) ----

/// DM text asking the creator to rate the staff member.
#[must_use]
pub fn rating_prompt_text(staff_id: u64) -> String {
    format!(
        "Thanks for using the support desk! How would you rate the help you got from {}?",
        user_mention(staff_id)
    )
}

/// One button per star value.
#[must_use]
pub fn rating_buttons(ticket_id: u64, staff_id: u64) -> Vec<serenity::CreateActionRow> {
    let buttons = Stars::all()
        .map(|stars| {
            serenity::CreateButton::new(
                DeskComponent::Rate {
                    ticket_id,
                    staff_id,
                    stars: stars.get(),
                }
                .to_string(),
            )
            .label(stars.to_string())
            .style(serenity::ButtonStyle::Secondary)
        })
        .collect();
    vec![serenity::CreateActionRow::Buttons(buttons)]
}

/// Reply replacing the rating buttons once a rating is stored.
#[must_use]
pub fn rated_text(stars: Stars) -> String {
    format!("✅ You rated {} stars!", stars.get())
}

/// Log channel line for a stored rating.
#[must_use]
pub fn rating_log_line(stars: Stars, rater_id: u64, staff_id: u64) -> String {
    format!(
        "⭐ **Rating**: `{} stars`\n👤 From: {}\n🎯 To: {}",
        stars.get(),
        user_mention(rater_id),
        user_mention(staff_id)
    )
}

/// Log channel line for a promotion.
#[must_use]
pub fn promotion_announcement(promotion: &Promotion) -> String {
    format!(
        "🎉 {} has been promoted with {} five-star ratings!",
        user_mention(promotion.staff_id),
        promotion.five_star_count
    )
}

/// DM text inviting the creator to leave a vouch.
pub const VOUCH_INVITE: &str = "Would you like to vouch for the staff who helped you?";

/// Star selector of the vouch invite.
#[must_use]
pub fn vouch_star_select(staff_id: u64) -> Vec<serenity::CreateActionRow> {
    let options = Stars::all()
        .map(|stars| serenity::CreateSelectMenuOption::new(stars.to_string(), stars.get().to_string()))
        .collect();
    let menu = serenity::CreateSelectMenu::new(
        DeskComponent::VouchStars { staff_id }.to_string(),
        serenity::CreateSelectMenuKind::String { options },
    )
    .placeholder("Select rating (1-5 stars)")
    .min_values(1)
    .max_values(1);
    vec![serenity::CreateActionRow::SelectMenu(menu)]
}

/// Modal asking for the optional vouch description.
#[must_use]
pub fn vouch_modal(staff_id: u64, stars: u8) -> serenity::CreateModal {
    let max_length = u16::try_from(MAX_DESCRIPTION_CHARS).unwrap_or(u16::MAX);
    let input = serenity::CreateInputText::new(
        serenity::InputTextStyle::Paragraph,
        "Describe your experience",
        VOUCH_TEXT_INPUT_ID,
    )
    .required(false)
    .max_length(max_length);

    serenity::CreateModal::new(
        DeskComponent::VouchModal { staff_id, stars }.to_string(),
        "Vouch Description",
    )
    .components(vec![serenity::CreateActionRow::InputText(input)])
}

/// Reply to the user after a vouch is stored.
#[must_use]
pub fn vouch_thanks(vouch: &Vouch) -> String {
    let mut text = format!("Thank you for vouching for {}!", user_mention(vouch.staff_id));
    if let Some(description) = &vouch.description {
        text.push_str("\nYour feedback: ");
        text.push_str(description);
    }
    text
}

/// Log channel embed for a new vouch.
#[must_use]
pub fn vouch_log_embed(vouch: &Vouch) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::default()
        .title("New Vouch Received")
        .color(GOLD)
        .field("Staff", user_mention(vouch.staff_id), true)
        .field("User", user_mention(vouch.user_id), true)
        .field("Rating", vouch.stars.to_string(), true);
    match &vouch.description {
        Some(description) => embed.field("Feedback", description, false),
        None => embed,
    }
}

// ---- Listings ----

/// Field heading of one vouch in a listing.
#[must_use]
pub fn vouch_field_name(vouch: &Vouch, scope: VouchScope) -> String {
    let mut name = format!(
        "🕒 {}\n⭐ Rating: {} / 5",
        vouch.created_at.format("%Y-%m-%d %H:%M:%S"),
        vouch.stars.get()
    );
    if scope == VouchScope::All {
        name.push_str(&format!("\n🙍 User ID: {}", vouch.user_id));
    }
    name
}

/// Field body of one vouch in a listing.
#[must_use]
pub fn vouch_field_value(vouch: &Vouch) -> String {
    format!(
        "👤 **Staff:** {}\n💬 **Feedback:** {}\n\u{200b}",
        user_mention(vouch.staff_id),
        vouch.description.as_deref().unwrap_or("No feedback.")
    )
}

/// Footer of a listing page.
#[must_use]
pub fn page_footer(page: &VouchPage) -> String {
    format!(
        "Page {}/{} | Total vouches: {}",
        page.page,
        page.total_pages(),
        page.total
    )
}

/// Reply when the requested page holds nothing.
#[must_use]
pub fn empty_page_text(page: &VouchPage) -> String {
    match page.scope {
        VouchScope::ByUser(user_id) => format!(
            "No vouches found for {} on page {}.",
            user_mention(user_id),
            page.page
        ),
        VouchScope::All => format!("No vouches found in the database on page {}.", page.page),
    }
}

/// Embed showing one page of vouches.
#[must_use]
pub fn vouch_page_embed(page: &VouchPage, owner_name: Option<&str>) -> serenity::CreateEmbed {
    let (title, color) = match (page.scope, owner_name) {
        (VouchScope::ByUser(_), Some(name)) => (format!("🌟 Vouches by {name}"), BLURPLE),
        (VouchScope::ByUser(user_id), None) => (format!("🌟 Vouches by ID:{user_id}"), BLURPLE),
        (VouchScope::All, _) => ("🌟 All Vouches".to_string(), GREEN),
    };

    let fields = page
        .vouches
        .iter()
        .map(|vouch| (vouch_field_name(vouch, page.scope), vouch_field_value(vouch), false));

    serenity::CreateEmbed::default()
        .title(title)
        .color(color)
        .fields(fields)
        .footer(serenity::CreateEmbedFooter::new(page_footer(page)))
}

/// Previous/Next buttons, only those that lead somewhere.
#[must_use]
pub fn pagination_buttons(page: &VouchPage) -> Vec<serenity::CreateActionRow> {
    let mut buttons = Vec::new();
    if page.has_previous() {
        buttons.push(
            serenity::CreateButton::new(
                DeskComponent::VouchPage {
                    scope: page.scope,
                    page: page.page - 1,
                }
                .to_string(),
            )
            .label("Previous")
            .style(serenity::ButtonStyle::Primary),
        );
    }
    if page.has_next() {
        buttons.push(
            serenity::CreateButton::new(
                DeskComponent::VouchPage {
                    scope: page.scope,
                    page: page.page + 1,
                }
                .to_string(),
            )
            .label("Next")
            .style(serenity::ButtonStyle::Primary),
        );
    }

    if buttons.is_empty() {
        Vec::new()
    } else {
        vec![serenity::CreateActionRow::Buttons(buttons)]
    }
}

/// Embed listing rating summaries, names resolved by the caller.
#[must_use]
pub fn staff_ratings_embed(rows: &[(String, StaffRatingSummary)]) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title("⭐ Staff Ratings")
        .color(GREEN)
        .fields(
            rows.iter()
                .map(|(name, row)| (name.clone(), summary::format_summary_line(row), false)),
        )
}

// ---- Rules view ----

/// Title, body and color of a rules view page; anything but the staff guide
/// page falls back to the rules.
#[must_use]
pub fn rules_page_content(page: u8) -> (&'static str, &'static str, u32) {
    if page == STAFF_GUIDE_PAGE {
        ("👮 Staff Guide", STAFF_GUIDE_TEXT, RED)
    } else {
        ("📜 AVS Server Rules & Guidelines", RULES_TEXT, BLUE)
    }
}

/// Embed of one rules view page.
#[must_use]
pub fn rules_embed(page: u8) -> serenity::CreateEmbed {
    let (title, body, color) = rules_page_content(page);
    serenity::CreateEmbed::default()
        .title(title)
        .description(body)
        .color(color)
}

/// Next and Back buttons of the rules view, bound to the user who opened it.
#[must_use]
pub fn rules_buttons(author_id: u64) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(
            DeskComponent::RulesPage {
                author_id,
                page: STAFF_GUIDE_PAGE,
            }
            .to_string(),
        )
        .label("Next ▶️")
        .style(serenity::ButtonStyle::Primary),
        serenity::CreateButton::new(
            DeskComponent::RulesPage {
                author_id,
                page: RULES_PAGE,
            }
            .to_string(),
        )
        .label("◀️ Back")
        .style(serenity::ButtonStyle::Secondary),
    ])]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::vouch_at;

    fn page(scope: VouchScope, page: u64, total: u64) -> VouchPage {
        VouchPage {
            scope,
            page,
            page_size: 10,
            total,
            vouches: vec![vouch_at(7, 42, 0)],
        }
    }

    #[test]
    fn test_ticket_opened_text_pings_role() {
        let kind = TicketKindConfig {
            name: "als".to_string(),
            label: "ALS".to_string(),
            description: None,
            role_id: Some(55),
        };
        assert_eq!(
            ticket_opened_text(1, &kind),
            "<@1> has opened a **ALS** support ticket!\n<@&55>"
        );

        let quiet = TicketKindConfig {
            role_id: None,
            ..kind
        };
        assert_eq!(
            ticket_opened_text(1, &quiet),
            "<@1> has opened a **ALS** support ticket!"
        );
    }

    #[test]
    fn test_rating_texts() {
        let stars = Stars::new(4).unwrap();
        assert_eq!(rated_text(stars), "✅ You rated 4 stars!");
        assert_eq!(
            rating_log_line(stars, 1, 2),
            "⭐ **Rating**: `4 stars`\n👤 From: <@1>\n🎯 To: <@2>"
        );
        let promotion = Promotion {
            staff_id: 2,
            five_star_count: 15,
            multiple: 1,
        };
        assert_eq!(
            promotion_announcement(&promotion),
            "🎉 <@2> has been promoted with 15 five-star ratings!"
        );
    }

    #[test]
    fn test_vouch_thanks_includes_feedback() {
        let mut vouch = vouch_at(7, 42, 0);
        vouch.description = Some("very patient".to_string());
        assert_eq!(
            vouch_thanks(&vouch),
            "Thank you for vouching for <@7>!\nYour feedback: very patient"
        );
        vouch.description = None;
        assert_eq!(vouch_thanks(&vouch), "Thank you for vouching for <@7>!");
    }

    #[test]
    fn test_vouch_field_formatting() {
        let mut vouch = vouch_at(7, 42, 0);
        vouch.description = None;
        assert!(vouch_field_value(&vouch).contains("No feedback."));
        assert!(vouch_field_name(&vouch, VouchScope::All).contains("User ID: 42"));
        assert!(!vouch_field_name(&vouch, VouchScope::ByUser(42)).contains("User ID"));
        assert!(vouch_field_name(&vouch, VouchScope::ByUser(42)).starts_with("🕒 2025-01-01 12:00:00"));
    }

    #[test]
    fn test_page_footer_and_empty_text() {
        let first = page(VouchScope::ByUser(42), 1, 23);
        assert_eq!(page_footer(&first), "Page 1/3 | Total vouches: 23");

        let past_end = page(VouchScope::ByUser(42), 4, 23);
        assert_eq!(empty_page_text(&past_end), "No vouches found for <@42> on page 4.");
        let all = page(VouchScope::All, 2, 0);
        assert_eq!(
            empty_page_text(&all),
            "No vouches found in the database on page 2."
        );
    }

    #[test]
    fn test_pagination_buttons_only_where_useful() {
        assert_eq!(pagination_buttons(&page(VouchScope::All, 1, 5)).len(), 0);
        assert_eq!(pagination_buttons(&page(VouchScope::All, 1, 23)).len(), 1);
        assert_eq!(pagination_buttons(&page(VouchScope::All, 2, 23)).len(), 1);
        assert_eq!(pagination_buttons(&page(VouchScope::All, 3, 23)).len(), 1);
    }

    #[test]
    fn test_application_texts() {
        assert_eq!(
            application_accepted_text(42),
            "✅ <@42> has been accepted and given roles."
        );
        assert_eq!(
            application_rejected_text(42),
            "❌ <@42>'s application was rejected."
        );
    }

    #[test]
    fn test_rules_pages() {
        let (title, body, color) = rules_page_content(RULES_PAGE);
        assert_eq!(title, "📜 AVS Server Rules & Guidelines");
        assert!(body.contains("**🌟 1. Respect & Kindness**"));
        assert!(body.ends_with("Major = ban. Minor = mute."));
        assert_eq!(color, BLUE);

        let (title, body, color) = rules_page_content(STAFF_GUIDE_PAGE);
        assert_eq!(title, "👮 Staff Guide");
        assert!(body.starts_with("• **Take Requests:**"));
        assert!(body.contains("press **Delete Ticket** to leave a rating"));
        assert_eq!(color, RED);

        assert_eq!(rules_page_content(0).0, rules_page_content(RULES_PAGE).0);
        assert_eq!(rules_buttons(42).len(), 1);
    }

    #[test]
    fn test_ticket_board_is_a_single_select_row() {
        let kinds = vec![
            TicketKindConfig {
                name: "als".to_string(),
                label: "ALS".to_string(),
                description: None,
                role_id: None,
            },
            TicketKindConfig {
                name: "astdx".to_string(),
                label: "ASTDX".to_string(),
                description: Some("Open a ticket for ASTDX Staff".to_string()),
                role_id: None,
            },
        ];
        assert_eq!(ticket_board(&kinds).len(), 1);
    }
}
