//! Ticket lifecycle controller.
//!
//! A ticket moves `Open(unclaimed)` → `Open(claimed)` → `Closed`. Opening
//! writes the row, the first staff claim sets `staff_id` once, and the creator
//! closes it, which deletes the row and, when someone had claimed it, produces a
//! rating prompt for the creator. Ratings feed the promotion rule.
//!
//! Writes to the ticket table and the rating table each go through their own
//! lock so that check-then-write sequences cannot interleave.

use crate::{
    core::{
        counter::{self, ChannelKind},
        promotion::{Promotion, PromotionEvaluator},
        vouch::{self, VouchPage},
    },
    errors::{Error, Result},
    models::{Rating, Stars, Ticket, TicketStatus, Vouch, VouchScope},
    store::DeskStore,
};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Asks the creator of a closed ticket to rate the staff member who handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingPrompt {
    /// Ticket that was closed
    pub ticket_id: u64,
    /// User to ask
    pub creator_id: u64,
    /// Staff member to rate
    pub staff_id: u64,
}

/// Result of closing a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTicket {
    /// The removed ticket, with status `Closed`
    pub ticket: Ticket,
    /// Present when the ticket had been claimed
    pub rating_prompt: Option<RatingPrompt>,
}

/// Result of rating a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedTicket {
    /// The stored rating
    pub rating: Rating,
    /// Present when this rating completed a promotion milestone
    pub promotion: Option<Promotion>,
}

/// Orchestrates tickets, ratings, vouches and promotions over a store.
#[derive(Debug)]
pub struct TicketDesk<S> {
    store: S,
    promotion: PromotionEvaluator,
    ticket_writes: Mutex<()>,
    rating_writes: Mutex<()>,
}

impl<S: DeskStore> TicketDesk<S> {
    /// Desk over `store` promoting every `promotion_threshold` five-star ratings.
    pub fn new(store: S, promotion_threshold: u64) -> Self {
        Self {
            store,
            promotion: PromotionEvaluator::new(promotion_threshold),
            ticket_writes: Mutex::new(()),
            rating_writes: Mutex::new(()),
        }
    }

    /// The backing store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The promotion rule in use
    pub const fn promotion(&self) -> &PromotionEvaluator {
        &self.promotion
    }

    /// Opens an unclaimed ticket for channel `ticket_id`.
    #[instrument(skip(self))]
    pub async fn open(&self, ticket_id: u64, creator_id: u64, kind: &str) -> Result<Ticket> {
        let ticket = Ticket::open(ticket_id, creator_id, kind);
        {
            let _guard = self.ticket_writes.lock().await;
            self.store.insert_ticket(ticket.clone()).await?;
        }
        info!("Ticket opened");
        Ok(ticket)
    }

    /// Looks up an open ticket.
    pub async fn ticket(&self, ticket_id: u64) -> Result<Option<Ticket>> {
        self.store.get_ticket(ticket_id).await
    }

    /// Attaches `staff_id` to an unclaimed ticket. First claim wins.
    #[instrument(skip(self))]
    pub async fn claim(&self, ticket_id: u64, staff_id: u64) -> Result<Ticket> {
        let _guard = self.ticket_writes.lock().await;

        let mut ticket = self
            .store
            .get_ticket(ticket_id)
            .await?
            .ok_or(Error::MissingTicketState { ticket_id })?;

        if let Some(current) = ticket.staff_id {
            return Err(Error::AlreadyClaimed { staff_id: current });
        }
        if staff_id == ticket.creator_id {
            return Err(Error::SelfClaimForbidden);
        }

        if !self.store.assign_staff(ticket_id, staff_id).await? {
            // Another writer bypassed the desk; report whoever holds it now.
            let holder = self
                .store
                .get_ticket(ticket_id)
                .await?
                .and_then(|t| t.staff_id)
                .ok_or(Error::MissingTicketState { ticket_id })?;
            return Err(Error::AlreadyClaimed { staff_id: holder });
        }

        ticket.staff_id = Some(staff_id);
        info!("Ticket claimed");
        Ok(ticket)
    }

    /// Closes a ticket on behalf of its creator.
    ///
    /// The row is removed; a rating prompt is returned when a staff member had
    /// claimed the ticket. Non-creators are rejected and the row is kept.
    #[instrument(skip(self))]
    pub async fn close(&self, ticket_id: u64, requester_id: u64) -> Result<ClosedTicket> {
        let _guard = self.ticket_writes.lock().await;

        let ticket = self
            .store
            .get_ticket(ticket_id)
            .await?
            .ok_or(Error::TicketNotFound { ticket_id })?;
        if ticket.creator_id != requester_id {
            return Err(Error::NotCreator { ticket_id });
        }

        let mut ticket = self
            .store
            .remove_ticket(ticket_id)
            .await?
            .ok_or(Error::TicketNotFound { ticket_id })?;
        ticket.status = TicketStatus::Closed;

        let rating_prompt = ticket.staff_id.map(|staff_id| RatingPrompt {
            ticket_id,
            creator_id: ticket.creator_id,
            staff_id,
        });
        info!(claimed = rating_prompt.is_some(), "Ticket closed");

        Ok(ClosedTicket {
            ticket,
            rating_prompt,
        })
    }

    /// Records a star rating for the staff member who handled `ticket_id` and
    /// runs the promotion rule.
    #[instrument(skip(self))]
    pub async fn rate(
        &self,
        ticket_id: u64,
        staff_id: u64,
        rating: i64,
        rater_id: u64,
    ) -> Result<RatedTicket> {
        let stars = Stars::new(rating)?;
        let _guard = self.rating_writes.lock().await;

        if self.store.has_rated(ticket_id, rater_id).await? {
            return Err(Error::AlreadyRated { ticket_id });
        }

        let rating = Rating {
            staff_id,
            rater_id,
            ticket_id,
            stars,
            created_at: Utc::now(),
        };
        self.store.append_rating(rating.clone()).await?;
        debug!(stars = stars.get(), "Rating recorded");

        let promotion = self
            .promotion
            .on_rating_recorded(&self.store, staff_id)
            .await?;

        Ok(RatedTicket { rating, promotion })
    }

    /// Appends a vouch written by `user_id` for `staff_id`.
    #[instrument(skip(self, description))]
    pub async fn submit_vouch(
        &self,
        staff_id: u64,
        user_id: u64,
        rating: i64,
        description: Option<String>,
    ) -> Result<Vouch> {
        vouch::submit_vouch(&self.store, staff_id, user_id, rating, description).await
    }

    /// One page of vouches in `scope`, newest first.
    pub async fn list_vouches(
        &self,
        scope: VouchScope,
        page: u64,
        page_size: u64,
    ) -> Result<VouchPage> {
        vouch::list_vouches(&self.store, scope, page, page_size).await
    }

    /// Next numbered channel name for a board option.
    pub async fn next_channel_name(&self, kind: ChannelKind, name: &str) -> Result<String> {
        counter::next_channel_name(&self.store, kind, name).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::TicketState;
    use crate::test_utils::{memory_desk, seed_claimed_ticket, setup_sql_desk};

    const CREATOR: u64 = 111;
    const STAFF: u64 = 222;
    const OTHER_STAFF: u64 = 333;
    const CHANNEL: u64 = 9_000;

    #[tokio::test]
    async fn test_open_rejects_duplicate() -> Result<()> {
        let desk = memory_desk();
        let ticket = desk.open(CHANNEL, CREATOR, "als").await?;
        assert_eq!(ticket.state(), TicketState::Unclaimed);

        let result = desk.open(CHANNEL, OTHER_STAFF, "als").await;
        assert!(matches!(result, Err(Error::DuplicateTicket { ticket_id: CHANNEL })));
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_succeeds_at_most_once() -> Result<()> {
        let desk = memory_desk();
        desk.open(CHANNEL, CREATOR, "als").await?;

        let claimed = desk.claim(CHANNEL, STAFF).await?;
        assert_eq!(claimed.state(), TicketState::Claimed(STAFF));

        let second = desk.claim(CHANNEL, OTHER_STAFF).await;
        assert!(matches!(second, Err(Error::AlreadyClaimed { staff_id: STAFF })));

        // Same staff member again is still a second claim
        let again = desk.claim(CHANNEL, STAFF).await;
        assert!(matches!(again, Err(Error::AlreadyClaimed { .. })));

        assert_eq!(desk.ticket(CHANNEL).await?.unwrap().staff_id, Some(STAFF));
        Ok(())
    }

    #[tokio::test]
    async fn test_creator_cannot_claim_own_ticket() -> Result<()> {
        let desk = memory_desk();
        desk.open(CHANNEL, CREATOR, "als").await?;

        let result = desk.claim(CHANNEL, CREATOR).await;
        assert!(matches!(result, Err(Error::SelfClaimForbidden)));
        assert_eq!(desk.ticket(CHANNEL).await?.unwrap().staff_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_missing_ticket_is_internal() {
        let desk = memory_desk();
        let err = desk.claim(CHANNEL, STAFF).await.unwrap_err();
        assert!(matches!(err, Error::MissingTicketState { ticket_id: CHANNEL }));
        assert!(!err.is_user_facing());
    }

    #[tokio::test]
    async fn test_close_by_non_creator_leaves_row() -> Result<()> {
        let desk = memory_desk();
        seed_claimed_ticket(&desk, CHANNEL, CREATOR, STAFF).await?;

        for intruder in [STAFF, OTHER_STAFF] {
            let result = desk.close(CHANNEL, intruder).await;
            assert!(matches!(result, Err(Error::NotCreator { ticket_id: CHANNEL })));
        }

        let row = desk.ticket(CHANNEL).await?.unwrap();
        assert_eq!(row.creator_id, CREATOR);
        assert_eq!(row.staff_id, Some(STAFF));
        assert_eq!(row.status, TicketStatus::Open);
        Ok(())
    }

    #[tokio::test]
    async fn test_close_missing_ticket() {
        let desk = memory_desk();
        let result = desk.close(CHANNEL, CREATOR).await;
        assert!(matches!(result, Err(Error::TicketNotFound { ticket_id: CHANNEL })));
    }

    #[tokio::test]
    async fn test_close_unclaimed_ticket_has_no_prompt() -> Result<()> {
        let desk = memory_desk();
        desk.open(CHANNEL, CREATOR, "als").await?;

        let closed = desk.close(CHANNEL, CREATOR).await?;
        assert_eq!(closed.ticket.state(), TicketState::Closed);
        assert!(closed.rating_prompt.is_none());
        assert!(desk.ticket(CHANNEL).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_close_claimed_ticket_prompts_creator() -> Result<()> {
        let desk = memory_desk();
        seed_claimed_ticket(&desk, CHANNEL, CREATOR, STAFF).await?;

        let closed = desk.close(CHANNEL, CREATOR).await?;
        assert_eq!(
            closed.rating_prompt,
            Some(RatingPrompt {
                ticket_id: CHANNEL,
                creator_id: CREATOR,
                staff_id: STAFF,
            })
        );

        // Second close finds nothing
        let again = desk.close(CHANNEL, CREATOR).await;
        assert!(matches!(again, Err(Error::TicketNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_rate_validates_and_rejects_repeat() -> Result<()> {
        let desk = memory_desk();

        let result = desk.rate(CHANNEL, STAFF, 7, CREATOR).await;
        assert!(matches!(result, Err(Error::InvalidRating { rating: 7 })));

        let rated = desk.rate(CHANNEL, STAFF, 4, CREATOR).await?;
        assert_eq!(rated.rating.stars.get(), 4);
        assert!(rated.promotion.is_none());

        let repeat = desk.rate(CHANNEL, STAFF, 5, CREATOR).await;
        assert!(matches!(repeat, Err(Error::AlreadyRated { ticket_id: CHANNEL })));
        Ok(())
    }

    #[tokio::test]
    async fn test_full_scenario_promotes_once() -> Result<()> {
        let desk = setup_sql_desk().await?;
        let mut promotions = Vec::new();

        for n in 0..16 {
            let channel = CHANNEL + n;
            let creator = CREATOR + n;
            desk.open(channel, creator, "als").await?;
            desk.claim(channel, STAFF).await?;

            let closed = desk.close(channel, creator).await?;
            let prompt = closed.rating_prompt.unwrap();
            assert_eq!(prompt.creator_id, creator);
            assert_eq!(prompt.staff_id, STAFF);

            let rated = desk
                .rate(prompt.ticket_id, prompt.staff_id, 5, prompt.creator_id)
                .await?;
            promotions.extend(rated.promotion);
        }

        assert_eq!(promotions.len(), 1);
        assert_eq!(promotions[0].staff_id, STAFF);
        assert_eq!(promotions[0].five_star_count, 15);
        Ok(())
    }

    #[tokio::test]
    async fn test_sql_backend_matches_memory_rules() -> Result<()> {
        let desk = setup_sql_desk().await?;
        seed_claimed_ticket(&desk, CHANNEL, CREATOR, STAFF).await?;

        let second = desk.claim(CHANNEL, OTHER_STAFF).await;
        assert!(matches!(second, Err(Error::AlreadyClaimed { staff_id: STAFF })));

        let intruder = desk.close(CHANNEL, STAFF).await;
        assert!(matches!(intruder, Err(Error::NotCreator { .. })));
        assert_eq!(desk.ticket(CHANNEL).await?.unwrap().staff_id, Some(STAFF));

        let closed = desk.close(CHANNEL, CREATOR).await?;
        assert_eq!(closed.ticket.status, TicketStatus::Closed);
        assert!(closed.rating_prompt.is_some());
        assert!(desk.ticket(CHANNEL).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_promotion_fires_on_15th_and_30th() -> Result<()> {
        let desk = memory_desk();
        let mut fired_at = Vec::new();

        for n in 1..=30 {
            let rated = desk.rate(n, STAFF, 5, CREATOR).await?;
            if rated.promotion.is_some() {
                fired_at.push(n);
            }
        }

        assert_eq!(fired_at, vec![15, 30]);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_claims_single_winner() -> Result<()> {
        let desk = std::sync::Arc::new(memory_desk());
        desk.open(CHANNEL, CREATOR, "als").await?;

        let mut handles = Vec::new();
        for staff in 1..=8 {
            let desk = std::sync::Arc::clone(&desk);
            handles.push(tokio::spawn(async move { desk.claim(CHANNEL, staff).await }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_next_channel_name_through_desk() -> Result<()> {
        let desk = memory_desk();
        assert_eq!(
            desk.next_channel_name(ChannelKind::Ticket, "als").await?,
            "als-ticket-0001"
        );
        Ok(())
    }
}
