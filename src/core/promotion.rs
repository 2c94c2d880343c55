//! Promotion rule.
//!
//! A staff member is promoted every time their five-star count reaches a
//! multiple of the configured threshold. Each multiple fires once: the marker is
//! recorded in the milestone store before the promotion is reported, so later
//! ratings that leave the count on the same multiple do not fire again.

use crate::{
    errors::Result,
    models::Stars,
    store::{MilestoneStore, RatingStore},
};
use tracing::info;

/// Five-star ratings per promotion unless configured otherwise
pub const DEFAULT_PROMOTION_THRESHOLD: u64 = 15;

/// A promotion that just became due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    /// Staff member to promote
    pub staff_id: u64,
    /// Five-star ratings accumulated so far
    pub five_star_count: u64,
    /// Which multiple of the threshold was reached
    pub multiple: u64,
}

/// Watches rating insertions and decides when a promotion is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionEvaluator {
    threshold: u64,
}

impl Default for PromotionEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_PROMOTION_THRESHOLD)
    }
}

impl PromotionEvaluator {
    /// Evaluator firing every `threshold` five-star ratings (at least 1).
    #[must_use]
    pub const fn new(threshold: u64) -> Self {
        Self {
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Configured threshold
    #[must_use]
    pub const fn threshold(&self) -> u64 {
        self.threshold
    }

    /// The multiple a five-star count sits on, if it sits exactly on one.
    #[must_use]
    pub const fn multiple_for(&self, five_star_count: u64) -> Option<u64> {
        if five_star_count > 0 && five_star_count % self.threshold == 0 {
            Some(five_star_count / self.threshold)
        } else {
            None
        }
    }

    /// Runs after a rating for `staff_id` was stored.
    ///
    /// Returns the promotion to carry out, or `None` when the count is not on a
    /// multiple or that multiple already fired. Callers serialize invocations
    /// per store so the count and the marker stay consistent.
    pub async fn on_rating_recorded<S>(&self, store: &S, staff_id: u64) -> Result<Option<Promotion>>
    where
        S: RatingStore + MilestoneStore,
    {
        let five_star_count = store.count_ratings(staff_id, Stars::FIVE).await?;
        let Some(multiple) = self.multiple_for(five_star_count) else {
            return Ok(None);
        };

        if !store.record_milestone(staff_id, multiple).await? {
            return Ok(None);
        }

        info!(staff_id, five_star_count, multiple, "Promotion milestone reached");
        Ok(Some(Promotion {
            staff_id,
            five_star_count,
            multiple,
        }))
    }
}
