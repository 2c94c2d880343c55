//! Per-staff rating summaries for the `staffratings` listing.

use crate::{
    core::lifecycle::TicketDesk,
    errors::Result,
    models::{Rating, StaffRatingSummary, Stars},
    store::DeskStore,
};
use std::collections::HashMap;

/// Groups ratings by staff member, most-rated first.
///
/// Ties on the count are ordered by staff id so the listing is stable.
#[must_use]
pub fn summarize(ratings: &[Rating]) -> Vec<StaffRatingSummary> {
    let mut totals: HashMap<u64, (u64, u64, u64)> = HashMap::new();
    for rating in ratings {
        let entry = totals.entry(rating.staff_id).or_default();
        entry.0 += 1;
        entry.1 += u64::from(rating.stars.get());
        if rating.stars == Stars::FIVE {
            entry.2 += 1;
        }
    }

    let mut summaries: Vec<StaffRatingSummary> = totals
        .into_iter()
        .map(|(staff_id, (count, star_sum, five_star_count))| {
            #[allow(clippy::cast_precision_loss)]
            let average = star_sum as f64 / count as f64;
            StaffRatingSummary {
                staff_id,
                count,
                average,
                five_star_count,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count).then(a.staff_id.cmp(&b.staff_id)));
    summaries
}

/// One listing line, e.g. `3 ratings | Avg: 4.33⭐`
#[must_use]
pub fn format_summary_line(summary: &StaffRatingSummary) -> String {
    format!("{} ratings | Avg: {:.2}⭐", summary.count, summary.average)
}

impl<S: DeskStore> TicketDesk<S> {
    /// Rating summaries of every rated staff member.
    pub async fn staff_summaries(&self) -> Result<Vec<StaffRatingSummary>> {
        let ratings = self.store().all_ratings().await?;
        Ok(summarize(&ratings))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::memory_desk;
    use chrono::Utc;

    fn rating(staff_id: u64, ticket_id: u64, stars: i64) -> Rating {
        Rating {
            staff_id,
            rater_id: ticket_id + 100,
            ticket_id,
            stars: Stars::new(stars).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_groups_and_orders() {
        let ratings = vec![
            rating(1, 1, 5),
            rating(2, 2, 3),
            rating(2, 3, 4),
            rating(2, 4, 5),
            rating(3, 5, 1),
        ];

        let summaries = summarize(&ratings);
        let order: Vec<u64> = summaries.iter().map(|s| s.staff_id).collect();
        assert_eq!(order, vec![2, 1, 3]);

        assert_eq!(summaries[0].count, 3);
        assert_eq!(summaries[0].five_star_count, 1);
        assert!((summaries[0].average - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_format_summary_line() {
        let summary = StaffRatingSummary {
            staff_id: 1,
            count: 3,
            average: 13.0 / 3.0,
            five_star_count: 1,
        };
        assert_eq!(format_summary_line(&summary), "3 ratings | Avg: 4.33⭐");
    }

    #[tokio::test]
    async fn test_staff_summaries_from_desk() -> Result<()> {
        let desk = memory_desk();
        desk.rate(1, 7, 5, 100).await?;
        desk.rate(2, 7, 4, 101).await?;
        desk.rate(3, 8, 2, 102).await?;

        let summaries = desk.staff_summaries().await?;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].staff_id, 7);
        assert!((summaries[0].average - 4.5).abs() < f64::EPSILON);
        Ok(())
    }
}
