//! In-memory backend.
//!
//! Every table has its own mutex, so writers to one table never wait on another.
//! Guards are never held across an `.await`.

use super::{
    ApplicationLog, CounterStore, MilestoneStore, RatingStore, TicketStore, VouchStore,
};
use crate::errors::{Error, Result};
use crate::models::{Application, Rating, Stars, Ticket, Vouch, VouchScope};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Desk tables held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: Mutex<HashMap<u64, Ticket>>,
    ratings: Mutex<Vec<Rating>>,
    vouches: Mutex<Vec<Vouch>>,
    counters: Mutex<HashMap<String, u64>>,
    milestones: Mutex<BTreeSet<(u64, u64)>>,
    applications: Mutex<Vec<Application>>,
}

// A panic while holding a guard leaves plain data behind; keep serving it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketStore for MemoryStore {
    async fn insert_ticket(&self, ticket: Ticket) -> Result<()> {
        let mut tickets = lock(&self.tickets);
        if tickets.contains_key(&ticket.id) {
            return Err(Error::DuplicateTicket {
                ticket_id: ticket.id,
            });
        }
        tickets.insert(ticket.id, ticket);
        Ok(())
    }

    async fn get_ticket(&self, ticket_id: u64) -> Result<Option<Ticket>> {
        Ok(lock(&self.tickets).get(&ticket_id).cloned())
    }

    async fn assign_staff(&self, ticket_id: u64, staff_id: u64) -> Result<bool> {
        let mut tickets = lock(&self.tickets);
        match tickets.get_mut(&ticket_id) {
            Some(ticket) if ticket.staff_id.is_none() => {
                ticket.staff_id = Some(staff_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_ticket(&self, ticket_id: u64) -> Result<Option<Ticket>> {
        Ok(lock(&self.tickets).remove(&ticket_id))
    }
}

impl RatingStore for MemoryStore {
    async fn append_rating(&self, rating: Rating) -> Result<()> {
        lock(&self.ratings).push(rating);
        Ok(())
    }

    async fn has_rated(&self, ticket_id: u64, rater_id: u64) -> Result<bool> {
        Ok(lock(&self.ratings)
            .iter()
            .any(|r| r.ticket_id == ticket_id && r.rater_id == rater_id))
    }

    async fn count_ratings(&self, staff_id: u64, stars: Stars) -> Result<u64> {
        let count = lock(&self.ratings)
            .iter()
            .filter(|r| r.staff_id == staff_id && r.stars == stars)
            .count();
        Ok(count as u64)
    }

    async fn all_ratings(&self) -> Result<Vec<Rating>> {
        Ok(lock(&self.ratings).clone())
    }
}

impl VouchStore for MemoryStore {
    async fn append_vouch(&self, vouch: Vouch) -> Result<()> {
        lock(&self.vouches).push(vouch);
        Ok(())
    }

    async fn count_vouches(&self, scope: VouchScope) -> Result<u64> {
        let count = lock(&self.vouches)
            .iter()
            .filter(|v| in_scope(v, scope))
            .count();
        Ok(count as u64)
    }

    async fn vouch_slice(&self, scope: VouchScope, offset: u64, limit: u64) -> Result<Vec<Vouch>> {
        let vouches = lock(&self.vouches);
        // Insertion order breaks timestamp ties, newest insert first.
        let mut matching: Vec<(usize, &Vouch)> = vouches
            .iter()
            .enumerate()
            .filter(|(_, v)| in_scope(v, scope))
            .collect();
        matching.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, v)| v.clone())
            .collect())
    }
}

fn in_scope(vouch: &Vouch, scope: VouchScope) -> bool {
    match scope {
        VouchScope::All => true,
        VouchScope::ByUser(user_id) => vouch.user_id == user_id,
    }
}

impl CounterStore for MemoryStore {
    async fn next_value(&self, category: &str) -> Result<u64> {
        let mut counters = lock(&self.counters);
        let value = counters.entry(category.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

impl MilestoneStore for MemoryStore {
    async fn record_milestone(&self, staff_id: u64, multiple: u64) -> Result<bool> {
        Ok(lock(&self.milestones).insert((staff_id, multiple)))
    }

    async fn milestones_for(&self, staff_id: u64) -> Result<Vec<u64>> {
        Ok(lock(&self.milestones)
            .range((staff_id, 0)..=(staff_id, u64::MAX))
            .map(|(_, multiple)| *multiple)
            .collect())
    }
}

impl ApplicationLog for MemoryStore {
    async fn append_application(&self, application: Application) -> Result<()> {
        lock(&self.applications).push(application);
        Ok(())
    }

    async fn applications_for(&self, user_id: u64) -> Result<Vec<Application>> {
        Ok(lock(&self.applications)
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_vouch, vouch_at};

    #[tokio::test]
    async fn test_insert_ticket_rejects_duplicates() -> Result<()> {
        let store = MemoryStore::new();
        store.insert_ticket(Ticket::open(7, 1, "als")).await?;

        let result = store.insert_ticket(Ticket::open(7, 2, "astdx")).await;
        assert!(matches!(result, Err(Error::DuplicateTicket { ticket_id: 7 })));

        // Original row untouched
        assert_eq!(store.get_ticket(7).await?.unwrap().creator_id, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_assign_staff_only_once() -> Result<()> {
        let store = MemoryStore::new();
        store.insert_ticket(Ticket::open(7, 1, "als")).await?;

        assert!(store.assign_staff(7, 2).await?);
        assert!(!store.assign_staff(7, 3).await?);
        assert!(!store.assign_staff(99, 3).await?);
        assert_eq!(store.get_ticket(7).await?.unwrap().staff_id, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_counters_are_per_category() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.next_value("ticket:als").await?, 1);
        assert_eq!(store.next_value("ticket:als").await?, 2);
        assert_eq!(store.next_value("application:all").await?, 1);
        assert_eq!(store.next_value("ticket:als").await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_milestones_recorded_once() -> Result<()> {
        let store = MemoryStore::new();
        assert!(store.record_milestone(5, 1).await?);
        assert!(!store.record_milestone(5, 1).await?);
        assert!(store.record_milestone(5, 2).await?);
        assert!(store.record_milestone(6, 1).await?);
        assert_eq!(store.milestones_for(5).await?, vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_vouch_slice_orders_newest_first() -> Result<()> {
        let store = MemoryStore::new();
        store.append_vouch(vouch_at(1, 10, 0)).await?;
        store.append_vouch(vouch_at(2, 10, 60)).await?;
        store.append_vouch(vouch_at(3, 11, 30)).await?;
        // Same timestamp as the first one, inserted later
        store.append_vouch(vouch_at(4, 10, 0)).await?;

        let all = store.vouch_slice(VouchScope::All, 0, 10).await?;
        let staff: Vec<u64> = all.iter().map(|v| v.staff_id).collect();
        assert_eq!(staff, vec![2, 3, 4, 1]);

        let mine = store.vouch_slice(VouchScope::ByUser(10), 1, 10).await?;
        let staff: Vec<u64> = mine.iter().map(|v| v.staff_id).collect();
        assert_eq!(staff, vec![4, 1]);

        assert_eq!(store.count_vouches(VouchScope::ByUser(11)).await?, 1);
        store.append_vouch(sample_vouch(9, 11)).await?;
        assert_eq!(store.count_vouches(VouchScope::All).await?, 5);
        Ok(())
    }
}
