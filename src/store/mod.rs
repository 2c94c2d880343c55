//! Storage seams of the desk.
//!
//! Each table the desk owns sits behind its own trait so the lifecycle code in
//! [`crate::core`] never touches a concrete backend. Two backends implement all
//! of them: [`MemoryStore`] for tests and throwaway runs, [`SqlStore`] on top of
//! `SeaORM` for the bot.

use crate::errors::Result;
use crate::models::{Application, Rating, Stars, Ticket, Vouch, VouchScope};
use std::future::Future;

/// In-memory backend
pub mod memory;
/// `SeaORM` backend
pub mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

/// Open tickets keyed by channel id.
pub trait TicketStore: Send + Sync {
    /// Inserts a new ticket, failing with `DuplicateTicket` if the id is taken.
    fn insert_ticket(&self, ticket: Ticket) -> impl Future<Output = Result<()>> + Send;

    /// Fetches a ticket by channel id.
    fn get_ticket(&self, ticket_id: u64) -> impl Future<Output = Result<Option<Ticket>>> + Send;

    /// Sets the staff member of a ticket that has none yet.
    ///
    /// Returns `false` when the ticket is missing or already claimed; the row is
    /// left untouched in that case.
    fn assign_staff(
        &self,
        ticket_id: u64,
        staff_id: u64,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Removes a ticket and returns the row that was stored.
    fn remove_ticket(&self, ticket_id: u64)
    -> impl Future<Output = Result<Option<Ticket>>> + Send;
}

/// Append-only star ratings.
pub trait RatingStore: Send + Sync {
    /// Appends a rating.
    fn append_rating(&self, rating: Rating) -> impl Future<Output = Result<()>> + Send;

    /// Whether `rater_id` already rated the support of `ticket_id`.
    fn has_rated(
        &self,
        ticket_id: u64,
        rater_id: u64,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Number of ratings with exactly `stars` for a staff member.
    fn count_ratings(
        &self,
        staff_id: u64,
        stars: Stars,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Every rating, oldest first.
    fn all_ratings(&self) -> impl Future<Output = Result<Vec<Rating>>> + Send;
}

/// Append-only vouches.
pub trait VouchStore: Send + Sync {
    /// Appends a vouch.
    fn append_vouch(&self, vouch: Vouch) -> impl Future<Output = Result<()>> + Send;

    /// Number of vouches in scope.
    fn count_vouches(&self, scope: VouchScope) -> impl Future<Output = Result<u64>> + Send;

    /// One slice of the vouches in scope, newest first.
    fn vouch_slice(
        &self,
        scope: VouchScope,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<Vouch>>> + Send;
}

/// Numbering counters, one row per category.
pub trait CounterStore: Send + Sync {
    /// Increments the counter of `category` and returns the new value.
    ///
    /// The first call for a category returns 1.
    fn next_value(&self, category: &str) -> impl Future<Output = Result<u64>> + Send;
}

/// Promotion markers, one per staff member and threshold multiple.
pub trait MilestoneStore: Send + Sync {
    /// Records that `staff_id` reached `multiple`. Returns `false` if it was
    /// already recorded.
    fn record_milestone(
        &self,
        staff_id: u64,
        multiple: u64,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Multiples already reached by a staff member, ascending.
    fn milestones_for(&self, staff_id: u64) -> impl Future<Output = Result<Vec<u64>>> + Send;
}

/// Audit log of opened applications.
pub trait ApplicationLog: Send + Sync {
    /// Appends an application.
    fn append_application(
        &self,
        application: Application,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Applications opened by one user, oldest first.
    fn applications_for(
        &self,
        user_id: u64,
    ) -> impl Future<Output = Result<Vec<Application>>> + Send;
}

/// Everything the desk needs from a backend.
pub trait DeskStore:
    TicketStore + RatingStore + VouchStore + CounterStore + MilestoneStore + ApplicationLog
{
}

impl<T> DeskStore for T where
    T: TicketStore + RatingStore + VouchStore + CounterStore + MilestoneStore + ApplicationLog
{
}
