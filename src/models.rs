//! Framework-agnostic domain records shared by the stores and the desk core.
//!
//! Discord snowflakes are carried as plain `u64`; the SQL backend stores them as
//! text the same way the rest of the bot stores user ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted star rating
pub const MIN_STARS: u8 = 1;
/// Highest accepted star rating
pub const MAX_STARS: u8 = 5;

/// Whether a ticket is still being worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Channel exists and the creator has not deleted it
    Open,
    /// Creator deleted the ticket; the row is gone from the store
    Closed,
}

impl TicketStatus {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Parses the storage representation, `None` for anything unknown
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Lifecycle position of a ticket, derived from its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    /// Open and waiting for a staff member
    Unclaimed,
    /// Open and held by the given staff member
    Claimed(u64),
    /// Deleted by its creator
    Closed,
}

/// A support ticket or application channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Channel identity
    pub id: u64,
    /// User who opened the ticket
    pub creator_id: u64,
    /// Staff member who claimed it, set at most once
    pub staff_id: Option<u64>,
    /// Open until the creator deletes it
    pub status: TicketStatus,
    /// Ticket kind the channel was opened for (e.g. `als`, `astdx`)
    pub kind: String,
    /// When the ticket was opened
    pub opened_at: DateTime<Utc>,
}

impl Ticket {
    /// A fresh, unclaimed ticket.
    #[must_use]
    pub fn open(id: u64, creator_id: u64, kind: impl Into<String>) -> Self {
        Self {
            id,
            creator_id,
            staff_id: None,
            status: TicketStatus::Open,
            kind: kind.into(),
            opened_at: Utc::now(),
        }
    }

    /// Current lifecycle position
    #[must_use]
    pub const fn state(&self) -> TicketState {
        match (self.status, self.staff_id) {
            (TicketStatus::Closed, _) => TicketState::Closed,
            (TicketStatus::Open, Some(staff_id)) => TicketState::Claimed(staff_id),
            (TicketStatus::Open, None) => TicketState::Unclaimed,
        }
    }
}

/// A validated 1-5 star value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Stars(u8);

impl Stars {
    /// The rating that counts toward promotion
    pub const FIVE: Self = Self(MAX_STARS);

    /// Validates a raw rating.
    pub fn new(value: i64) -> crate::errors::Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| (MIN_STARS..=MAX_STARS).contains(v))
            .map(Self)
            .ok_or(crate::errors::Error::InvalidRating { rating: value })
    }

    /// Raw value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// All ratings in ascending order, for building pickers
    pub fn all() -> impl Iterator<Item = Self> {
        (MIN_STARS..=MAX_STARS).map(Self)
    }
}

impl TryFrom<i64> for Stars {
    type Error = crate::errors::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(value: Stars) -> Self {
        value.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ⭐", self.0)
    }
}

/// A star rating given right after a ticket was closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Staff member being rated
    pub staff_id: u64,
    /// User who gave the rating
    pub rater_id: u64,
    /// Ticket the rating was given for
    pub ticket_id: u64,
    /// Star value
    pub stars: Stars,
    /// When the rating was recorded
    pub created_at: DateTime<Utc>,
}

/// An opt-in testimonial left for a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vouch {
    /// Staff member being vouched for
    pub staff_id: u64,
    /// User who wrote the vouch
    pub user_id: u64,
    /// Star value
    pub stars: Stars,
    /// Optional free text
    pub description: Option<String>,
    /// When the vouch was submitted
    pub created_at: DateTime<Utc>,
}

/// Which vouches a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VouchScope {
    /// Vouches written by one user
    ByUser(u64),
    /// Every vouch in the store
    All,
}

/// An application that was opened, kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Applicant
    pub user_id: u64,
    /// Application kind (e.g. `als`, `astdx`, `all`)
    pub kind: String,
    /// Channel created for the application
    pub channel_id: u64,
    /// When it was opened
    pub created_at: DateTime<Utc>,
}

/// Aggregated ratings for one staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffRatingSummary {
    /// Staff member
    pub staff_id: u64,
    /// Number of ratings received
    pub count: u64,
    /// Mean star value
    pub average: f64,
    /// Number of five-star ratings
    pub five_star_count: u64,
}
