//! Framework-agnostic desk logic.
//!
//! Nothing in here talks to Discord. The bot layer translates interactions into
//! calls on [`lifecycle::TicketDesk`] and renders what comes back.

/// Application channels and the application log
pub mod application;
/// Numbered channel names
pub mod counter;
/// Ticket open, claim, close and rating flow
pub mod lifecycle;
/// Five-star promotion milestones
pub mod promotion;
/// Staff rating summaries
pub mod summary;
/// Vouch submission and paged listings
pub mod vouch;

pub use lifecycle::{ClosedTicket, RatedTicket, RatingPrompt, TicketDesk};
