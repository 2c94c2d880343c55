//! Unified error type for the support desk.
//!
//! Variants fall into two groups. User-facing rejections (wrong actor, duplicate
//! claim, unknown ticket, bad input) are shown to the person who triggered them
//! as an ephemeral reply using their `Display` text. Everything else is an
//! internal error: it is logged and the user only sees a generic message.

use thiserror::Error;

/// All errors produced by the desk core, the stores and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A ticket row already exists for this channel
    #[error("❌ A ticket already exists for this channel.")]
    DuplicateTicket {
        /// Channel identity of the existing ticket
        ticket_id: u64,
    },

    /// Someone already took this ticket
    #[error("❌ This request has already been taken.")]
    AlreadyClaimed {
        /// Staff member holding the ticket
        staff_id: u64,
    },

    /// The creator tried to claim their own ticket
    #[error("❌ You cannot take your own request.")]
    SelfClaimForbidden,

    /// Only the creator may close a ticket
    #[error("❌ Only the ticket creator can delete this ticket.")]
    NotCreator {
        /// Channel identity of the ticket
        ticket_id: u64,
    },

    /// No open ticket is tracked for this channel
    #[error("❌ This ticket does not exist or is already closed.")]
    TicketNotFound {
        /// Channel identity that was looked up
        ticket_id: u64,
    },

    /// Star ratings must be between 1 and 5
    #[error("❌ Ratings must be between 1 and 5 stars (got {rating}).")]
    InvalidRating {
        /// The rejected value
        rating: i64,
    },

    /// The rater already rated the staff member for this ticket
    #[error("❌ You already rated the support for this ticket.")]
    AlreadyRated {
        /// Ticket the rating was given for
        ticket_id: u64,
    },

    /// Page numbers are 1-based and page sizes must be positive
    #[error("❌ Invalid page {page} (page size {page_size}).")]
    InvalidPage {
        /// Requested page
        page: u64,
        /// Requested page size
        page_size: u64,
    },

    /// Vouch text exceeded the accepted length
    #[error("❌ Vouch descriptions are limited to {max} characters.")]
    DescriptionTooLong {
        /// Maximum accepted length in characters
        max: usize,
    },

    /// Application review and the staff guide need the staff role
    #[error("🚫 You don't have permission to do that.")]
    NotStaff,

    /// Someone pressed a button on a view opened by another user
    #[error("🚫 Only the person who opened this can use these buttons.")]
    NotViewOwner,

    /// A board offered an option that is no longer configured
    #[error("❌ The option `{name}` is no longer available.")]
    UnknownKind {
        /// Short name carried by the component
        name: String,
    },

    /// An action assumed a ticket row that is not there
    #[error("Ticket state missing for channel {ticket_id}")]
    MissingTicketState {
        /// Channel identity that was looked up
        ticket_id: u64,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Storage backend failure
    #[error("Database error: {0}")]
    Database(String),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Discord API or gateway failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the error should be shown verbatim to the user who caused it.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTicket { .. }
                | Self::AlreadyClaimed { .. }
                | Self::SelfClaimForbidden
                | Self::NotCreator { .. }
                | Self::TicketNotFound { .. }
                | Self::InvalidRating { .. }
                | Self::AlreadyRated { .. }
                | Self::InvalidPage { .. }
                | Self::DescriptionTooLong { .. }
                | Self::NotStaff
                | Self::NotViewOwner
                | Self::UnknownKind { .. }
        )
    }

    /// Text to show the user: the error itself for rejections, a generic
    /// message for internal failures.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            "⚠️ Internal error.".to_string()
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
