//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Rating and vouch listings
pub mod ratings;

/// Ticket and application boards
pub mod tickets;

// Export commands
pub use general::*;
pub use ratings::*;
pub use tickets::*;
