//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions that are not
//! commands: button clicks, select menus and modal submissions.

/// Custom id codec for the desk's components
pub mod components;
/// Component and modal dispatch
pub mod interactions;
/// Messages, embeds and components the desk sends
pub mod views;

pub use interactions::{event_handler, schedule_channel_deletion};
