//! Channel numbering.
//!
//! Every ticket and application channel gets a zero-padded sequence number from
//! a persisted per-category counter, e.g. `als-ticket-0007`.

use crate::{errors::Result, store::CounterStore};
use std::fmt;

/// What a numbered channel is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Support ticket opened from the ticket board
    Ticket,
    /// Staff application opened from the application board
    Application,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticket => write!(f, "ticket"),
            Self::Application => write!(f, "application"),
        }
    }
}

/// Counter category for a channel kind and board option
#[must_use]
pub fn category_key(kind: ChannelKind, name: &str) -> String {
    format!("{kind}:{name}")
}

/// Channel name for a given sequence number
#[must_use]
pub fn channel_name(kind: ChannelKind, name: &str, number: u64) -> String {
    format!("{name}-{kind}-{number:04}")
}

/// Takes the next number for `kind`/`name` and formats the channel name.
pub async fn next_channel_name<S: CounterStore>(
    store: &S,
    kind: ChannelKind,
    name: &str,
) -> Result<String> {
    let number = store.next_value(&category_key(kind, name)).await?;
    Ok(channel_name(kind, name, number))
}
