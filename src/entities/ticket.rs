//! Ticket entity - one row per open ticket or application channel.
//!
//! The row is keyed by the Discord channel id and removed when the creator
//! deletes the ticket. `staff_id` is written at most once, by the first claim.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ticket database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    /// Discord channel id of the ticket
    #[sea_orm(primary_key, auto_increment = false)]
    pub channel_id: String,
    /// Discord user id of the creator
    pub creator_id: String,
    /// Discord user id of the staff member who claimed the ticket
    pub staff_id: Option<String>,
    /// `"open"` or `"closed"`
    pub status: String,
    /// Ticket kind, e.g. `"als"`
    pub kind: String,
    /// When the ticket was opened
    pub opened_at: DateTimeUtc,
}

/// Tickets have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
