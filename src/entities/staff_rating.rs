//! Staff rating entity - append-only star ratings given after a ticket closes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff rating database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_ratings")]
pub struct Model {
    /// Unique identifier for the rating
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user id of the rated staff member
    pub staff_id: String,
    /// Discord user id of the rater
    pub rater_id: String,
    /// Channel id of the ticket the rating belongs to
    pub ticket_id: String,
    /// Star value, 1 to 5
    pub rating: i32,
    /// When the rating was recorded
    pub created_at: DateTimeUtc,
}

/// Ratings have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
