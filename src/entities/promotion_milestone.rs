//! Promotion milestone entity - records which five-star multiples already
//! triggered a promotion so each multiple fires once, across restarts too.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Promotion milestone database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotion_milestones")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user id of the promoted staff member
    pub staff_id: String,
    /// Which multiple of the threshold was reached (1 for 15, 2 for 30, ...)
    pub multiple: i64,
    /// When the milestone fired
    pub reached_at: DateTimeUtc,
}

/// Milestones have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
