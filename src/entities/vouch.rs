//! Vouch entity - append-only testimonials left through the opt-in vouch flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vouch database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vouches")]
pub struct Model {
    /// Unique identifier, also breaks timestamp ties when listing
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user id of the staff member vouched for
    pub staff_id: String,
    /// Discord user id of the author
    pub user_id: String,
    /// Star value, 1 to 5
    pub rating: i32,
    /// Optional free-text feedback
    pub description: Option<String>,
    /// When the vouch was submitted
    pub created_at: DateTimeUtc,
}

/// Vouches have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
