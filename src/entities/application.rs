//! Application entity - audit log of every application channel opened.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user id of the applicant
    pub user_id: String,
    /// Application kind, e.g. `"astdx"`
    pub app_type: String,
    /// Discord channel id created for the application
    pub channel_id: String,
    /// When the application was opened
    pub created_at: DateTimeUtc,
}

/// Applications have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
