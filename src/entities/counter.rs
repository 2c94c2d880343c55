//! Counter entity - last issued number per naming category.
//!
//! Categories look like `"ticket:als"` or `"application:all"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Counter database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "counters")]
pub struct Model {
    /// Naming category
    #[sea_orm(primary_key, auto_increment = false)]
    pub category: String,
    /// Last number handed out
    pub value: i64,
}

/// Counters have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
