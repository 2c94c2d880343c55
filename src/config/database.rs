//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Application, Counter, PromotionMilestone, StaffRating, Ticket, Vouch};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/support_desk.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file when the variable is not set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!("Connecting to {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table_for<E, C>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every desk table that does not exist yet.
///
/// Safe to call on every start: existing tables and their rows are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table_for(db, &schema, Ticket).await?;
    create_table_for(db, &schema, StaffRating).await?;
    create_table_for(db, &schema, Vouch).await?;
    create_table_for(db, &schema, Counter).await?;
    create_table_for(db, &schema, PromotionMilestone).await?;
    create_table_for(db, &schema, Application).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        ApplicationModel, CounterModel, PromotionMilestoneModel, StaffRatingModel, TicketModel,
        VouchModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<TicketModel> = Ticket::find().limit(1).all(&db).await?;
        let _: Vec<StaffRatingModel> = StaffRating::find().limit(1).all(&db).await?;
        let _: Vec<VouchModel> = Vouch::find().limit(1).all(&db).await?;
        let _: Vec<CounterModel> = Counter::find().limit(1).all(&db).await?;
        let _: Vec<PromotionMilestoneModel> = PromotionMilestone::find().limit(1).all(&db).await?;
        let _: Vec<ApplicationModel> = Application::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
