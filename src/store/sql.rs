//! `SeaORM` backend.
//!
//! Discord ids are stored as text, like every other user id column in the bot.
//! Read-modify-write sequences (ticket insert, counter increment, milestone
//! check-then-set) each run inside a database transaction while holding the
//! per-table write lock, so concurrent events cannot lose updates.

use super::{
    ApplicationLog, CounterStore, MilestoneStore, RatingStore, TicketStore, VouchStore,
};
use crate::entities::{
    Application, Counter, PromotionMilestone, StaffRating, Ticket, Vouch, application, counter,
    promotion_milestone, staff_rating, ticket, vouch,
};
use crate::errors::{Error, Result};
use crate::models::{self, Stars, TicketStatus, VouchScope};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tokio::sync::Mutex;

/// Desk tables in a `SeaORM` database
#[derive(Debug)]
pub struct SqlStore {
    db: DatabaseConnection,
    ticket_writes: Mutex<()>,
    counter_writes: Mutex<()>,
    milestone_writes: Mutex<()>,
}

impl SqlStore {
    /// Wraps a connection whose tables already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            ticket_writes: Mutex::new(()),
            counter_writes: Mutex::new(()),
            milestone_writes: Mutex::new(()),
        }
    }

    /// The underlying connection
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn parse_id(column: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Database(format!("corrupt {column} {value:?}")))
}

fn parse_stars(value: i32) -> Result<Stars> {
    Stars::new(i64::from(value)).map_err(|_| Error::Database(format!("corrupt rating {value}")))
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::Database(format!("value {value} out of range")))
}

fn ticket_from_model(model: ticket::Model) -> Result<models::Ticket> {
    let status = TicketStatus::parse(&model.status)
        .ok_or_else(|| Error::Database(format!("corrupt ticket status {:?}", model.status)))?;
    Ok(models::Ticket {
        id: parse_id("channel_id", &model.channel_id)?,
        creator_id: parse_id("creator_id", &model.creator_id)?,
        staff_id: model
            .staff_id
            .as_deref()
            .map(|id| parse_id("staff_id", id))
            .transpose()?,
        status,
        kind: model.kind,
        opened_at: model.opened_at,
    })
}

fn rating_from_model(model: staff_rating::Model) -> Result<models::Rating> {
    Ok(models::Rating {
        staff_id: parse_id("staff_id", &model.staff_id)?,
        rater_id: parse_id("rater_id", &model.rater_id)?,
        ticket_id: parse_id("ticket_id", &model.ticket_id)?,
        stars: parse_stars(model.rating)?,
        created_at: model.created_at,
    })
}

fn vouch_from_model(model: vouch::Model) -> Result<models::Vouch> {
    Ok(models::Vouch {
        staff_id: parse_id("staff_id", &model.staff_id)?,
        user_id: parse_id("user_id", &model.user_id)?,
        stars: parse_stars(model.rating)?,
        description: model.description,
        created_at: model.created_at,
    })
}

fn application_from_model(model: application::Model) -> Result<models::Application> {
    Ok(models::Application {
        user_id: parse_id("user_id", &model.user_id)?,
        kind: model.app_type,
        channel_id: parse_id("channel_id", &model.channel_id)?,
        created_at: model.created_at,
    })
}

fn scoped_vouches(scope: VouchScope) -> Select<Vouch> {
    match scope {
        VouchScope::All => Vouch::find(),
        VouchScope::ByUser(user_id) => {
            Vouch::find().filter(vouch::Column::UserId.eq(user_id.to_string()))
        }
    }
}

impl TicketStore for SqlStore {
    async fn insert_ticket(&self, new_ticket: models::Ticket) -> Result<()> {
        let _guard = self.ticket_writes.lock().await;
        let txn = self.db.begin().await?;

        let key = new_ticket.id.to_string();
        if Ticket::find_by_id(key.clone()).one(&txn).await?.is_some() {
            return Err(Error::DuplicateTicket {
                ticket_id: new_ticket.id,
            });
        }

        ticket::ActiveModel {
            channel_id: Set(key),
            creator_id: Set(new_ticket.creator_id.to_string()),
            staff_id: Set(new_ticket.staff_id.map(|id| id.to_string())),
            status: Set(new_ticket.status.as_str().to_string()),
            kind: Set(new_ticket.kind),
            opened_at: Set(new_ticket.opened_at),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn get_ticket(&self, ticket_id: u64) -> Result<Option<models::Ticket>> {
        Ticket::find_by_id(ticket_id.to_string())
            .one(&self.db)
            .await?
            .map(ticket_from_model)
            .transpose()
    }

    async fn assign_staff(&self, ticket_id: u64, staff_id: u64) -> Result<bool> {
        // Conditional update: only an unclaimed row matches.
        let result = Ticket::update_many()
            .col_expr(ticket::Column::StaffId, Expr::value(staff_id.to_string()))
            .filter(ticket::Column::ChannelId.eq(ticket_id.to_string()))
            .filter(ticket::Column::StaffId.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn remove_ticket(&self, ticket_id: u64) -> Result<Option<models::Ticket>> {
        let _guard = self.ticket_writes.lock().await;
        let txn = self.db.begin().await?;

        let Some(model) = Ticket::find_by_id(ticket_id.to_string()).one(&txn).await? else {
            return Ok(None);
        };
        Ticket::delete_by_id(model.channel_id.clone())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        ticket_from_model(model).map(Some)
    }
}

impl RatingStore for SqlStore {
    async fn append_rating(&self, rating: models::Rating) -> Result<()> {
        staff_rating::ActiveModel {
            staff_id: Set(rating.staff_id.to_string()),
            rater_id: Set(rating.rater_id.to_string()),
            ticket_id: Set(rating.ticket_id.to_string()),
            rating: Set(i32::from(rating.stars.get())),
            created_at: Set(rating.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn has_rated(&self, ticket_id: u64, rater_id: u64) -> Result<bool> {
        let count = StaffRating::find()
            .filter(staff_rating::Column::TicketId.eq(ticket_id.to_string()))
            .filter(staff_rating::Column::RaterId.eq(rater_id.to_string()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn count_ratings(&self, staff_id: u64, stars: Stars) -> Result<u64> {
        StaffRating::find()
            .filter(staff_rating::Column::StaffId.eq(staff_id.to_string()))
            .filter(staff_rating::Column::Rating.eq(i32::from(stars.get())))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn all_ratings(&self) -> Result<Vec<models::Rating>> {
        StaffRating::find()
            .order_by_asc(staff_rating::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(rating_from_model)
            .collect()
    }
}

impl VouchStore for SqlStore {
    async fn append_vouch(&self, new_vouch: models::Vouch) -> Result<()> {
        vouch::ActiveModel {
            staff_id: Set(new_vouch.staff_id.to_string()),
            user_id: Set(new_vouch.user_id.to_string()),
            rating: Set(i32::from(new_vouch.stars.get())),
            description: Set(new_vouch.description),
            created_at: Set(new_vouch.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn count_vouches(&self, scope: VouchScope) -> Result<u64> {
        scoped_vouches(scope)
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn vouch_slice(
        &self,
        scope: VouchScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<models::Vouch>> {
        scoped_vouches(scope)
            .order_by_desc(vouch::Column::CreatedAt)
            .order_by_desc(vouch::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(vouch_from_model)
            .collect()
    }
}

impl CounterStore for SqlStore {
    async fn next_value(&self, category: &str) -> Result<u64> {
        let _guard = self.counter_writes.lock().await;
        let txn = self.db.begin().await?;

        let next = match Counter::find_by_id(category.to_string()).one(&txn).await? {
            Some(existing) => {
                let next = existing.value + 1;
                let mut active: counter::ActiveModel = existing.into();
                active.value = Set(next);
                active.update(&txn).await?;
                next
            }
            None => {
                counter::ActiveModel {
                    category: Set(category.to_string()),
                    value: Set(1),
                }
                .insert(&txn)
                .await?;
                1
            }
        };

        txn.commit().await?;
        u64::try_from(next).map_err(|_| Error::Database(format!("corrupt counter {next}")))
    }
}

impl MilestoneStore for SqlStore {
    async fn record_milestone(&self, staff_id: u64, multiple: u64) -> Result<bool> {
        let _guard = self.milestone_writes.lock().await;
        let multiple = to_i64(multiple)?;
        let txn = self.db.begin().await?;

        let existing = PromotionMilestone::find()
            .filter(promotion_milestone::Column::StaffId.eq(staff_id.to_string()))
            .filter(promotion_milestone::Column::Multiple.eq(multiple))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        promotion_milestone::ActiveModel {
            staff_id: Set(staff_id.to_string()),
            multiple: Set(multiple),
            reached_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(true)
    }

    async fn milestones_for(&self, staff_id: u64) -> Result<Vec<u64>> {
        PromotionMilestone::find()
            .filter(promotion_milestone::Column::StaffId.eq(staff_id.to_string()))
            .order_by_asc(promotion_milestone::Column::Multiple)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| {
                u64::try_from(m.multiple)
                    .map_err(|_| Error::Database(format!("corrupt milestone {}", m.multiple)))
            })
            .collect()
    }
}

impl ApplicationLog for SqlStore {
    async fn append_application(&self, new_application: models::Application) -> Result<()> {
        application::ActiveModel {
            user_id: Set(new_application.user_id.to_string()),
            app_type: Set(new_application.kind),
            channel_id: Set(new_application.channel_id.to_string()),
            created_at: Set(new_application.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn applications_for(&self, user_id: u64) -> Result<Vec<models::Application>> {
        Application::find()
            .filter(application::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(application::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(application_from_model)
            .collect()
    }
}
