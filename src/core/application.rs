//! Application intake.
//!
//! An application channel is a ticket like any other, so its creator can delete
//! it through the same close flow. Each opening is also written to the
//! application log.

use crate::{
    core::lifecycle::TicketDesk,
    errors::Result,
    models::{Application, Ticket},
    store::DeskStore,
};
use tracing::{info, instrument};

impl<S: DeskStore> TicketDesk<S> {
    /// Opens the ticket row for an application channel and logs the application.
    #[instrument(skip(self))]
    pub async fn open_application(
        &self,
        channel_id: u64,
        user_id: u64,
        kind: &str,
    ) -> Result<Ticket> {
        let ticket = self.open(channel_id, user_id, kind).await?;
        self.store()
            .append_application(Application {
                user_id,
                kind: kind.to_string(),
                channel_id,
                created_at: ticket.opened_at,
            })
            .await?;
        info!("Application opened");
        Ok(ticket)
    }

    /// Applications a user has opened, oldest first.
    pub async fn applications_for(&self, user_id: u64) -> Result<Vec<Application>> {
        self.store().applications_for(user_id).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{memory_desk, setup_sql_desk};

    #[tokio::test]
    async fn test_open_application_logs_and_opens_ticket() -> Result<()> {
        let desk = setup_sql_desk().await?;

        let ticket = desk.open_application(500, 42, "all").await?;
        assert_eq!(ticket.creator_id, 42);
        assert_eq!(ticket.kind, "all");
        assert!(desk.ticket(500).await?.is_some());

        let logged = desk.applications_for(42).await?;
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].channel_id, 500);
        assert_eq!(logged[0].kind, "all");
        Ok(())
    }

    #[tokio::test]
    async fn test_application_channel_closes_like_a_ticket() -> Result<()> {
        let desk = memory_desk();
        desk.open_application(500, 42, "all").await?;

        let closed = desk.close(500, 42).await?;
        assert!(closed.rating_prompt.is_none());
        // The log keeps the entry after the channel is gone
        assert_eq!(desk.applications_for(42).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_application_channel_not_logged() -> Result<()> {
        let desk = memory_desk();
        desk.open_application(500, 42, "all").await?;

        let result = desk.open_application(500, 43, "all").await;
        assert!(matches!(result, Err(Error::DuplicateTicket { .. })));
        assert!(desk.applications_for(43).await?.is_empty());
        Ok(())
    }
}
