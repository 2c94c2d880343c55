//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod application;
pub mod counter;
pub mod promotion_milestone;
pub mod staff_rating;
pub mod ticket;
pub mod vouch;

// Re-export specific types to avoid conflicts
pub use application::{
    Column as ApplicationColumn, Entity as Application, Model as ApplicationModel,
};
pub use counter::{Column as CounterColumn, Entity as Counter, Model as CounterModel};
pub use promotion_milestone::{
    Column as PromotionMilestoneColumn, Entity as PromotionMilestone,
    Model as PromotionMilestoneModel,
};
pub use staff_rating::{
    Column as StaffRatingColumn, Entity as StaffRating, Model as StaffRatingModel,
};
pub use ticket::{Column as TicketColumn, Entity as Ticket, Model as TicketModel};
pub use vouch::{Column as VouchColumn, Entity as Vouch, Model as VouchModel};
