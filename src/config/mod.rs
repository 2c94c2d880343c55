/// Database configuration and connection management
pub mod database;

/// Bot settings loaded from config.toml
pub mod settings;

pub use settings::{
    ApplicationKindConfig, DeskSettings, GuildSettings, Settings, TicketKindConfig, load_config,
    load_default_config,
};
