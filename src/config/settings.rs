//! Bot settings loaded from config.toml
//!
//! Guild ids, the ticket and application kinds offered on the boards, and the
//! desk tunables. Secrets (the bot token, the database URL) come from the
//! environment instead, see `main.rs`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Guild-level ids
    pub guild: GuildSettings,
    /// Ticket kinds offered by the ticket board
    #[serde(default, rename = "ticket_kind")]
    pub ticket_kinds: Vec<TicketKindConfig>,
    /// Application kinds offered by the application board
    #[serde(default, rename = "application_kind")]
    pub application_kinds: Vec<ApplicationKindConfig>,
    /// Desk tunables
    #[serde(default)]
    pub desk: DeskSettings,
}

/// Ids of the guild objects the bot works with
#[derive(Debug, Deserialize, Clone)]
pub struct GuildSettings {
    /// The guild the desk serves; ratings arrive by DM and need it for role grants
    pub guild_id: u64,
    /// Category new ticket and application channels are created under
    pub ticket_category_id: u64,
    /// Role that can see every ticket and review applications
    pub staff_role_id: u64,
    /// Channel receiving rating, vouch and promotion logs
    pub log_channel_id: u64,
    /// Role granted when a promotion milestone is reached
    pub promotion_role_id: u64,
}

/// A selectable ticket kind
#[derive(Debug, Deserialize, Clone)]
pub struct TicketKindConfig {
    /// Short name used in channel names and component ids, e.g. `als`
    pub name: String,
    /// Label shown in the selector
    pub label: String,
    /// Description shown in the selector
    #[serde(default)]
    pub description: Option<String>,
    /// Role pinged when a ticket of this kind opens
    #[serde(default)]
    pub role_id: Option<u64>,
}

/// A selectable application kind
#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationKindConfig {
    /// Short name used in channel names and component ids, e.g. `astdx`
    pub name: String,
    /// Button label
    pub label: String,
    /// Roles granted when the application is accepted
    #[serde(default)]
    pub grant_role_ids: Vec<u64>,
}

/// Tunables of the ticket lifecycle
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DeskSettings {
    /// Five-star ratings needed per promotion
    pub promotion_threshold: u64,
    /// Seconds between a ticket being deleted and its channel being removed
    pub close_delay_secs: u64,
    /// Page size of `vouches`
    pub vouch_page_size: u64,
    /// Page size of `allvouches`
    pub all_vouches_page_size: u64,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            promotion_threshold: 15,
            close_delay_secs: 5,
            vouch_page_size: 10,
            all_vouches_page_size: 5,
        }
    }
}

impl Settings {
    /// Looks up a ticket kind by its short name
    #[must_use]
    pub fn ticket_kind(&self, name: &str) -> Option<&TicketKindConfig> {
        self.ticket_kinds.iter().find(|kind| kind.name == name)
    }

    /// Looks up an application kind by its short name
    #[must_use]
    pub fn application_kind(&self, name: &str) -> Option<&ApplicationKindConfig> {
        self.application_kinds.iter().find(|kind| kind.name == name)
    }

    /// Rejects settings the bot cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.desk.promotion_threshold == 0 {
            return Err(Error::Config {
                message: "desk.promotion_threshold must be at least 1".to_string(),
            });
        }
        if self.desk.vouch_page_size == 0 || self.desk.all_vouches_page_size == 0 {
            return Err(Error::Config {
                message: "vouch page sizes must be at least 1".to_string(),
            });
        }
        // Names end up inside component ids, which use ':' as separator.
        let names = self
            .ticket_kinds
            .iter()
            .map(|kind| kind.name.as_str())
            .chain(self.application_kinds.iter().map(|kind| kind.name.as_str()));
        for name in names {
            if name.is_empty() || name.contains(':') {
                return Err(Error::Config {
                    message: format!("invalid kind name {name:?}"),
                });
            }
        }
        self.validate_ids()
    }

    /// Discord ids are non-zero; a zero left over from the example file would
    /// only surface once an interaction tries to use it.
    fn validate_ids(&self) -> Result<()> {
        let guild = &self.guild;
        let mut ids = vec![
            ("guild.guild_id".to_string(), guild.guild_id),
            ("guild.ticket_category_id".to_string(), guild.ticket_category_id),
            ("guild.staff_role_id".to_string(), guild.staff_role_id),
            ("guild.log_channel_id".to_string(), guild.log_channel_id),
            ("guild.promotion_role_id".to_string(), guild.promotion_role_id),
        ];
        for kind in &self.ticket_kinds {
            if let Some(role_id) = kind.role_id {
                ids.push((format!("ticket_kind {}.role_id", kind.name), role_id));
            }
        }
        for kind in &self.application_kinds {
            for role_id in &kind.grant_role_ids {
                ids.push((format!("application_kind {}.grant_role_ids", kind.name), *role_id));
            }
        }

        match ids.into_iter().find(|(_, id)| *id == 0) {
            Some((field, _)) => Err(Error::Config {
                message: format!("{field} must be a non-zero Discord id"),
            }),
            None => Ok(()),
        }
    }
}

/// Loads and validates settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or a value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let settings: Settings = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `DESK_CONFIG`, or ./config.toml when unset
pub fn load_default_config() -> Result<Settings> {
    let path = std::env::var("DESK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SAMPLE: &str = r#"
        [guild]
        guild_id = 1382000000000000000
        ticket_category_id = 1397234544368685269
        staff_role_id = 1397186487044411522
        log_channel_id = 1397579436274090035
        promotion_role_id = 1397185106975920138

        [[ticket_kind]]
        name = "als"
        label = "ALS"
        description = "Open a ticket for ALS Staff"
        role_id = 1397023739631108188

        [[ticket_kind]]
        name = "astdx"
        label = "ASTDX"

        [[application_kind]]
        name = "all"
        label = "Apply All"
        grant_role_ids = [1397023739631108188, 1382679356975087647]
    "#;

    #[test]
    fn test_parse_settings_with_defaults() {
        let settings: Settings = toml::from_str(SAMPLE).unwrap();
        settings.validate().unwrap();

        assert_eq!(settings.guild.staff_role_id, 1_397_186_487_044_411_522);
        assert_eq!(settings.ticket_kinds.len(), 2);
        assert_eq!(settings.ticket_kind("als").unwrap().role_id, Some(1_397_023_739_631_108_188));
        assert!(settings.ticket_kind("astdx").unwrap().description.is_none());
        assert_eq!(settings.application_kind("all").unwrap().grant_role_ids.len(), 2);
        assert_eq!(settings.desk, DeskSettings::default());
        assert_eq!(settings.desk.promotion_threshold, 15);
    }

    #[test]
    fn test_desk_overrides() {
        let toml_str = format!("{SAMPLE}\n[desk]\npromotion_threshold = 3\n");
        let settings: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings.desk.promotion_threshold, 3);
        assert_eq!(settings.desk.close_delay_secs, 5);
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let toml_str = format!("{SAMPLE}\n[desk]\npromotion_threshold = 0\n");
        let settings: Settings = toml::from_str(&toml_str).unwrap();
        assert!(matches!(settings.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_separator_in_kind_name() {
        let toml_str = format!("{SAMPLE}\n[[ticket_kind]]\nname = \"a:b\"\nlabel = \"bad\"\n");
        let settings: Settings = toml::from_str(&toml_str).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_guild_id() {
        let toml_str = SAMPLE.replace("staff_role_id = 1397186487044411522", "staff_role_id = 0");
        let settings: Settings = toml::from_str(&toml_str).unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("guild.staff_role_id"));
    }

    #[test]
    fn test_validate_rejects_zero_grant_role() {
        let toml_str = format!(
            "{SAMPLE}\n[[application_kind]]\nname = \"als\"\nlabel = \"Apply on ALS\"\ngrant_role_ids = [0]\n"
        );
        let settings: Settings = toml::from_str(&toml_str).unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("application_kind als.grant_role_ids"));
    }

    #[test]
    fn test_unedited_example_config_is_rejected() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
        let result = load_config(path);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/desk.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
