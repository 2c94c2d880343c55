//! Custom ids carried by the desk's buttons, selects and modals.
//!
//! Discord hands back only the custom id string when a component is used, so
//! every piece of state an interaction needs (kind, user, ticket, stars, page)
//! is encoded into it. Ids look like `desk:rate:9000:222:5`.

use crate::models::VouchScope;
use std::fmt;

const PREFIX: &str = "desk";

/// Custom id of the description field inside the vouch modal
pub const VOUCH_TEXT_INPUT_ID: &str = "desk:vouch_text";

/// Every component the desk sends and later dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskComponent {
    /// Ticket kind selector on the ticket board
    TicketKindSelect,
    /// Apply button on the application board
    Apply {
        /// Application kind short name
        kind: String,
    },
    /// Staff control accepting an application
    AcceptApplication {
        /// Application kind short name
        kind: String,
        /// Applicant
        user_id: u64,
    },
    /// Staff control rejecting an application
    RejectApplication {
        /// Applicant
        user_id: u64,
    },
    /// Take Request button inside a ticket channel
    Claim,
    /// Delete Ticket button inside a ticket or application channel
    Delete,
    /// Star button of the rating prompt
    Rate {
        /// Closed ticket
        ticket_id: u64,
        /// Staff member being rated
        staff_id: u64,
        /// Chosen stars
        stars: u8,
    },
    /// Star selector of the vouch invite
    VouchStars {
        /// Staff member being vouched for
        staff_id: u64,
    },
    /// Description modal of a vouch
    VouchModal {
        /// Staff member being vouched for
        staff_id: u64,
        /// Stars chosen in the selector
        stars: u8,
    },
    /// Previous/Next button of a vouch listing
    VouchPage {
        /// Listing scope
        scope: VouchScope,
        /// Page to show
        page: u64,
    },
    /// Next/Back button of the rules view
    RulesPage {
        /// User who ran the rules command; only they may turn pages
        author_id: u64,
        /// Page to show, 1 (rules) or 2 (staff guide)
        page: u8,
    },
}

impl DeskComponent {
    /// Decodes a custom id, `None` for ids the desk did not produce.
    #[must_use]
    pub fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.split(':');
        if parts.next()? != PREFIX {
            return None;
        }
        let action = parts.next()?;
        let fields: Vec<&str> = parts.collect();

        let component = match (action, fields.as_slice()) {
            ("ticket_kind", []) => Self::TicketKindSelect,
            ("apply", [kind]) if !kind.is_empty() => Self::Apply {
                kind: (*kind).to_string(),
            },
            ("app_accept", [kind, user]) if !kind.is_empty() => Self::AcceptApplication {
                kind: (*kind).to_string(),
                user_id: user.parse().ok()?,
            },
            ("app_reject", [user]) => Self::RejectApplication {
                user_id: user.parse().ok()?,
            },
            ("claim", []) => Self::Claim,
            ("delete", []) => Self::Delete,
            ("rate", [ticket, staff, stars]) => Self::Rate {
                ticket_id: ticket.parse().ok()?,
                staff_id: staff.parse().ok()?,
                stars: stars.parse().ok()?,
            },
            ("vouch_stars", [staff]) => Self::VouchStars {
                staff_id: staff.parse().ok()?,
            },
            ("vouch_modal", [staff, stars]) => Self::VouchModal {
                staff_id: staff.parse().ok()?,
                stars: stars.parse().ok()?,
            },
            ("vouches", [scope, page]) => Self::VouchPage {
                scope: match *scope {
                    "all" => VouchScope::All,
                    user => VouchScope::ByUser(user.parse().ok()?),
                },
                page: page.parse().ok()?,
            },
            ("rules", [author, page]) if matches!(*page, "1" | "2") => Self::RulesPage {
                author_id: author.parse().ok()?,
                page: page.parse().ok()?,
            },
            _ => return None,
        };
        Some(component)
    }
}

impl fmt::Display for DeskComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TicketKindSelect => write!(f, "{PREFIX}:ticket_kind"),
            Self::Apply { kind } => write!(f, "{PREFIX}:apply:{kind}"),
            Self::AcceptApplication { kind, user_id } => {
                write!(f, "{PREFIX}:app_accept:{kind}:{user_id}")
            }
            Self::RejectApplication { user_id } => write!(f, "{PREFIX}:app_reject:{user_id}"),
            Self::Claim => write!(f, "{PREFIX}:claim"),
            Self::Delete => write!(f, "{PREFIX}:delete"),
            Self::Rate {
                ticket_id,
                staff_id,
                stars,
            } => write!(f, "{PREFIX}:rate:{ticket_id}:{staff_id}:{stars}"),
            Self::VouchStars { staff_id } => write!(f, "{PREFIX}:vouch_stars:{staff_id}"),
            Self::VouchModal { staff_id, stars } => {
                write!(f, "{PREFIX}:vouch_modal:{staff_id}:{stars}")
            }
            Self::VouchPage { scope, page } => match scope {
                VouchScope::All => write!(f, "{PREFIX}:vouches:all:{page}"),
                VouchScope::ByUser(user_id) => write!(f, "{PREFIX}:vouches:{user_id}:{page}"),
            },
            Self::RulesPage { author_id, page } => write!(f, "{PREFIX}:rules:{author_id}:{page}"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_encoded_forms() {
        assert_eq!(DeskComponent::Claim.to_string(), "desk:claim");
        assert_eq!(
            DeskComponent::Rate {
                ticket_id: 9000,
                staff_id: 222,
                stars: 5
            }
            .to_string(),
            "desk:rate:9000:222:5"
        );
        assert_eq!(
            DeskComponent::VouchPage {
                scope: VouchScope::All,
                page: 2
            }
            .to_string(),
            "desk:vouches:all:2"
        );
        assert_eq!(
            DeskComponent::RulesPage {
                author_id: 42,
                page: 2
            }
            .to_string(),
            "desk:rules:42:2"
        );
    }

    #[test]
    fn test_parse_reads_back_what_display_writes() {
        let components = [
            DeskComponent::TicketKindSelect,
            DeskComponent::Apply {
                kind: "astdx".to_string(),
            },
            DeskComponent::AcceptApplication {
                kind: "all".to_string(),
                user_id: 42,
            },
            DeskComponent::RejectApplication { user_id: 42 },
            DeskComponent::Delete,
            DeskComponent::VouchStars { staff_id: 7 },
            DeskComponent::VouchModal {
                staff_id: 7,
                stars: 3,
            },
            DeskComponent::VouchPage {
                scope: VouchScope::ByUser(42),
                page: 3,
            },
            DeskComponent::RulesPage {
                author_id: 42,
                page: 1,
            },
        ];
        for component in components {
            assert_eq!(DeskComponent::parse(&component.to_string()), Some(component));
        }
    }

    #[test]
    fn test_parse_rejects_foreign_and_malformed_ids() {
        assert_eq!(DeskComponent::parse(""), None);
        assert_eq!(DeskComponent::parse("idea_like_123"), None);
        assert_eq!(DeskComponent::parse("desk"), None);
        assert_eq!(DeskComponent::parse("desk:claim:extra"), None);
        assert_eq!(DeskComponent::parse("desk:rate:1:2"), None);
        assert_eq!(DeskComponent::parse("desk:rate:1:2:many"), None);
        assert_eq!(DeskComponent::parse("desk:apply:"), None);
        assert_eq!(DeskComponent::parse("desk:vouches:someone:1"), None);
        assert_eq!(DeskComponent::parse(VOUCH_TEXT_INPUT_ID), None);
        assert_eq!(DeskComponent::parse("desk:rules:42:3"), None);
        assert_eq!(DeskComponent::parse("desk:rules:42"), None);
    }
}
