//! Participant roles.
//!
//! A role selects which scenario and archetype catalogs apply to a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of roles a participant can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Software engineer at an early-stage startup.
    Engineer,
    /// Product manager balancing customers, data and the team.
    ProductManager,
    /// Founder steering funding, hiring and strategy.
    Founder,
}

impl Role {
    /// Slug used in file names, CLI args and serialized form.
    pub fn slug(&self) -> &'static str {
        match self {
            Role::Engineer => "engineer",
            Role::ProductManager => "product_manager",
            Role::Founder => "founder",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Engineer => "Engineer",
            Role::ProductManager => "Product Manager",
            Role::Founder => "Founder",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Engineer => {
                "Balance code quality, delivery speed and system design under startup pressure"
            }
            Role::ProductManager => {
                "Decide what to build next when customers, data and the team disagree"
            }
            Role::Founder => "Make the calls on funding, hiring and company direction",
        }
    }

    /// All roles in display order.
    pub fn all() -> &'static [Role] {
        &[Role::Engineer, Role::ProductManager, Role::Founder]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "engineer" => Ok(Role::Engineer),
            "product_manager" | "product-manager" | "productmanager" | "pm" => {
                Ok(Role::ProductManager)
            }
            "founder" => Ok(Role::Founder),
            _ => Err(format!(
                "Unknown role '{}'. Valid: engineer, product_manager, founder",
                s
            )),
        }
    }
}

/// Role summary returned by role listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub id: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleInfo {
    pub fn new(role: Role, include_details: bool) -> Self {
        if include_details {
            Self {
                id: role,
                name: Some(role.display_name().to_string()),
                description: Some(role.description().to_string()),
            }
        } else {
            Self {
                id: role,
                name: None,
                description: None,
            }
        }
    }
}
