//! Asset records and the origin/destination role.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::GuideError;

/// One row of the asset table.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AssetRecord {
    pub identifier: String,
    pub description: String,
    pub serial_number: String,
    pub value: Option<Decimal>,
    pub origin_section: Option<String>,
    pub destination_section: Option<String>,
    pub origin_authority: Option<String>,
    pub destination_authority: Option<String>,
}

impl AssetRecord {
    /// Section holding the asset on the given side of a movement.
    pub fn section(&self, role: Role) -> Option<&str> {
        match role {
            Role::Origin => self.origin_section.as_deref(),
            Role::Destination => self.destination_section.as_deref(),
        }
    }

    /// Authority named for the given side of a movement.
    pub fn authority(&self, role: Role) -> Option<&str> {
        match role {
            Role::Origin => self.origin_authority.as_deref(),
            Role::Destination => self.destination_authority.as_deref(),
        }
    }

    pub fn to_guide_row(&self) -> guia_render::GuideRow {
        guia_render::GuideRow {
            identifier: self.identifier.clone(),
            description: self.description.clone(),
            serial_number: self.serial_number.clone(),
            value: self.value,
        }
    }
}

/// Side of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Origin,
    Destination,
}

impl FromStr for Role {
    type Err = GuideError;

    /// Accepts `origin`/`destination` and the Portuguese `origem`/`destino`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "origin" | "origem" => Ok(Role::Origin),
            "destination" | "destino" => Ok(Role::Destination),
            other => Err(GuideError::InvalidArgument(format!(
                "role must be 'origin' or 'destination', got {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Origin => write!(f, "origin"),
            Role::Destination => write!(f, "destination"),
        }
    }
}
