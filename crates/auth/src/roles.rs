use core::str::FromStr;

use serde::{Deserialize, Serialize};

use familycabin_core::DomainError;

/// System-wide role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalRole {
    /// Regular account; authority comes only from per-cabin roles.
    #[default]
    User,
    /// Unrestricted authority across all cabins.
    GlobalAdmin,
}

impl GlobalRole {
    pub fn is_global_admin(&self) -> bool {
        matches!(self, GlobalRole::GlobalAdmin)
    }
}

impl core::fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GlobalRole::User => f.write_str("USER"),
            GlobalRole::GlobalAdmin => f.write_str("GLOBAL_ADMIN"),
        }
    }
}

/// Role a member holds within a single cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinRole {
    Admin,
    #[default]
    Member,
}

impl core::fmt::Display for CabinRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CabinRole::Admin => f.write_str("ADMIN"),
            CabinRole::Member => f.write_str("MEMBER"),
        }
    }
}

impl FromStr for CabinRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(CabinRole::Admin),
            "MEMBER" => Ok(CabinRole::Member),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}
