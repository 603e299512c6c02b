use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use familycabin_core::{CabinId, DomainError, DomainResult, UserId};

/// Image shown for cabins created without one.
pub const DEFAULT_CABIN_IMAGE: &str = "/images/default-cabin.jpg";

/// A shared cabin space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabin {
    pub id: CabinId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Cabin {
    /// Apply an editable-field patch.
    ///
    /// Only name/description/location/image are reachable through this path;
    /// membership state is owned by the lifecycle engine.
    pub fn apply(&mut self, patch: &CabinPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("cabin name cannot be empty"));
            }
            self.name = name.to_string();
        }
        if let Some(description) = &patch.description {
            if description.trim().is_empty() {
                return Err(DomainError::validation("description cannot be empty"));
            }
            self.description = description.clone();
        }
        if let Some(location) = &patch.location {
            if location.trim().is_empty() {
                return Err(DomainError::validation("location cannot be empty"));
            }
            self.location = location.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        Ok(())
    }
}

/// Input for cabin creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCabin {
    pub name: String,
    pub description: String,
    pub location: String,
    pub image: Option<String>,
}

impl NewCabin {
    /// Validate and build the cabin record for a creator.
    pub fn into_cabin(self, created_by: UserId, now: DateTime<Utc>) -> DomainResult<Cabin> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("cabin name cannot be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }
        if self.location.trim().is_empty() {
            return Err(DomainError::validation("location cannot be empty"));
        }

        Ok(Cabin {
            id: CabinId::new(),
            name,
            description: self.description,
            location: self.location,
            image: self.image.unwrap_or_else(|| DEFAULT_CABIN_IMAGE.to_string()),
            created_by,
            created_at: now,
        })
    }
}

/// Partial update for editable cabin fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CabinPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_cabin() -> NewCabin {
        NewCabin {
            name: "Pine Lake".to_string(),
            description: "desc".to_string(),
            location: "WA".to_string(),
            image: None,
        }
    }

    #[test]
    fn creation_fills_default_image() {
        let cabin = new_cabin().into_cabin(UserId::new(), Utc::now()).unwrap();
        assert_eq!(cabin.image, DEFAULT_CABIN_IMAGE);
    }

    #[test]
    fn creation_rejects_blank_name() {
        let mut input = new_cabin();
        input.name = "  ".to_string();
        assert!(input.into_cabin(UserId::new(), Utc::now()).is_err());
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut cabin = new_cabin().into_cabin(UserId::new(), Utc::now()).unwrap();
        cabin
            .apply(&CabinPatch {
                location: Some("OR".to_string()),
                ..CabinPatch::default()
            })
            .unwrap();
        assert_eq!(cabin.name, "Pine Lake");
        assert_eq!(cabin.location, "OR");
    }
}
