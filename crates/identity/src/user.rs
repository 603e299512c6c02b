use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use familycabin_auth::GlobalRole;
use familycabin_core::{DomainError, DomainResult, UserId};

/// Minimum plaintext credential length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 5;

/// A registered user account.
///
/// Cabin associations and notifications are deliberately *not* stored here:
/// membership edges live in the membership store (single source of truth)
/// and notifications in the notification sink. The user record carries only
/// identity and profile state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Salted Argon2id PHC string; never the plaintext.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub address: String,
    pub bio: Option<String>,
    pub member_since: DateTime<Utc>,
    pub role: GlobalRole,
}

impl User {
    /// Apply a profile patch. Credential changes are handled by the store
    /// (the new password must be hashed before it reaches the record), and
    /// `role` is never settable through this path.
    pub fn apply(&mut self, patch: &UserPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name.to_string();
        }
        if let Some(address) = &patch.address {
            if address.trim().is_empty() {
                return Err(DomainError::validation("address cannot be empty"));
            }
            self.address = address.clone();
        }
        if let Some(bio) = &patch.bio {
            self.bio = Some(bio.trim().to_string());
        }
        if let Some(email) = &patch.email {
            self.email = normalize_email(email)?;
        }
        Ok(())
    }
}

/// Input for registration, before hashing and persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub address: String,
    pub bio: Option<String>,
}

impl NewUser {
    /// Validate and normalize registration input.
    ///
    /// Mirrors the account constraints: trimmed non-empty username/name,
    /// plausible email shape, minimum credential length, required address.
    pub fn normalized(mut self) -> DomainResult<Self> {
        self.username = self.username.trim().to_string();
        if self.username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }

        self.email = normalize_email(&self.email)?;

        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        if self.address.trim().is_empty() {
            return Err(DomainError::validation("address cannot be empty"));
        }

        self.bio = self.bio.map(|b| b.trim().to_string());
        Ok(self)
    }
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    /// Plaintext; re-hashed by the store before persisting.
    pub password: Option<String>,
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    let plausible = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !plausible {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            username: " alice ".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "alicepw123".to_string(),
            name: "Alice".to_string(),
            address: "1 Lake Rd".to_string(),
            bio: None,
        }
    }

    #[test]
    fn registration_input_is_normalized() {
        let user = new_user().normalized().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn short_password_is_rejected() {
        let mut input = new_user();
        input.password = "abcd".to_string();
        assert!(matches!(
            input.normalized(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn implausible_email_is_rejected() {
        for email in ["", "no-at-sign", "a@nodot", "@example.com"] {
            let mut input = new_user();
            input.email = email.to_string();
            assert!(input.normalized().is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn patch_updates_only_supplied_fields() {
        let mut user = User {
            id: UserId::new(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: "Alice".to_string(),
            address: "1 Lake Rd".to_string(),
            bio: None,
            member_since: Utc::now(),
            role: GlobalRole::User,
        };

        user.apply(&UserPatch {
            bio: Some("Likes lakes".to_string()),
            ..UserPatch::default()
        })
        .unwrap();

        assert_eq!(user.name, "Alice");
        assert_eq!(user.bio.as_deref(), Some("Likes lakes"));
    }

    #[test]
    fn patch_rejects_empty_name() {
        let mut user = User {
            id: UserId::new(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: "Alice".to_string(),
            address: "1 Lake Rd".to_string(),
            bio: None,
            member_since: Utc::now(),
            role: GlobalRole::User,
        };
        let err = user
            .apply(&UserPatch {
                name: Some("   ".to_string()),
                ..UserPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
