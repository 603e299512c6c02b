//! Dev/demo seed data.

use chrono::Utc;

use familycabin_cabins::NewCabin;
use familycabin_core::DomainResult;
use familycabin_identity::NewUser;
use familycabin_membership::{IdentityStore, MembershipStore};

use crate::InMemoryStore;

/// Seed a global admin and two sample cabins.
///
/// Intended for local development (`SEED_DEMO=1`); a fresh store only.
pub fn seed_demo(store: &InMemoryStore) -> DomainResult<()> {
    let admin = store.create_user(NewUser {
        username: "admin".to_string(),
        email: "admin@familycabin.io".to_string(),
        password: "admin".to_string(),
        name: "Global Admin".to_string(),
        address: "System".to_string(),
        bio: Some("System administrator".to_string()),
    })?;
    store.promote_to_global_admin(admin.id)?;

    let cabins = [
        NewCabin {
            name: "Pine Lake Retreat".to_string(),
            description: "A beautiful cabin nestled in the woods by Pine Lake. Perfect for \
                          family gatherings and outdoor activities."
                .to_string(),
            location: "Pine Lake, Washington".to_string(),
            image: Some("/images/cabins/pine-lake.jpg".to_string()),
        },
        NewCabin {
            name: "Mountain View Lodge".to_string(),
            description: "Spectacular mountain views from this spacious lodge. Hiking trails \
                          nearby and plenty of room for the whole family."
                .to_string(),
            location: "Blue Ridge Mountains, North Carolina".to_string(),
            image: Some("/images/cabins/mountain-view.jpg".to_string()),
        },
    ];

    for input in cabins {
        let cabin = input.into_cabin(admin.id, Utc::now())?;
        store.create_cabin_with_admin(cabin, Utc::now())?;
    }

    tracing::info!("seeded demo data: 1 admin user, 2 cabins");
    Ok(())
}
