use std::sync::Arc;

use familycabin_auth::{Actor, Hs256JwtCodec, JwtCodec};
use familycabin_core::DomainResult;
use familycabin_infra::{InMemoryStore, seed_demo};
use familycabin_membership::LifecycleEngine;

use crate::context::ActorContext;

/// Shared handler state: the lifecycle engine plus the token codec.
pub struct AppServices {
    pub engine: LifecycleEngine,
    pub jwt: Arc<dyn JwtCodec>,
}

impl AppServices {
    /// Resolve the authorization view of the request's actor, with cabin
    /// admin roles read fresh from the membership store.
    pub fn actor(&self, ctx: &ActorContext) -> DomainResult<Actor> {
        self.engine.actor_for(ctx.user_id(), ctx.global_role())
    }
}

/// Wire the in-memory store behind every contract and build the engine.
pub fn build_services(jwt_secret: &str, seed: bool) -> AppServices {
    let store = Arc::new(InMemoryStore::new());

    if seed {
        if let Err(err) = seed_demo(&store) {
            tracing::warn!(error = %err, "demo seed failed, starting empty");
        }
    }

    let engine = LifecycleEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    );

    AppServices {
        engine,
        jwt: Arc::new(Hs256JwtCodec::new(jwt_secret.as_bytes())),
    }
}
