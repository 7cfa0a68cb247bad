use std::sync::Arc;

use crate::services::cache::CacheKey;
use crate::services::store::Store;

/// Owner of the shared search defaults.
///
/// The "last chosen city" is deliberately global (not per scope): it is
/// the default landing context for every page, matching how the product
/// remembers the user's last city across independent pages. Remembered
/// localities are per (scope, city) so users don't inherit each other's
/// neighbourhoods.
pub struct Preferences<S: Store> {
    store: Arc<S>,
    namespace: String,
}

impl<S: Store> Preferences<S> {
    pub fn new(store: Arc<S>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn default_city(&self) -> Option<String> {
        self.store
            .get(&CacheKey::default_city(&self.namespace))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }

    pub fn set_default_city(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }
        self.store.set(&CacheKey::default_city(&self.namespace), city);
    }

    pub fn locality_for(&self, scope_id: &str, city: &str) -> Option<String> {
        self.store
            .get(&CacheKey::locality(&self.namespace, scope_id, city))
            .filter(|l| !l.trim().is_empty())
    }

    pub fn set_locality_for(&self, scope_id: &str, city: &str, locality: &str) {
        let locality = locality.trim();
        if locality.is_empty() {
            return;
        }
        self.store
            .set(&CacheKey::locality(&self.namespace, scope_id, city), locality);
    }
}
