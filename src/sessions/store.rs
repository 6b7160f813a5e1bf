use tower_sessions::MokaStore;

const SESSION_CACHE_CAPACITY: u64 = 2000;

/// Sessions only need to outlive a browser tab, so they stay in memory.
pub fn build() -> MokaStore {
    return MokaStore::new(Some(SESSION_CACHE_CAPACITY));
}
