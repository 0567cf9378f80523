use async_trait::async_trait;
use std::sync::Arc;

/// A named byte-oriented key value collection.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    async fn put(&self, key: &[u8], value: &[u8]);
    async fn remove(&self, key: &[u8]);
}

pub trait Store: Send + Sync {
    /// Returns the collection `name`, creating it when `create_if_missing` is
    /// set. Persistent collections are `None` when no disk store is available.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;
}
