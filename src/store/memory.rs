use crate::core::cache::KeyValueCollection;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection used when no disk store is available, and in tests.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let collection = self.inner.lock().await;
        let value = collection.get(key).cloned();
        if value.is_some() {
            debug!("Collection HIT for key: {}", String::from_utf8_lossy(key));
        } else {
            debug!("Collection MISS for key: {}", String::from_utf8_lossy(key));
        }
        value
    }

    async fn put(&self, key: &[u8], value: &[u8]) {
        let mut collection = self.inner.lock().await;
        debug!("Collection PUT for key: {}", String::from_utf8_lossy(key));
        collection.insert(key.to_vec(), value.to_vec());
    }

    async fn remove(&self, key: &[u8]) {
        let mut collection = self.inner.lock().await;
        collection.remove(key);
        debug!("Collection REMOVE for key: {}", String::from_utf8_lossy(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collection_get_put() {
        let collection = MemoryCollection::new();

        assert!(collection.get(b"2024-01").await.is_none());

        collection.put(b"2024-01", b"report").await;
        assert_eq!(collection.get(b"2024-01").await, Some(b"report".to_vec()));

        collection.put(b"2024-01", b"newer").await;
        assert_eq!(collection.get(b"2024-01").await, Some(b"newer".to_vec()));

        assert!(collection.get(b"2024-02").await.is_none());
    }

    #[tokio::test]
    async fn test_collection_remove() {
        let collection = MemoryCollection::new();

        collection.put(b"key1", b"123").await;
        collection.remove(b"key1").await;
        assert!(collection.get(b"key1").await.is_none());
    }
}
