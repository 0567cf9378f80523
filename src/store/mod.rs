pub mod disk;
pub mod ledger;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::warn;

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens the disk keyspace under `data_path/cache`. When it cannot be
    /// opened the store still hands out in-memory collections.
    pub fn open(data_path: &Path) -> Self {
        let cache_dir = data_path.join("cache");
        let keyspace = match fjall::Config::new(&cache_dir).open() {
            Ok(keyspace) => Some(Arc::new(keyspace)),
            Err(e) => {
                warn!("Could not open store at {}: {}", cache_dir.display(), e);
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    fn collection_key(name: &str, persist: bool) -> String {
        if persist {
            format!("disk:{name}")
        } else {
            format!("memory:{name}")
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        let key = Self::collection_key(name, persist);
        if create_if_missing {
            let mut collections = self
                .collections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if !collections.contains_key(&key) {
                let new_collection: Option<Arc<dyn KeyValueCollection>> = if persist {
                    self.keyspace.as_ref().and_then(|ks| {
                        ks.open_partition(name, PartitionCreateOptions::default())
                            .map_err(|e| warn!("Could not open partition {}: {}", name, e))
                            .ok()
                            .map(|partition| {
                                Arc::new(DiskCollection::new(Arc::clone(ks), partition))
                                    as Arc<dyn KeyValueCollection>
                            })
                    })
                } else {
                    Some(Arc::new(MemoryCollection::new()))
                };

                match new_collection {
                    Some(collection) => {
                        collections.insert(key.clone(), collection);
                    }
                    None => return None, // Failed to create persistent collection
                }
            }
        }

        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections.get(&key).cloned()
    }
}
