use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::shared::error::ApiError;
use crate::shared::resource_key::ResourceKey;

/// Loads the payload behind a resource key
#[async_trait(?Send)]
pub trait Fetcher {
    async fn fetch(&self, key: &ResourceKey) -> Result<Value, ApiError>;
}

type SharedFetch = Shared<LocalBoxFuture<'static, Result<Arc<Value>, ApiError>>>;

struct CacheEntry {
    payload: Arc<Value>,
    last_used: u64,
}

struct CacheInner {
    max_entries: usize,
    clock: u64,
    entries: HashMap<ResourceKey, CacheEntry>,
    in_flight: HashMap<ResourceKey, SharedFetch>,
}

impl CacheInner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn store(&mut self, key: ResourceKey, payload: Arc<Value>) {
        let last_used = self.tick();
        self.entries.insert(key, CacheEntry { payload, last_used });

        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    log::debug!("Evicting cached {}", key);
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Response cache shared by every binding in the app.
///
/// At most one request per key is in flight; callers asking for a key that
/// is already loading wait on the same request. Failed requests leave the
/// last good payload in place. At most `max_entries` payloads are kept, the
/// least recently used one is dropped first.
#[derive(Clone)]
pub struct ResourceCache {
    fetcher: Rc<dyn Fetcher>,
    inner: Rc<RefCell<CacheInner>>,
}

impl ResourceCache {
    pub fn new(fetcher: Rc<dyn Fetcher>, max_entries: usize) -> Self {
        Self {
            fetcher,
            inner: Rc::new(RefCell::new(CacheInner {
                max_entries: max_entries.max(1),
                clock: 0,
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
        }
    }

    /// Last good payload for `key`, without touching the network
    pub fn cached(&self, key: &ResourceKey) -> Option<Arc<Value>> {
        let mut inner = self.inner.borrow_mut();
        let now = inner.tick();
        let entry = inner.entries.get_mut(key)?;
        entry.last_used = now;
        Some(Arc::clone(&entry.payload))
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_in_flight(&self, key: &ResourceKey) -> bool {
        self.inner.borrow().in_flight.contains_key(key)
    }

    /// Drop cached payloads whose key starts with `prefix`
    /// (after a create or update of that resource)
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.inner
            .borrow_mut()
            .entries
            .retain(|key, _| !key.as_str().starts_with(prefix));
    }

    /// Fetch `key`, joining the request already in flight for it if any
    pub async fn fetch(&self, key: &ResourceKey) -> Result<Arc<Value>, ApiError> {
        let request = self.request(key);
        request.await
    }

    fn request(&self, key: &ResourceKey) -> SharedFetch {
        if let Some(pending) = self.inner.borrow().in_flight.get(key) {
            log::debug!("Joining in-flight request for {}", key);
            return pending.clone();
        }

        let fetcher = Rc::clone(&self.fetcher);
        let inner: Weak<RefCell<CacheInner>> = Rc::downgrade(&self.inner);
        let owned_key = key.clone();
        let request = async move {
            let result = fetcher.fetch(&owned_key).await.map(Arc::new);
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.in_flight.remove(&owned_key);
                if let Ok(payload) = &result {
                    inner.store(owned_key.clone(), Arc::clone(payload));
                }
            }
            result
        }
        .boxed_local()
        .shared();

        self.inner
            .borrow_mut()
            .in_flight
            .insert(key.clone(), request.clone());
        request
    }
}
