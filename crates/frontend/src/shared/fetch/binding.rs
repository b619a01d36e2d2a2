use contracts::shared::list::item_count;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use super::cache::ResourceCache;
use super::cancel::CancelToken;
use crate::shared::error::ApiError;
use crate::shared::notify::{Notice, Notifier};
use crate::shared::resource_key::ResourceKey;

/// What a view renders for one resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState {
    pub data: Option<Arc<Value>>,
    pub is_loading: bool,
    /// `count` of the list envelope, 0 when absent
    pub item_count: u64,
    pub error: Option<ApiError>,
}

impl ResourceState {
    /// Payload decoded into a typed DTO
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        let value = self.data.as_deref()?;
        match T::deserialize(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                log::error!("Failed to decode cached payload: {}", e);
                None
            }
        }
    }
}

struct BindingInner {
    cache: ResourceCache,
    notifier: Rc<dyn Notifier>,
    cancel: CancelToken,
    key: RefCell<Option<ResourceKey>>,
    state: RefCell<ResourceState>,
    generation: Cell<u64>,
    listener: RefCell<Option<Box<dyn Fn(&ResourceState)>>>,
}

/// One view's subscription to a resource key.
///
/// Responses are committed only while the binding is not cancelled and the
/// key they were requested for is still current.
#[derive(Clone)]
pub struct ResourceBinding(Rc<BindingInner>);

impl ResourceBinding {
    pub fn new(cache: ResourceCache, notifier: Rc<dyn Notifier>, cancel: CancelToken) -> Self {
        Self(Rc::new(BindingInner {
            cache,
            notifier,
            cancel,
            key: RefCell::new(None),
            state: RefCell::new(ResourceState::default()),
            generation: Cell::new(0),
            listener: RefCell::new(None),
        }))
    }

    /// Called with the new state after every change
    pub fn on_change(&self, listener: impl Fn(&ResourceState) + 'static) {
        *self.0.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn key(&self) -> Option<ResourceKey> {
        self.0.key.borrow().clone()
    }

    pub fn state(&self) -> ResourceState {
        self.0.state.borrow().clone()
    }

    /// Switch to `key` and load it.
    ///
    /// `None` clears the state without a request. The same key as the
    /// current one is a no-op. A new key shows its cached payload, if any,
    /// while the request runs.
    pub async fn change_key(&self, key: Option<ResourceKey>) {
        if self.0.cancel.is_cancelled() || *self.0.key.borrow() == key {
            return;
        }

        let generation = self.next_generation();
        *self.0.key.borrow_mut() = key.clone();

        let Some(key) = key else {
            self.replace(ResourceState::default());
            return;
        };

        let cached = self.0.cache.cached(&key);
        self.replace(ResourceState {
            item_count: cached.as_deref().map(item_count).unwrap_or(0),
            data: cached,
            is_loading: true,
            error: None,
        });
        self.load(key, generation).await;
    }

    /// Re-issue the request for the current key
    pub async fn refresh(&self) {
        if self.0.cancel.is_cancelled() {
            return;
        }
        let Some(key) = self.key() else {
            return;
        };

        let generation = self.next_generation();
        self.update(|state| state.is_loading = true);
        self.load(key, generation).await;
    }

    async fn load(&self, key: ResourceKey, generation: u64) {
        let result = self.0.cache.fetch(&key).await;

        if self.0.cancel.is_cancelled() || self.0.generation.get() != generation {
            log::debug!("Dropping stale response for {}", key);
            return;
        }

        match result {
            Ok(payload) => self.update(|state| {
                state.item_count = item_count(&payload);
                state.data = Some(payload);
                state.error = None;
                state.is_loading = false;
            }),
            Err(error) => {
                log::warn!("Loading {} failed: {}", key, error);
                if !error.is_cancelled() {
                    self.0.notifier.notify(Notice::error(error.user_message()));
                }
                self.update(|state| {
                    state.error = Some(error);
                    state.is_loading = false;
                });
            }
        }
    }

    fn next_generation(&self) -> u64 {
        let generation = self.0.generation.get().wrapping_add(1);
        self.0.generation.set(generation);
        generation
    }

    fn replace(&self, state: ResourceState) {
        self.update(|current| *current = state);
    }

    fn update(&self, apply: impl FnOnce(&mut ResourceState)) {
        let snapshot = {
            let mut state = self.0.state.borrow_mut();
            apply(&mut state);
            state.clone()
        };
        if let Some(listener) = self.0.listener.borrow().as_ref() {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notify::NoticeLevel;
    use crate::shared::test_support::{GatedFetcher, RecordingNotifier};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;

    struct Fixture {
        fetcher: Rc<GatedFetcher>,
        notifier: Rc<RecordingNotifier>,
        cache: ResourceCache,
        cancel: CancelToken,
    }

    impl Fixture {
        fn new(fetcher: GatedFetcher) -> Self {
            let fetcher = Rc::new(fetcher);
            Self {
                cache: ResourceCache::new(fetcher.clone(), 16),
                fetcher,
                notifier: Rc::new(RecordingNotifier::default()),
                cancel: CancelToken::new(),
            }
        }

        fn binding(&self) -> ResourceBinding {
            ResourceBinding::new(self.cache.clone(), self.notifier.clone(), self.cancel.clone())
        }
    }

    fn key(path: &str) -> Option<ResourceKey> {
        Some(ResourceKey::new(path))
    }

    #[test]
    fn test_none_key_never_fetches() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"count": 1})));
        let binding = fx.binding();

        block_on(binding.change_key(None));
        block_on(binding.refresh());

        assert_eq!(fx.fetcher.calls(), 0);
        assert_eq!(binding.state(), ResourceState::default());
    }

    #[test]
    fn test_success_exposes_data_and_count() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"results": [{"id": 1}], "count": 31})));
        let binding = fx.binding();

        block_on(binding.change_key(key("/api/orders?page=1")));
        let state = binding.state();

        assert_eq!(state.item_count, 31);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.data.as_deref().unwrap()["results"][0]["id"], 1);
    }

    #[test]
    fn test_missing_count_defaults_to_zero() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"id": 4, "name": "Acme"})));
        let binding = fx.binding();
        block_on(binding.change_key(key("/api/customers/4")));
        assert_eq!(binding.state().item_count, 0);
        assert!(binding.state().data.is_some());
    }

    #[test]
    fn test_same_key_fetches_once() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"count": 2})));
        let binding = fx.binding();

        block_on(binding.change_key(key("/api/tags?page=1")));
        block_on(binding.change_key(key("/api/tags?page=1")));
        assert_eq!(fx.fetcher.calls(), 1);

        block_on(binding.change_key(key("/api/tags?page=2")));
        assert_eq!(fx.fetcher.calls(), 2);
    }

    #[test]
    fn test_refresh_bypasses_cache() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"count": 2})));
        let binding = fx.binding();

        block_on(binding.change_key(key("/api/tags")));
        block_on(binding.refresh());
        assert_eq!(fx.fetcher.calls(), 2);
    }

    #[test]
    fn test_failure_notifies_and_keeps_stale_data() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"count": 9})));
        let binding = fx.binding();
        block_on(binding.change_key(key("/api/orders")));

        fx.fetcher.fail_with(ApiError::Status {
            status: 500,
            message: "Database unavailable".into(),
        });
        block_on(binding.refresh());

        let state = binding.state();
        assert_eq!(state.item_count, 9);
        assert!(state.data.is_some());
        assert!(!state.is_loading);
        assert!(state.error.is_some());

        let notices = fx.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Database unavailable");
    }

    #[test]
    fn test_stale_response_is_dropped_after_key_change() {
        let fx = Fixture::new(GatedFetcher::default());
        let binding = fx.binding();
        let mut pool = LocalPool::new();

        for path in ["/api/orders?page=1", "/api/orders?page=2"] {
            let binding = binding.clone();
            pool.spawner()
                .spawn_local(async move { binding.change_key(key(path)).await })
                .unwrap();
            pool.run_until_stalled();
        }
        assert_eq!(fx.fetcher.calls(), 2);

        fx.fetcher.resolve_next(Ok(json!({"count": 100, "page": 1})));
        pool.run_until_stalled();
        assert!(binding.state().data.is_none());
        assert!(binding.state().is_loading);

        fx.fetcher.resolve_next(Ok(json!({"count": 100, "page": 2})));
        pool.run_until_stalled();
        assert_eq!(binding.state().data.as_deref().unwrap()["page"], 2);
        assert!(!binding.state().is_loading);
    }

    #[test]
    fn test_cancelled_binding_ignores_response() {
        let fx = Fixture::new(GatedFetcher::default());
        let binding = fx.binding();
        let mut pool = LocalPool::new();
        let task = binding.clone();
        pool.spawner()
            .spawn_local(async move { task.change_key(key("/api/issues")).await })
            .unwrap();
        pool.run_until_stalled();

        fx.cancel.cancel();
        fx.fetcher.resolve_next(Ok(json!({"count": 3})));
        pool.run_until_stalled();

        let state = binding.state();
        assert!(state.data.is_none());
        assert_eq!(state.item_count, 0);

        block_on(binding.change_key(key("/api/issues?page=2")));
        assert_eq!(fx.fetcher.calls(), 1);
    }

    #[test]
    fn test_new_key_shows_cached_payload_first() {
        let fx = Fixture::new(GatedFetcher::ready(json!({"count": 4})));
        let binding = fx.binding();
        block_on(binding.change_key(key("/api/discounts?page=1")));
        block_on(binding.change_key(key("/api/discounts?page=2")));

        fx.fetcher.hold();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        binding.on_change(move |state| sink.borrow_mut().push(state.clone()));

        let mut pool = LocalPool::new();
        let task = binding.clone();
        pool.spawner()
            .spawn_local(async move { task.change_key(key("/api/discounts?page=1")).await })
            .unwrap();
        pool.run_until_stalled();

        let first = seen.borrow()[0].clone();
        assert!(first.is_loading);
        assert_eq!(first.item_count, 4);
        assert!(first.data.is_some());
    }

    #[test]
    fn test_typed_decode() {
        #[derive(serde::Deserialize)]
        struct Customer {
            name: String,
        }
        let fx = Fixture::new(GatedFetcher::ready(json!({"name": "Acme"})));
        let binding = fx.binding();
        block_on(binding.change_key(key("/api/customers/1")));

        let customer: Customer = binding.state().data_as().unwrap();
        assert_eq!(customer.name, "Acme");
        assert!(binding.state().data_as::<Vec<u32>>().is_none());
    }
}
