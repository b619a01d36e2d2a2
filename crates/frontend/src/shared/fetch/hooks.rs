use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use serde_json::Value;
use std::rc::Rc;
use std::sync::Arc;

use super::binding::{ResourceBinding, ResourceState};
use super::cache::{Fetcher, ResourceCache};
use super::cancel::CancelToken;
use crate::shared::config::{ClientConfig, RevalidationConfig};
use crate::shared::http::ApiClient;
use crate::shared::notify::Notifier;
use crate::shared::resource_key::ResourceKey;

/// Everything a fetching view needs, built once at the app root
#[derive(Clone)]
pub struct FetchServices {
    pub config: Rc<ClientConfig>,
    /// Uncached loads (print pages)
    pub fetcher: Rc<dyn Fetcher>,
    pub cache: ResourceCache,
    pub notifier: Rc<dyn Notifier>,
}

impl FetchServices {
    /// Services loading through `client`
    pub fn new(client: ApiClient, notifier: Rc<dyn Notifier>) -> Self {
        let config = Rc::new(client.config().clone());
        Self::with_fetcher(config, Rc::new(client), notifier)
    }

    pub fn with_fetcher(
        config: Rc<ClientConfig>,
        fetcher: Rc<dyn Fetcher>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let cache = ResourceCache::new(Rc::clone(&fetcher), config.cache.max_entries);
        Self {
            config,
            fetcher,
            cache,
            notifier,
        }
    }
}

#[derive(Clone, Copy)]
struct FetchContext(StoredValue<FetchServices, LocalStorage>);

pub fn provide_fetch_context(services: FetchServices) {
    provide_context(FetchContext(StoredValue::new_local(services)));
}

pub fn use_fetch_context() -> FetchServices {
    use_context::<FetchContext>()
        .expect("FetchContext not provided in context (provide it in app root)")
        .0
        .get_value()
}

/// Reactive view of one resource binding
#[derive(Clone, Copy)]
pub struct ResourceHandle {
    pub state: RwSignal<ResourceState>,
    binding: StoredValue<ResourceBinding, LocalStorage>,
}

impl ResourceHandle {
    pub fn data(&self) -> Option<Arc<Value>> {
        self.state.with(|s| s.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading)
    }

    pub fn item_count(&self) -> u64 {
        self.state.with(|s| s.item_count)
    }

    /// Re-issue the request for the current key
    pub fn refresh(&self) {
        run_refresh(self.binding);
    }

    /// Switch the binding to another key
    pub fn change_key(&self, key: Option<ResourceKey>) {
        if let Some(binding) = self.binding.try_get_value() {
            spawn_local(async move { binding.change_key(key).await });
        }
    }
}

/// Bind the current view to the resource identified by `key`.
///
/// `None` keys issue no request. The binding follows the signal, revalidates
/// per `RevalidationConfig`, and stops committing state once the view is
/// cleaned up.
pub fn use_resource(key: Signal<Option<ResourceKey>>) -> ResourceHandle {
    let services = use_fetch_context();
    let cancel = CancelToken::new();
    let state = RwSignal::new(ResourceState::default());

    let binding = ResourceBinding::new(
        services.cache.clone(),
        Rc::clone(&services.notifier),
        cancel.clone(),
    );
    binding.on_change(move |snapshot| {
        let _ = state.try_set(snapshot.clone());
    });
    let binding = StoredValue::new_local(binding);

    Effect::new(move |_| {
        let key = key.get();
        if let Some(binding) = binding.try_get_value() {
            spawn_local(async move { binding.change_key(key).await });
        }
    });

    start_revalidation(binding, &services.config.revalidation, &cancel);
    on_cleanup(move || cancel.cancel());

    ResourceHandle { state, binding }
}

fn run_refresh(binding: StoredValue<ResourceBinding, LocalStorage>) {
    if let Some(binding) = binding.try_get_value() {
        spawn_local(async move { binding.refresh().await });
    }
}

/// What makes a binding reload its current key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidationTrigger {
    Interval { millis: u32 },
    Focus,
    Reconnect,
}

pub fn revalidation_triggers(config: &RevalidationConfig) -> Vec<RevalidationTrigger> {
    let mut triggers = Vec::new();
    if let Some(interval) = config.refresh_interval_ms {
        triggers.push(RevalidationTrigger::Interval {
            millis: u32::try_from(interval).unwrap_or(u32::MAX),
        });
    }
    if config.revalidate_on_focus {
        triggers.push(RevalidationTrigger::Focus);
    }
    if config.revalidate_on_reconnect {
        triggers.push(RevalidationTrigger::Reconnect);
    }
    triggers
}

fn start_revalidation(
    binding: StoredValue<ResourceBinding, LocalStorage>,
    config: &RevalidationConfig,
    cancel: &CancelToken,
) {
    for trigger in revalidation_triggers(config) {
        match trigger {
            RevalidationTrigger::Interval { millis } => {
                let cancel = cancel.clone();
                spawn_local(async move {
                    loop {
                        TimeoutFuture::new(millis).await;
                        if cancel.is_cancelled() {
                            break;
                        }
                        log::debug!("Interval revalidation");
                        run_refresh(binding);
                    }
                });
            }
            RevalidationTrigger::Focus => {
                let handle = window_event_listener(ev::focus, move |_| run_refresh(binding));
                on_cleanup(move || handle.remove());
            }
            RevalidationTrigger::Reconnect => {
                let handle = window_event_listener(ev::online, move |_| run_refresh(binding));
                on_cleanup(move || handle.remove());
            }
        }
    }
}
