//! Doubles shared by the unit tests

use any_spawner::Executor;
use async_trait::async_trait;
use futures::channel::oneshot;
use leptos::prelude::Owner;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::shared::config::ClientConfig;
use crate::shared::error::ApiError;
use crate::shared::fetch::{provide_fetch_context, FetchServices, Fetcher};
use crate::shared::notify::{Notice, Notifier};
use crate::shared::resource_key::ResourceKey;

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Clone, Default)]
enum Reply {
    /// park each request until `resolve_next`
    #[default]
    Gated,
    Ready(Result<Value, ApiError>),
}

/// Fetcher that either answers immediately or parks requests until the test
/// releases them in order
#[derive(Default)]
pub struct GatedFetcher {
    calls: Cell<usize>,
    keys: RefCell<Vec<ResourceKey>>,
    reply: RefCell<Reply>,
    parked: RefCell<VecDeque<oneshot::Sender<Result<Value, ApiError>>>>,
}

impl GatedFetcher {
    pub fn ready(value: Value) -> Self {
        let fetcher = Self::default();
        *fetcher.reply.borrow_mut() = Reply::Ready(Ok(value));
        fetcher
    }

    pub fn fail_with(&self, error: ApiError) {
        *self.reply.borrow_mut() = Reply::Ready(Err(error));
    }

    pub fn hold(&self) {
        *self.reply.borrow_mut() = Reply::Gated;
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn keys(&self) -> Vec<ResourceKey> {
        self.keys.borrow().clone()
    }

    pub fn resolve_next(&self, result: Result<Value, ApiError>) {
        let sender = self
            .parked
            .borrow_mut()
            .pop_front()
            .expect("no parked request");
        let _ = sender.send(result);
    }
}

#[async_trait(?Send)]
impl Fetcher for GatedFetcher {
    async fn fetch(&self, key: &ResourceKey) -> Result<Value, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.keys.borrow_mut().push(key.clone());

        let reply = self.reply.borrow().clone();
        match reply {
            Reply::Ready(result) => result,
            Reply::Gated => {
                let (tx, rx) = oneshot::channel();
                self.parked.borrow_mut().push_back(tx);
                rx.await.unwrap_or(Err(ApiError::Cancelled))
            }
        }
    }
}

/// Configuration without browser timers or window listeners
pub fn offline_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = Some("http://localhost:3000".into());
    config.revalidation.refresh_interval_ms = None;
    config.revalidation.revalidate_on_focus = false;
    config.revalidation.revalidate_on_reconnect = false;
    config.print.retry_delay_ms = 0;
    config
}

/// Reactive owner with fetch services over `fetcher`, set as current.
/// Hooks created afterwards run on the local futures executor; drive them
/// with `settle`.
pub fn hook_owner(fetcher: Rc<GatedFetcher>, notifier: Rc<RecordingNotifier>) -> Owner {
    let _ = Executor::init_futures_executor();
    let owner = Owner::new();
    owner.set();
    provide_fetch_context(FetchServices::with_fetcher(
        Rc::new(offline_config()),
        fetcher,
        notifier,
    ));
    owner
}

/// Run spawned tasks and effects until none can make progress
pub fn settle() {
    Executor::poll_local();
}
