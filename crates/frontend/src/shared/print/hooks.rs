use contracts::shared::list::ListEnvelope;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use std::rc::Rc;

use super::driver::accumulate_pages;
use crate::shared::error::ApiError;
use crate::shared::fetch::{use_fetch_context, CancelToken, Fetcher};
use crate::shared::filter::Filter;
use crate::shared::notify::Notice;
use crate::shared::resource_key::filter_resource_key;

/// What the print page renders
#[derive(Debug, Clone, PartialEq)]
pub struct PrintView<T> {
    pub items: Vec<T>,
    /// all pages are in; the print layout may render
    pub active: bool,
    pub complete: bool,
}

impl<T> Default for PrintView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            active: false,
            complete: false,
        }
    }
}

/// Running bulk print returned by `use_bulk_print`
pub struct BulkPrint<T> {
    pub view: RwSignal<PrintView<T>>,
    current: StoredValue<CancelToken>,
}

impl<T> Clone for BulkPrint<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BulkPrint<T> {}

impl<T> BulkPrint<T> {
    /// Token of the collection in progress
    pub fn token(&self) -> CancelToken {
        self.current.get_value()
    }

    /// Stop the collection in progress; nothing is printed
    pub fn cancel(&self) {
        let _ = self.current.try_with_value(CancelToken::cancel);
    }
}

/// Collect every row of `base_url` under `filter` for printing.
///
/// The first page's `count` decides how many pages are fetched. A filter
/// change discards the collection in progress and starts over; leaving the
/// view cancels it. `on_ready` fires after the view has been filled.
pub fn use_bulk_print<T>(
    base_url: String,
    filter: Signal<Filter>,
    on_ready: Callback<()>,
) -> BulkPrint<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let services = StoredValue::new_local(use_fetch_context());
    let view = RwSignal::new(PrintView::<T>::default());
    let current = StoredValue::new(CancelToken::new());
    let base_url = StoredValue::new(base_url);

    Effect::new(move |_| {
        let filter = filter.get();

        let cancel = CancelToken::new();
        current.update_value(|running| {
            running.cancel();
            *running = cancel.clone();
        });
        view.set(PrintView::default());

        let Some(services) = services.try_get_value() else {
            return;
        };
        let base_url = base_url.get_value();

        spawn_local(async move {
            let fetcher = Rc::clone(&services.fetcher);
            let config = services.config.print.clone();

            let result = accumulate_pages(
                &config,
                &cancel,
                |page, size| {
                    let fetcher = Rc::clone(&fetcher);
                    let key = filter_resource_key(&base_url, &filter.for_page(page, size));
                    async move {
                        let value = fetcher.fetch(&key).await?;
                        serde_json::from_value::<ListEnvelope<T>>(value)
                            .map_err(|e| ApiError::Decode(e.to_string()))
                    }
                },
                TimeoutFuture::new,
                |outcome| {
                    if let Some(error) = &outcome.error {
                        services.notifier.notify(Notice::error(format!(
                            "Printing {} rows only: {}",
                            outcome.items.len(),
                            error
                        )));
                    }
                    let _ = view.try_set(PrintView {
                        items: outcome.items.clone(),
                        active: true,
                        complete: outcome.complete,
                    });
                },
            )
            .await;

            match result {
                Ok(_) => on_ready.run(()),
                Err(e) => log::debug!("Print collection stopped: {}", e),
            }
        });
    });

    on_cleanup(move || {
        let _ = current.try_with_value(CancelToken::cancel);
    });

    BulkPrint { view, current }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::resource_key::ResourceKey;
    use crate::shared::test_support::{hook_owner, settle, GatedFetcher, RecordingNotifier};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_callback() -> (Callback<()>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback = Callback::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, calls)
    }

    #[test]
    fn test_collects_pages_named_by_first_count() {
        let fetcher = Rc::new(GatedFetcher::ready(json!({"results": [1, 2, 3], "count": 150})));
        let owner = hook_owner(fetcher.clone(), Rc::new(RecordingNotifier::default()));
        let (on_ready, ready_calls) = counting_callback();
        let filter = RwSignal::new(Filter::new(25).with("status", "A"));

        let print = use_bulk_print::<u64>("/api/orders".into(), filter.into(), on_ready);
        settle();

        assert_eq!(
            fetcher.keys(),
            vec![
                ResourceKey::new("/api/orders?page=1&page_size=100&status=A"),
                ResourceKey::new("/api/orders?page=2&page_size=100&status=A"),
            ]
        );
        let view = print.view.get_untracked();
        assert!(view.active);
        assert!(view.complete);
        assert_eq!(view.items, vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(ready_calls.load(Ordering::SeqCst), 1);

        owner.cleanup();
    }

    #[test]
    fn test_filter_change_restarts_collection() {
        let fetcher = Rc::new(GatedFetcher::default());
        let owner = hook_owner(fetcher.clone(), Rc::new(RecordingNotifier::default()));
        let (on_ready, ready_calls) = counting_callback();
        let filter = RwSignal::new(Filter::new(25).with("status", "A"));

        let print = use_bulk_print::<u64>("/api/orders".into(), filter.into(), on_ready);
        settle();
        let first_run = print.token();
        assert_eq!(fetcher.calls(), 1);

        filter.set(Filter::new(25).with("status", "B"));
        settle();
        assert!(first_run.is_cancelled());
        assert!(!print.token().is_cancelled());
        assert_eq!(fetcher.calls(), 2);

        // late page of the discarded run
        fetcher.resolve_next(Ok(json!({"results": [1, 2], "count": 2})));
        settle();
        assert!(!print.view.get_untracked().active);
        assert_eq!(ready_calls.load(Ordering::SeqCst), 0);

        fetcher.resolve_next(Ok(json!({"results": [7], "count": 1})));
        settle();
        let view = print.view.get_untracked();
        assert!(view.active);
        assert_eq!(view.items, vec![7]);
        assert_eq!(ready_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            fetcher.keys()[1],
            ResourceKey::new("/api/orders?page=1&page_size=100&status=B")
        );

        owner.cleanup();
    }

    #[test]
    fn test_unmount_cancels_collection() {
        let fetcher = Rc::new(GatedFetcher::default());
        let owner = hook_owner(fetcher.clone(), Rc::new(RecordingNotifier::default()));
        let (on_ready, ready_calls) = counting_callback();

        let print = use_bulk_print::<u64>(
            "/api/orders".into(),
            Signal::derive(|| Filter::new(25)),
            on_ready,
        );
        settle();
        let run = print.token();

        owner.cleanup();
        assert!(run.is_cancelled());

        fetcher.resolve_next(Ok(json!({"results": [1], "count": 1})));
        settle();
        assert_eq!(ready_calls.load(Ordering::SeqCst), 0);
    }
}
