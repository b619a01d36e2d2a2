use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{Notice, Notifier};
use crate::shared::icons::icon;

#[derive(Debug, Clone, PartialEq)]
struct NoticeEntry {
    id: u64,
    notice: Notice,
}

/// Stack of visible notices, provided in context at the app root.
///
/// Notices dismiss themselves after `dismiss_after_ms`; 0 keeps them until
/// closed by the user.
#[derive(Clone, Copy)]
pub struct NoticeBoard {
    entries: RwSignal<Vec<NoticeEntry>>,
    next_id: RwSignal<u64>,
    dismiss_after_ms: u32,
}

impl NoticeBoard {
    pub fn new(dismiss_after_ms: u32) -> Self {
        Self {
            entries: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
            dismiss_after_ms,
        }
    }

    pub fn push(&self, notice: Notice) -> u64 {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.entries.update(|entries| entries.push(NoticeEntry { id, notice }));

        if self.dismiss_after_ms > 0 {
            let board = *self;
            let delay = self.dismiss_after_ms;
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                board.dismiss(id);
            });
        }
        id
    }

    pub fn dismiss(&self, id: u64) {
        // the board may be gone when a delayed dismiss fires
        let _ = self.entries.try_update(|entries| entries.retain(|e| e.id != id));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.with(Vec::is_empty)
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        self.push(notice);
    }
}

/// Renders the notice stack. Must be mounted once, at the app root.
#[component]
pub fn NoticeHost() -> impl IntoView {
    let board = use_context::<NoticeBoard>()
        .expect("NoticeBoard not provided in context (provide it in app root)");

    view! {
        <Show when=move || !board.is_empty()>
            <div class="notice-host">
                <For
                    each=move || board.entries.get()
                    key=|entry| entry.id
                    children=move |entry| {
                        let NoticeEntry { id, notice } = entry;
                        let class = format!("notice notice--{}", notice.level.as_str());
                        view! {
                            <div class=class>
                                {icon(notice.level.as_str())}
                                <span class="notice__message">{notice.message}</span>
                                <button
                                    class="notice__close"
                                    on:click=move |_| board.dismiss(id)
                                    title="Dismiss"
                                >
                                    {icon("x")}
                                </button>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}
