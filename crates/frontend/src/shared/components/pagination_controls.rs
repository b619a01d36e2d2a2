use crate::shared::filter::{FilterInput, FilterValue, Pagination};
use crate::shared::icons::icon;
use contracts::shared::filter::{PAGE_KEY, PAGE_SIZE_KEY};
use leptos::prelude::*;

/// Pager for a filtered list.
///
/// Page moves are reported as `("page", Index(n))` with a zero-based index,
/// size changes as `("pageSize", Event(size))`, so both go through the
/// filter reducer like any other field.
#[component]
pub fn PaginationControls(
    #[prop(into)] pagination: Signal<Pagination>,

    /// Total rows reported by the server
    #[prop(into)]
    total_count: Signal<u64>,

    on_change: Callback<(String, FilterInput)>,

    /// Defaults to [10, 20, 50, 100]
    #[prop(optional)]
    page_size_options: Option<Vec<u32>>,
) -> impl IntoView {
    let page_size_opts = page_size_options.unwrap_or_else(|| vec![10, 20, 50, 100]);

    let current_page = move || pagination.get().page_index;
    let total_pages = move || pagination.get().page_count(total_count.get());
    let go_to = move |index: u32| on_change.run((PAGE_KEY.to_string(), FilterInput::Index(index)));
    let on_last_page = move || current_page() + 1 >= total_pages();

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| go_to(0)
                disabled=move || current_page() == 0
                title="First page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let page = current_page();
                    if page > 0 {
                        go_to(page - 1);
                    }
                }
                disabled=move || current_page() == 0
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", current_page() + 1, total_pages(), total_count.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    if !on_last_page() {
                        go_to(current_page() + 1);
                    }
                }
                disabled=on_last_page
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go_to(total_pages() - 1)
                disabled=on_last_page
                title="Last page"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    match event_target_value(&ev).parse::<i64>() {
                        Ok(size) => on_change.run((
                            PAGE_SIZE_KEY.to_string(),
                            FilterInput::Event(FilterValue::Int(size)),
                        )),
                        Err(e) => log::warn!("Invalid page size: {}", e),
                    }
                }
                prop:value=move || pagination.get().page_size.to_string()
            >
                {page_size_opts.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || pagination.get().page_size == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
