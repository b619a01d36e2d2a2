pub mod app;
pub mod shared;

use leptos::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

use app::AppRoot;

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

/// Mounts a page under `AppRoot`, configured from local storage
pub fn mount<F, V>(page: F)
where
    F: FnOnce() -> V + Send + 'static,
    V: IntoView + 'static,
{
    let config = app::client_config();
    leptos::mount::mount_to_body(move || {
        view! {
            <AppRoot config=config>
                {page()}
            </AppRoot>
        }
    });
}
