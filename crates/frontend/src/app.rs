use std::rc::Rc;

use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos_router::components::Router;

use crate::shared::config::{load_config, ClientConfig};
use crate::shared::fetch::{provide_fetch_context, FetchServices};
use crate::shared::http::{ApiClient, GlooTransport};
use crate::shared::notify::{NoticeBoard, NoticeHost};

/// localStorage key holding a TOML override of the client configuration
pub const CONFIG_STORAGE_KEY: &str = "app_client_config";

const NOTICE_DISMISS_MS: u32 = 5000;

#[derive(Clone, Copy)]
struct ApiClientContext(StoredValue<ApiClient, LocalStorage>);

/// Client for create/update calls of the current page
pub fn use_api_client() -> ApiClient {
    use_context::<ApiClientContext>()
        .expect("ApiClientContext not provided in context (provide it in app root)")
        .0
        .get_value()
}

fn stored_config_override() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(CONFIG_STORAGE_KEY).ok()?
}

/// Client configuration for this browser; falls back to the defaults when
/// the stored override does not parse.
pub fn client_config() -> ClientConfig {
    match load_config(stored_config_override().as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid client config, using defaults: {}", e);
            ClientConfig::default()
        }
    }
}

/// Root of every page: provides the notice board and the fetch services,
/// then renders the page under a router.
#[component]
pub fn AppRoot(
    config: ClientConfig,
    /// Bearer token from the auth provider
    #[prop(optional)]
    token: Option<String>,
    children: Children,
) -> impl IntoView {
    let board = NoticeBoard::new(NOTICE_DISMISS_MS);
    provide_context(board);

    let config = Rc::new(config);
    let transport = Rc::new(GlooTransport::from_config(&config));
    let client = ApiClient::new(config, transport).with_token(token);
    provide_context(ApiClientContext(StoredValue::new_local(client.clone())));
    provide_fetch_context(FetchServices::new(client, Rc::new(board)));

    view! {
        <Router>
            {children()}
        </Router>
        <NoticeHost />
    }
}
