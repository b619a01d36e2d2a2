//! Client-side routes for row actions: `/<resource>/<action>/<id>`

use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;
use std::fmt;

use crate::shared::notify::{Notice, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    View,
    Edit,
    Print,
}

impl RouteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Print => "print",
        }
    }
}

impl fmt::Display for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route of a row action; the id is percent-encoded
pub fn route_path(resource: &str, action: RouteAction, id: &str) -> String {
    format!(
        "/{}/{}/{}",
        resource.trim_matches('/'),
        action,
        urlencoding::encode(id)
    )
}

/// Route to the detail of a derived record (e.g. the order behind an invoice).
///
/// When the lookup found nothing, shows a "not found" notice and returns
/// `None` so the caller stays on the current page.
pub fn resolve_detail_route(
    notifier: &dyn Notifier,
    resource: &str,
    action: RouteAction,
    id: Option<&str>,
) -> Option<String> {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Some(route_path(resource, action, id)),
        None => {
            log::warn!("No {} record to {}", resource, action);
            notifier.notify(Notice::error(format!("Related {} not found", resource)));
            None
        }
    }
}

/// Navigation handler for row actions of one resource
pub fn use_row_navigation(resource: &'static str) -> impl Fn(RouteAction, &str) + Clone {
    let navigate = use_navigate();
    move |action, id| navigate(&route_path(resource, action, id), NavigateOptions::default())
}
