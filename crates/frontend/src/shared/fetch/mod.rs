//! Fetch bindings: a process-wide response cache keyed by `ResourceKey`,
//! per-view bindings over it, and the Leptos hooks that wire both to signals.

mod binding;
mod cache;
mod cancel;
mod hooks;

pub use binding::{ResourceBinding, ResourceState};
pub use cache::{Fetcher, ResourceCache};
pub use cancel::CancelToken;
pub use hooks::{
    provide_fetch_context, revalidation_triggers, use_fetch_context, use_resource, FetchServices,
    ResourceHandle, RevalidationTrigger,
};
