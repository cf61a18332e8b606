//! Application routes.

use yew_router::prelude::*;

/// Application routes.
#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    /// Lookup form, player and timeline editor. The video id lives in the
    /// `id` query parameter.
    #[at("/")]
    Viewer,
    /// Shown after a WASM panic.
    #[at("/panic")]
    Panic,
    /// 404 Not Found.
    #[not_found]
    #[at("/404")]
    NotFound,
}
