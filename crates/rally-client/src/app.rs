//! Main application component.

use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{NotFoundPage, PanicPage, ViewerPage};
use crate::routes::Route;

/// Route switch function.
fn switch(routes: Route) -> Html {
    match routes {
        Route::Viewer => html! { <ViewerPage /> },
        Route::Panic => html! { <PanicPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

/// Root application component with router.
#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}
