use yew::prelude::*;

fn read_param(key: &str) -> Option<String> {
    let search = gloo::utils::window().location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get(key)
}

/// A plain-text query parameter kept in sync with the address bar.
///
/// Updates use `history.replaceState`, so they do not add history entries.
/// An empty value removes the parameter.
#[hook]
pub fn use_querystring(key: &'static str) -> UseStateHandle<String> {
    let state = use_state(|| read_param(key).unwrap_or_default());

    use_effect_with(state.clone(), move |state| {
        let window = gloo::utils::window();
        let location = window.location();
        let search = location.search().unwrap_or_default();

        let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
            return;
        };
        if state.is_empty() {
            params.delete(key);
        } else {
            params.set(key, state);
        }

        let pathname = location.pathname().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        let query = params.to_string().as_string().unwrap_or_default();
        let new_url = if query.is_empty() {
            format!("{pathname}{hash}")
        } else {
            format!("{pathname}?{query}{hash}")
        };

        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url));
        }
    });

    state
}
