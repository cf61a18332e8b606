use std::ops::Deref;

use yew::prelude::*;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|win| win.local_storage().ok().flatten())
}

/// State mirrored to localStorage as JSON under `key`.
///
/// A missing or unreadable entry falls back to `init_fn`.
#[hook]
pub fn use_localstorage<T, F>(key: &'static str, init_fn: F) -> UseStateHandle<T>
where
    T: 'static + Clone + serde::Serialize + serde::de::DeserializeOwned + PartialEq,
    F: Fn() -> T + 'static,
{
    let state = use_state(|| {
        let stored = local_storage().and_then(|storage| storage.get_item(key).ok().flatten());
        match stored.map(|value| serde_json::from_str::<T>(&value)) {
            Some(Ok(value)) => value,
            Some(Err(err)) => {
                tracing::warn!(key, %err, "discarding malformed stored value");
                init_fn()
            }
            None => init_fn(),
        }
    });
    {
        use_effect_with(state.clone(), move |state| {
            if let Some(storage) = local_storage() {
                if let Ok(serialized) = serde_json::to_string(state.deref()) {
                    if storage.set_item(key, &serialized).is_err() {
                        tracing::warn!(key, "failed to persist value");
                    }
                }
            }
            || ()
        });
    }
    state
}
