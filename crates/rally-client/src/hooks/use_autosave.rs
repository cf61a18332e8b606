//! Debounced draft autosave and the restore prompt.

use chrono::{DateTime, Utc};
use gloo::timers::callback::Timeout;
use rally_core::AutoSave;
use yew::prelude::*;

use crate::hooks::SessionHandle;
use crate::storage::BrowserStorage;

#[derive(Clone, PartialEq)]
pub struct AutosaveHandle {
    /// A write is waiting for its debounce.
    pub is_saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    /// A stored draft differs from the server rallies.
    pub restore_available: bool,
    pub restore: Callback<()>,
    pub discard: Callback<()>,
}

/// Persists the session's rallies under the video's draft key.
///
/// The first run only loads the existing draft and decides whether to offer
/// it; every later list revision re-arms the debounce timer.
#[hook]
pub fn use_autosave(video_id: AttrValue, session: SessionHandle) -> AutosaveHandle {
    let debounce_ms = session.borrow().config().autosave_debounce_ms;
    let store = use_mut_ref(|| AutoSave::new(BrowserStorage, &video_id, debounce_ms));
    let timer = use_mut_ref(|| None::<Timeout>);
    let restore_available = use_state(|| false);
    let redraw = use_force_update();

    let revision = session.borrow().editor().revision();
    {
        let store = store.clone();
        let session = session.clone();
        let restore_available = restore_available.clone();
        let redraw = redraw.clone();
        use_effect_with(revision, move |_| {
            let mut autosave = store.borrow_mut();
            if !autosave.is_loaded() {
                autosave.load();
                if autosave.check_restore(session.borrow().rallies()) {
                    tracing::info!(key = autosave.key(), "draft differs from server rallies");
                    restore_available.set(true);
                }
                return;
            }

            autosave.schedule(session.borrow().editor().apply_changes(), js_sys::Date::now());
            drop(autosave);

            // Replacing the handle cancels the previous timer
            let fire = {
                let store = store.clone();
                let redraw = redraw.clone();
                move || {
                    store.borrow_mut().flush(js_sys::Date::now());
                    redraw.force_update();
                }
            };
            *timer.borrow_mut() = Some(Timeout::new(debounce_ms, fire));
            redraw.force_update();
        });
    }

    // Write whatever is pending when the editor goes away
    {
        let store = store.clone();
        use_effect_with((), move |_| {
            move || {
                store.borrow_mut().flush(js_sys::Date::now());
            }
        });
    }

    let restore = {
        let store = store.clone();
        let session = session.clone();
        let restore_available = restore_available.clone();
        Callback::from(move |()| {
            let draft = store.borrow().restorable().map(<[_]>::to_vec);
            if let Some(rallies) = draft {
                tracing::info!(count = rallies.len(), "restoring draft");
                session.update(|s| s.replace_all(&rallies));
            }
            restore_available.set(false);
        })
    };

    let discard = {
        let store = store.clone();
        let restore_available = restore_available.clone();
        Callback::from(move |()| {
            if !gloo::dialogs::confirm("Discard the saved draft? This cannot be undone.") {
                return;
            }
            store.borrow_mut().discard();
            restore_available.set(false);
        })
    };

    let autosave = store.borrow();
    AutosaveHandle {
        is_saving: autosave.is_saving(),
        last_saved_at: autosave.last_saved_at_utc(),
        restore_available: *restore_available,
        restore,
        discard,
    }
}
