//! Shared timeline session for one loaded video.
//!
//! Event listeners and timers hold a clone of [`SessionHandle`] and read the
//! session when they fire, so they never act on a stale snapshot.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use rally_core::{EditorConfig, Rally, TimelineSession};
use yew::prelude::*;

use crate::video::HtmlVideo;

#[derive(Clone)]
pub struct SessionHandle {
    inner: Rc<RefCell<TimelineSession>>,
    changes: Rc<Cell<u64>>,
    redraw: UseForceUpdateHandle,
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SessionHandle {
    pub fn borrow(&self) -> Ref<'_, TimelineSession> {
        self.inner.borrow()
    }

    /// Count of updates so far. Child components take it as a prop, since
    /// handle equality only tracks identity.
    pub fn changes(&self) -> u64 {
        self.changes.get()
    }

    /// Mutates the session and schedules a re-render.
    pub fn update<R>(&self, f: impl FnOnce(&mut TimelineSession) -> R) -> R {
        let result = f(&mut self.inner.borrow_mut());
        self.changes.set(self.changes.get() + 1);
        self.redraw.force_update();
        result
    }

    /// Like [`SessionHandle::update`], with the mounted video element.
    pub fn update_with_video<R>(
        &self,
        video_ref: &NodeRef,
        f: impl FnOnce(&mut TimelineSession, &mut HtmlVideo) -> R,
    ) -> R {
        let mut video = HtmlVideo::from_ref(video_ref);
        self.update(|session| f(session, &mut video))
    }
}

/// Creates the session once per mount. Remount (keyed by video id) to start
/// over with new rallies.
#[hook]
pub fn use_timeline_session(initial: Vec<Rally>, config: EditorConfig) -> SessionHandle {
    let inner = {
        let config = config.clone();
        use_mut_ref(move || {
            tracing::info!(count = initial.len(), "timeline session started");
            TimelineSession::new(initial, config)
        })
    };
    let changes = use_memo((), |_| Cell::new(0_u64));
    let redraw = use_force_update();

    {
        let inner = inner.clone();
        use_effect_with(config, move |config| {
            if inner.borrow().config() != config {
                inner.borrow_mut().set_config(config.clone());
            }
        });
    }

    SessionHandle {
        inner,
        changes,
        redraw,
    }
}
