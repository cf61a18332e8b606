//! Pointer dragging of rally blocks and their handles.
//!
//! A drag starts on a block's mousedown; move and up are tracked on the
//! document so the gesture keeps working when the pointer leaves the block.

use gloo::events::{EventListener, EventListenerOptions};
use rally_core::DragMode;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::hooks::SessionHandle;

/// Pointer-down on a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub index: usize,
    pub mode: DragMode,
    pub client_x: f64,
    pub pixels_per_second: f64,
}

#[derive(Clone, PartialEq)]
pub struct DragHandle {
    pub begin: Callback<DragStart>,
    pub is_dragging: bool,
}

#[hook]
pub fn use_drag_resize(session: SessionHandle, video_ref: NodeRef) -> DragHandle {
    let dragging = use_state(|| false);
    let listeners = use_mut_ref(Vec::<EventListener>::new);

    {
        let session = session.clone();
        let dragging = dragging.clone();
        use_effect_with(*dragging, move |is_dragging| {
            listeners.borrow_mut().clear();
            if !*is_dragging {
                return;
            }

            let document = gloo::utils::document();

            let on_move = {
                let session = session.clone();
                EventListener::new_with_options(
                    &document,
                    "mousemove",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(event) = event.dyn_ref::<MouseEvent>() else {
                            return;
                        };
                        // No text selection while dragging
                        event.prevent_default();
                        let x = f64::from(event.client_x());
                        session.update_with_video(&video_ref, |s, video| s.drag_to(x, video));
                    },
                )
            };

            let on_up = EventListener::new(&document, "mouseup", move |_| {
                session.update(|s| s.end_drag());
                dragging.set(false);
            });

            listeners.borrow_mut().extend([on_move, on_up]);
        });
    }

    let begin = {
        let dragging = dragging.clone();
        Callback::from(move |start: DragStart| {
            session.update(|s| {
                s.begin_drag(start.index, start.mode, start.client_x, start.pixels_per_second);
            });
            dragging.set(true);
        })
    };

    DragHandle {
        begin,
        is_dragging: *dragging,
    }
}
