//! Document-level keyboard editing for the timeline.
//!
//! Key-down events go through the session's keyboard controller. A held
//! repeatable key runs one `Interval` at the repeat period; the controller
//! itself keeps the initial delay, so the timer only has to tick.

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use rally_core::KeyInput;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::hooks::SessionHandle;

/// Check if the event target is an input element (input, textarea, etc.)
fn is_input_element(event: &KeyboardEvent) -> bool {
    if let Some(target) = event.target() {
        if let Some(element) = target.dyn_ref::<web_sys::HtmlElement>() {
            let tag_name = element.tag_name().to_lowercase();
            return matches!(tag_name.as_str(), "input" | "textarea" | "select")
                || element.is_content_editable();
        }
    }
    false
}

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        code: event.code(),
        key: event.key(),
        key_code: event.key_code(),
        shift: event.shift_key(),
        ctrl: event.ctrl_key() || event.meta_key(), // Support Cmd on macOS
        in_text_input: is_input_element(event),
    }
}

/// Binds the editing keys while the component is mounted.
///
/// `on_delete_request` receives the position of a rally the user asked to
/// delete; the caller confirms before deleting.
#[hook]
pub fn use_keyboard_edit(
    session: SessionHandle,
    video_ref: NodeRef,
    on_delete_request: Callback<usize>,
) {
    let listeners = use_mut_ref(Vec::<EventListener>::new);
    let repeat = use_mut_ref(|| None::<Interval>);

    use_effect_with(
        (session, video_ref, on_delete_request),
        move |(session, video_ref, on_delete_request)| {
            // Clean up previous listeners
            listeners.borrow_mut().clear();
            repeat.borrow_mut().take();

            let document = gloo::utils::document();
            let window = gloo::utils::window();

            let keydown = {
                let session = session.clone();
                let video_ref = video_ref.clone();
                let on_delete_request = on_delete_request.clone();
                let repeat = repeat.clone();
                EventListener::new_with_options(
                    &document,
                    "keydown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        let input = key_input(event);
                        let response = session.update_with_video(&video_ref, |s, video| {
                            s.key_down(&input, js_sys::Date::now(), video)
                        });

                        if response.handled {
                            event.prevent_default();
                        }
                        if response.repeat_started {
                            let period = session.borrow().config().repeat_interval_ms;
                            let session = session.clone();
                            let video_ref = video_ref.clone();
                            *repeat.borrow_mut() = Some(Interval::new(period, move || {
                                session.update_with_video(&video_ref, |s, video| {
                                    s.poll_repeat(js_sys::Date::now(), video)
                                });
                            }));
                        }
                        if let Some(index) = response.confirm_delete {
                            on_delete_request.emit(index);
                        }
                    },
                )
            };

            let keyup = {
                let session = session.clone();
                let repeat = repeat.clone();
                EventListener::new(&document, "keyup", move |_| {
                    repeat.borrow_mut().take();
                    session.update(|s| s.key_up());
                })
            };

            // Losing focus swallows the key-up
            let blur = {
                let session = session.clone();
                let repeat = repeat.clone();
                EventListener::new(&window, "blur", move |_| {
                    repeat.borrow_mut().take();
                    session.update(|s| s.blur());
                })
            };

            listeners.borrow_mut().extend([keydown, keyup, blur]);
        },
    );
}
