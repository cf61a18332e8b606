//! Timeline editor: toolbar, zoomable track and the editing hooks.

use chrono::{DateTime, Local, Utc};
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use rally_core::time::{follow_scroll, format_time, time_to_pixels};
use rally_core::transfer::export_csv;
use rally_core::{AddRallyState, Rally};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Element, WheelEvent};
use yew::prelude::*;
use yew_icons::{Icon, IconData};

use super::{ImportModal, KeyboardHint, Playhead, TimelineControls, TimelineRuler, TimelineTrack};
use crate::hooks::{SessionHandle, use_autosave, use_drag_resize, use_keyboard_edit};

/// Horizontal padding inside the scroll container, in pixels.
const TRACK_PADDING: f64 = 32.0;

/// How long the "copied" confirmation stays up.
const COPIED_RESET_MS: u32 = 2000;

#[derive(Properties, PartialEq)]
pub struct TimelineEditorProps {
    pub video_id: AttrValue,
    pub session: SessionHandle,
    /// [`SessionHandle::changes`] at render time.
    pub changes: u64,
    pub video_ref: NodeRef,
    pub current_time: f64,
    pub duration: f64,
}

fn format_saved_at(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[function_component(TimelineEditor)]
pub fn timeline_editor(props: &TimelineEditorProps) -> Html {
    let session = props.session.clone();
    let video_ref = props.video_ref.clone();

    let container_ref = use_node_ref();
    let container_width = use_state(|| 0.0_f64);
    let import_open = use_state(|| false);
    let copied = use_state(|| false);
    let copied_reset = use_mut_ref(|| None::<Timeout>);
    let listeners = use_mut_ref(Vec::<EventListener>::new);

    let autosave = use_autosave(props.video_id.clone(), session.clone());
    let drag = use_drag_resize(session.clone(), video_ref.clone());

    let on_delete_request = use_callback(session.clone(), |index: usize, session| {
        let Some(rally_index) = session.borrow().editor().get(index).map(|r| r.rally_index) else {
            return;
        };
        if gloo::dialogs::confirm(&format!("Delete rally #{rally_index}?")) {
            session.update(|s| s.delete(index));
        }
    });
    use_keyboard_edit(session.clone(), video_ref.clone(), on_delete_request);

    // Dialogs own the keyboard while open
    {
        let session = session.clone();
        use_effect_with(*import_open, move |open| {
            session.update(|s| s.set_keyboard_enabled(!*open));
        });
    }

    // Track the container width, and zoom with Ctrl+wheel
    {
        let container_ref = container_ref.clone();
        let container_width = container_width.clone();
        let session = session.clone();
        use_effect_with((), move |_| {
            listeners.borrow_mut().clear();

            let measure = {
                let container_ref = container_ref.clone();
                move || {
                    if let Some(el) = container_ref.cast::<Element>() {
                        container_width.set(f64::from(el.client_width()));
                    }
                }
            };
            measure();

            let resize = EventListener::new(&gloo::utils::window(), "resize", move |_| measure());
            listeners.borrow_mut().push(resize);

            if let Some(el) = container_ref.cast::<Element>() {
                let wheel = EventListener::new_with_options(
                    &el,
                    "wheel",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(event) = event.dyn_ref::<WheelEvent>() else {
                            return;
                        };
                        if !(event.ctrl_key() || event.meta_key()) {
                            return;
                        }
                        event.prevent_default();
                        if event.delta_y() < 0.0 {
                            session.update(|s| s.zoom_in());
                        } else {
                            session.update(|s| s.zoom_out());
                        }
                    },
                );
                listeners.borrow_mut().push(wheel);
            }

            move || listeners.borrow_mut().clear()
        });
    }

    let (rallies, overlaps, selected, add_state, zoom, can_undo, has_changes, dragging, keys_on) = {
        let s = session.borrow();
        (
            s.rallies().to_vec(),
            s.editor().overlaps().clone(),
            s.selected(),
            s.add_state(),
            s.zoom(),
            s.editor().can_undo(),
            s.editor().has_changes(),
            s.drag_mode(),
            s.keyboard().is_enabled(),
        )
    };
    let (can_zoom_in, can_zoom_out) = {
        let s = session.borrow();
        (s.can_zoom_in(), s.can_zoom_out())
    };
    let active = session.borrow().active_rally(props.current_time);
    let selected_rally: Option<Rally> = selected.and_then(|i| rallies.get(i).copied());
    let rally_count = rallies.len();

    let track_width = (*container_width - TRACK_PADDING).max(0.0) * zoom;
    let playhead_px = time_to_pixels(props.current_time, track_width, props.duration);

    // Keep the playhead in view while zoomed in
    {
        let container_ref = container_ref.clone();
        use_effect_with((playhead_px, zoom > 1.0), move |(playhead_px, zoomed)| {
            if !*zoomed {
                return;
            }
            if let Some(el) = container_ref.cast::<Element>() {
                let viewport = f64::from(el.client_width());
                let scroll = f64::from(el.scroll_left());
                if let Some(target) = follow_scroll(*playhead_px, scroll, viewport) {
                    #[allow(clippy::cast_possible_truncation)]
                    el.set_scroll_left(target.round() as i32);
                }
            }
        });
    }

    let on_seek = {
        let session = session.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |x: f64| {
            session.update_with_video(&video_ref, |s, video| s.seek_track(x, track_width, video));
        })
    };

    let on_add = {
        let session = session.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |_: MouseEvent| {
            session.update_with_video(&video_ref, |s, video| s.add_new(&*video));
        })
    };

    let on_cancel_add = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| session.update(|s| s.cancel_add()))
    };

    let on_copy_csv = {
        let csv = export_csv(&props.video_id, &rallies);
        let copied = copied.clone();
        Callback::from(move |_: MouseEvent| {
            let promise = gloo::utils::window().navigator().clipboard().write_text(&csv);
            let copied = copied.clone();
            let copied_reset = copied_reset.clone();
            spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => {
                        copied.set(true);
                        let copied = copied.clone();
                        *copied_reset.borrow_mut() =
                            Some(Timeout::new(COPIED_RESET_MS, move || copied.set(false)));
                    }
                    Err(err) => tracing::warn!(?err, "clipboard write failed"),
                }
            });
        })
    };

    let on_delete_all = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm(&format!("Delete all {rally_count} rallies?")) {
                session.update(|s| s.delete_all());
            }
        })
    };

    let on_open_import = {
        let import_open = import_open.clone();
        Callback::from(move |_: MouseEvent| import_open.set(true))
    };

    let on_import = {
        let session = session.clone();
        Callback::from(move |rallies: Vec<Rally>| session.update(|s| s.replace_all(&rallies)))
    };

    let on_undo = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            session.update(|s| s.undo());
        })
    };

    let on_revert = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Discard all edits and go back to the detected rallies?") {
                session.update(|s| s.revert_all());
            }
        })
    };

    let zoom_cb = |f: fn(&mut rally_core::TimelineSession)| {
        let session = session.clone();
        Callback::from(move |()| session.update(f))
    };

    let on_restore = {
        let restore = autosave.restore.clone();
        Callback::from(move |_: MouseEvent| restore.emit(()))
    };
    let on_discard = {
        let discard = autosave.discard.clone();
        Callback::from(move |_: MouseEvent| discard.emit(()))
    };

    let add_button = match add_state {
        AddRallyState::Idle => html! {
            <button class="toolbar-btn" title="Mark the start at the playhead (N)" onclick={on_add}>
                <Icon data={IconData::LUCIDE_PLUS} width="16px" height="16px" />
                <span>{ "Add rally" }</span>
            </button>
        },
        AddRallyState::PendingStart(start) => html! {
            <>
                <button class="toolbar-btn pending" title="Set the end at the playhead (N)" onclick={on_add}>
                    <Icon data={IconData::LUCIDE_CHECK} width="16px" height="16px" />
                    <span>{ format!("Finish ({} - ...)", format_time(start, true)) }</span>
                </button>
                <button class="icon-btn" title="Cancel" onclick={on_cancel_add}>
                    <Icon data={IconData::LUCIDE_X} width="16px" height="16px" />
                </button>
            </>
        },
    };

    let save_status = if autosave.is_saving {
        html! { <span class="autosave-status saving">{ "Saving..." }</span> }
    } else if let Some(at) = autosave.last_saved_at {
        html! { <span class="autosave-status">{ format!("Draft saved {}", format_saved_at(at)) }</span> }
    } else {
        html! {}
    };

    html! {
        <section class={classes!("timeline-editor", drag.is_dragging.then_some("dragging"))}>
            <div class="timeline-toolbar">
                { add_button }
                <button class="toolbar-btn" title="Copy as CSV" disabled={rally_count == 0} onclick={on_copy_csv}>
                    if *copied {
                        <Icon data={IconData::LUCIDE_CHECK} width="16px" height="16px" />
                        <span>{ "Copied" }</span>
                    } else {
                        <Icon data={IconData::LUCIDE_COPY} width="16px" height="16px" />
                        <span>{ "CSV" }</span>
                    }
                </button>
                <button class="toolbar-btn" title="Import JSON" onclick={on_open_import}>
                    <Icon data={IconData::LUCIDE_FOLDER_OPEN} width="16px" height="16px" />
                    <span>{ "Import" }</span>
                </button>
                <button class="toolbar-btn" title="Undo (Ctrl+Z)" disabled={!can_undo} onclick={on_undo}>
                    <Icon data={IconData::LUCIDE_UNDO} width="16px" height="16px" />
                </button>
                <button class="toolbar-btn" title="Revert all edits" disabled={!has_changes} onclick={on_revert}>
                    <Icon data={IconData::LUCIDE_REFRESH_CW} width="16px" height="16px" />
                </button>
                <button class="toolbar-btn danger" title="Delete all rallies" disabled={rally_count == 0} onclick={on_delete_all}>
                    <Icon data={IconData::LUCIDE_TRASH_2} width="16px" height="16px" />
                </button>
                <span class="toolbar-spacer" />
                <span class="rally-count">{ format!("{rally_count} rallies") }</span>
                { save_status }
            </div>

            if autosave.restore_available {
                <div class="restore-banner">
                    <span>{ "A saved draft differs from the analysis results." }</span>
                    <button class="primary-btn" onclick={on_restore}>{ "Restore draft" }</button>
                    <button class="text-btn" onclick={on_discard}>{ "Discard" }</button>
                </div>
            }

            <div class="timeline-scroll" ref={container_ref}>
                <div class="timeline-content" style={format!("width: {track_width:.1}px;")}>
                    <TimelineRuler duration={props.duration} {track_width} on_seek={on_seek.clone()} />
                    <TimelineTrack
                        {rallies}
                        {overlaps}
                        duration={props.duration}
                        {track_width}
                        {selected}
                        {active}
                        {dragging}
                        {on_seek}
                        on_drag_start={drag.begin.clone()}
                    />
                    <Playhead left={playhead_px} />
                </div>
            </div>

            <TimelineControls
                {zoom}
                {can_zoom_in}
                {can_zoom_out}
                on_zoom_in={zoom_cb(rally_core::TimelineSession::zoom_in)}
                on_zoom_out={zoom_cb(rally_core::TimelineSession::zoom_out)}
                on_reset={zoom_cb(rally_core::TimelineSession::reset_zoom)}
            />
            <KeyboardHint selected={selected_rally} {add_state} enabled={keys_on} />
            <ImportModal state={import_open} duration={props.duration} {on_import} />
        </section>
    }
}
