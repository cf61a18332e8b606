//! Zoomable rally timeline.

mod controls;
mod editor;
mod import_modal;
mod keyboard_hint;
mod playhead;
mod rally_block;
mod ruler;
mod track;

pub use controls::TimelineControls;
pub use editor::TimelineEditor;
pub use import_modal::ImportModal;
pub use keyboard_hint::KeyboardHint;
pub use playhead::Playhead;
pub use rally_block::RallyBlock;
pub use ruler::TimelineRuler;
pub use track::TimelineTrack;

use web_sys::{Element, MouseEvent};

/// Pointer x relative to the left edge of the event's current target.
pub(crate) fn local_x(event: &MouseEvent) -> Option<f64> {
    let target = event.current_target()?;
    let element: &Element = wasm_bindgen::JsCast::dyn_ref(&target)?;
    let rect = element.get_bounding_client_rect();
    Some(f64::from(event.client_x()) - rect.left())
}
