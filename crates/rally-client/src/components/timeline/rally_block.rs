//! One rally on the track, with resize handles on both ends.

use rally_core::{DragMode, Rally};
use yew::prelude::*;

use crate::hooks::DragStart;

/// Narrowest rendered block, so short rallies stay grabbable.
const MIN_BLOCK_WIDTH: f64 = 20.0;

#[derive(Properties, PartialEq)]
pub struct RallyBlockProps {
    pub index: usize,
    pub rally: Rally,
    pub left: f64,
    pub width: f64,
    pub pixels_per_second: f64,
    #[prop_or_default]
    pub selected: bool,
    #[prop_or_default]
    pub overlapping: bool,
    #[prop_or_default]
    pub active: bool,
    /// Which part is being dragged right now, if any.
    #[prop_or_default]
    pub dragging: Option<DragMode>,
    pub on_drag_start: Callback<DragStart>,
}

#[function_component(RallyBlock)]
pub fn rally_block(props: &RallyBlockProps) -> Html {
    let mousedown = |mode: DragMode| {
        let on_drag_start = props.on_drag_start.clone();
        let index = props.index;
        let pixels_per_second = props.pixels_per_second;
        Callback::from(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            e.stop_propagation();
            e.prevent_default();
            on_drag_start.emit(DragStart {
                index,
                mode,
                client_x: f64::from(e.client_x()),
                pixels_per_second,
            });
        })
    };

    // Keep the track underneath from seeking
    let onclick = Callback::from(|e: MouseEvent| e.stop_propagation());

    let class = classes!(
        "rally-block",
        props.selected.then_some("selected"),
        props.overlapping.then_some("overlap"),
        props.active.then_some("active"),
        props.dragging.map(|mode| match mode {
            DragMode::Start => "dragging-start",
            DragMode::End => "dragging-end",
            DragMode::Move => "dragging-move",
        }),
    );
    let style = format!(
        "left: {:.1}px; width: {:.1}px;",
        props.left,
        props.width.max(MIN_BLOCK_WIDTH)
    );
    let title = format!(
        "Rally #{} ({:.1}s - {:.1}s)",
        props.rally.rally_index, props.rally.start_time, props.rally.end_time
    );

    html! {
        <div {class} {style} {title} {onclick}>
            <div class="rally-handle rally-handle-start" onmousedown={mousedown(DragMode::Start)} />
            <div class="rally-block-body" onmousedown={mousedown(DragMode::Move)}>
                <span class="rally-block-label">{ props.rally.rally_index }</span>
            </div>
            <div class="rally-handle rally-handle-end" onmousedown={mousedown(DragMode::End)} />
        </div>
    }
}
