use rally_core::time::time_to_pixels;
use rally_core::{DragMode, OverlapMap, Rally};
use yew::prelude::*;

use super::{RallyBlock, local_x};
use crate::hooks::DragStart;

#[derive(Properties, PartialEq)]
pub struct TimelineTrackProps {
    pub rallies: Vec<Rally>,
    pub overlaps: OverlapMap,
    pub duration: f64,
    pub track_width: f64,
    #[prop_or_default]
    pub selected: Option<usize>,
    /// Rally under the playhead.
    #[prop_or_default]
    pub active: Option<usize>,
    #[prop_or_default]
    pub dragging: Option<(usize, DragMode)>,
    /// Click on empty track, in track pixels.
    pub on_seek: Callback<f64>,
    pub on_drag_start: Callback<DragStart>,
}

/// Lane of rally blocks. Clicking empty space seeks there.
#[function_component(TimelineTrack)]
pub fn timeline_track(props: &TimelineTrackProps) -> Html {
    let onclick = {
        let on_seek = props.on_seek.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(x) = local_x(&e) {
                on_seek.emit(x);
            }
        })
    };

    let pixels_per_second = if props.duration > 0.0 {
        props.track_width / props.duration
    } else {
        0.0
    };
    let to_px = |t: f64| time_to_pixels(t, props.track_width, props.duration);

    html! {
        <div class="timeline-track" {onclick}>
            { for props.rallies.iter().enumerate().map(|(index, rally)| {
                let left = to_px(rally.start_time);
                let width = to_px(rally.end_time) - left;
                let dragging = props
                    .dragging
                    .filter(|(i, _)| *i == index)
                    .map(|(_, mode)| mode);
                html! {
                    <RallyBlock
                        key={index}
                        {index}
                        rally={*rally}
                        {left}
                        {width}
                        {pixels_per_second}
                        selected={props.selected == Some(index)}
                        overlapping={props.overlaps.contains_key(&index)}
                        active={props.active == Some(index)}
                        {dragging}
                        on_drag_start={props.on_drag_start.clone()}
                    />
                }
            }) }
        </div>
    }
}
