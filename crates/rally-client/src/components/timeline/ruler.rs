//! Time ruler above the track.

use rally_core::time::{format_time, generate_ticks, time_to_pixels};
use yew::prelude::*;

use super::local_x;

#[derive(Properties, PartialEq)]
pub struct TimelineRulerProps {
    pub duration: f64,
    pub track_width: f64,
    /// Click position in track pixels.
    pub on_seek: Callback<f64>,
}

#[function_component(TimelineRuler)]
pub fn timeline_ruler(props: &TimelineRulerProps) -> Html {
    let onclick = {
        let on_seek = props.on_seek.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(x) = local_x(&e) {
                on_seek.emit(x);
            }
        })
    };

    html! {
        <div class="timeline-ruler" {onclick}>
            { for generate_ticks(props.duration).into_iter().map(|t| {
                let left = time_to_pixels(t, props.track_width, props.duration);
                html! {
                    <div class="timeline-tick" style={format!("left: {left:.1}px;")}>
                        <span class="timeline-tick-label">{ format_time(t, false) }</span>
                    </div>
                }
            }) }
        </div>
    }
}
