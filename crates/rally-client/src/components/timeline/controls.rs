use yew::prelude::*;
use yew_icons::{Icon, IconData};

#[derive(Properties, PartialEq)]
pub struct TimelineControlsProps {
    pub zoom: f64,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_reset: Callback<()>,
}

/// Zoom buttons under the timeline.
#[function_component(TimelineControls)]
pub fn timeline_controls(props: &TimelineControlsProps) -> Html {
    let click = |cb: &Callback<()>| {
        let cb = cb.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div class="timeline-controls">
            <button
                class="icon-btn"
                title="Zoom out (-)"
                disabled={!props.can_zoom_out}
                onclick={click(&props.on_zoom_out)}
            >
                <Icon data={IconData::LUCIDE_ZOOM_OUT} width="16px" height="16px" />
            </button>
            <span class="timeline-zoom-label">{ format!("{:.1}x", props.zoom) }</span>
            <button
                class="icon-btn"
                title="Zoom in (+)"
                disabled={!props.can_zoom_in}
                onclick={click(&props.on_zoom_in)}
            >
                <Icon data={IconData::LUCIDE_ZOOM_IN} width="16px" height="16px" />
            </button>
            <button
                class="text-btn"
                title="Fit the whole video"
                disabled={!props.can_zoom_out}
                onclick={click(&props.on_reset)}
            >
                { "Fit" }
            </button>
        </div>
    }
}
