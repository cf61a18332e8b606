use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PlayheadProps {
    /// Offset from the track's left edge in pixels.
    pub left: f64,
}

#[function_component(Playhead)]
pub fn playhead(props: &PlayheadProps) -> Html {
    html! {
        <div class="timeline-playhead" style={format!("left: {:.1}px;", props.left)}>
            <div class="timeline-playhead-knob" />
        </div>
    }
}
