//! Video element wrapper.

use web_sys::HtmlVideoElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct VideoPlayerProps {
    pub url: AttrValue,
    /// Shared with the editing hooks, which drive the element through
    /// [`crate::video::HtmlVideo`].
    pub node_ref: NodeRef,
    /// Playback position changed.
    pub on_time_update: Callback<f64>,
    /// Metadata loaded and the length is known.
    pub on_duration: Callback<f64>,
}

#[function_component(VideoPlayer)]
pub fn video_player(props: &VideoPlayerProps) -> Html {
    let on_time_update = {
        let node_ref = props.node_ref.clone();
        let cb = props.on_time_update.clone();
        Callback::from(move |_: Event| {
            if let Some(video) = node_ref.cast::<HtmlVideoElement>() {
                cb.emit(video.current_time());
            }
        })
    };

    let on_loaded_metadata = {
        let node_ref = props.node_ref.clone();
        let cb = props.on_duration.clone();
        Callback::from(move |_: Event| {
            if let Some(video) = node_ref.cast::<HtmlVideoElement>() {
                let duration = video.duration();
                if duration.is_finite() {
                    tracing::debug!(duration, "video metadata loaded");
                    cb.emit(duration);
                }
            }
        })
    };

    html! {
        <div class="video-player">
            <video
                ref={props.node_ref.clone()}
                src={props.url.clone()}
                controls=true
                preload="metadata"
                ontimeupdate={on_time_update}
                onloadedmetadata={on_loaded_metadata}
            />
        </div>
    }
}
