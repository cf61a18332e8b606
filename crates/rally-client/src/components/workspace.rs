//! Player, rally list and timeline for one analysed video.

use rally_core::Rally;
use yew::prelude::*;

use crate::components::{RallyList, TimelineEditor, VideoPlayer};
use crate::hooks::{use_editor_config, use_timeline_session};

#[derive(Properties, PartialEq)]
pub struct RallyWorkspaceProps {
    pub video_id: AttrValue,
    pub video_url: AttrValue,
    /// Rallies from the analysis; read once per mount.
    pub rallies: Vec<Rally>,
}

/// Owns the editing session. Key it by video id so a new video starts fresh.
#[function_component(RallyWorkspace)]
pub fn rally_workspace(props: &RallyWorkspaceProps) -> Html {
    let video_ref = use_node_ref();
    let config = use_editor_config();
    let session = use_timeline_session(props.rallies.clone(), (*config).clone());
    let current_time = use_state(|| 0.0_f64);
    let duration = use_state(|| 0.0_f64);

    let on_time_update = {
        let session = session.clone();
        let video_ref = video_ref.clone();
        let current_time = current_time.clone();
        Callback::from(move |time: f64| {
            current_time.set(time);
            let paused = session.update_with_video(&video_ref, |s, video| s.time_update(video));
            if paused {
                tracing::debug!(time, "paused at rally end");
            }
        })
    };

    let on_duration = {
        let duration = duration.clone();
        Callback::from(move |d: f64| duration.set(d))
    };

    let on_play = {
        let session = session.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |index: usize| {
            session.update_with_video(&video_ref, |s, video| s.play_rally(index, video));
        })
    };

    let (rallies, active) = {
        let s = session.borrow();
        (s.rallies().to_vec(), s.active_rally(*current_time))
    };

    html! {
        <div class="rally-workspace">
            <div class="workspace-main">
                <VideoPlayer
                    url={props.video_url.clone()}
                    node_ref={video_ref.clone()}
                    {on_time_update}
                    {on_duration}
                />
                <aside class="workspace-sidebar">
                    <h3>{ format!("Rallies ({})", rallies.len()) }</h3>
                    <RallyList {rallies} {active} {on_play} />
                </aside>
            </div>
            <TimelineEditor
                video_id={props.video_id.clone()}
                changes={session.changes()}
                session={session.clone()}
                {video_ref}
                current_time={*current_time}
                duration={*duration}
            />
        </div>
    }
}
