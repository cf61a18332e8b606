//! Read-only list of rallies next to the player.

use rally_core::Rally;
use rally_core::time::format_time;
use yew::prelude::*;
use yew_icons::{Icon, IconData};

#[derive(Properties, PartialEq)]
pub struct RallyListProps {
    pub rallies: Vec<Rally>,
    /// Rally under the playhead.
    pub active: Option<usize>,
    /// Play the rally at this position.
    pub on_play: Callback<usize>,
}

#[function_component(RallyList)]
pub fn rally_list(props: &RallyListProps) -> Html {
    if props.rallies.is_empty() {
        return html! {
            <div class="rally-list rally-list-empty">{ "No rallies detected." }</div>
        };
    }

    html! {
        <ul class="rally-list">
            { for props.rallies.iter().enumerate().map(|(index, rally)| {
                let on_click = {
                    let on_play = props.on_play.clone();
                    Callback::from(move |_: MouseEvent| on_play.emit(index))
                };
                let is_active = props.active == Some(index);
                html! {
                    <li
                        key={format!("{}-{index}", rally.rally_index)}
                        class={classes!("rally-list-item", is_active.then_some("active"))}
                        onclick={on_click}
                    >
                        <Icon data={IconData::LUCIDE_PLAY} width="12px" height="12px" />
                        <span class="rally-list-index">{ format!("#{}", rally.rally_index) }</span>
                        <span class="rally-list-range">
                            { format!(
                                "{} - {}",
                                format_time(rally.start_time, true),
                                format_time(rally.end_time, true),
                            ) }
                        </span>
                        <span class="rally-list-duration">{ format!("{:.1}s", rally.duration) }</span>
                    </li>
                }
            }) }
        </ul>
    }
}
