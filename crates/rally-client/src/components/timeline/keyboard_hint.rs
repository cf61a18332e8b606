//! Selected rally summary and the shortcut legend.

use rally_core::time::format_time;
use rally_core::{AddRallyState, Rally};
use yew::prelude::*;

const SHORTCUTS: &[(&str, &str)] = &[
    ("A / D", "start -/+"),
    ("\u{2190} / \u{2192}", "end -/+"),
    ("Shift", "fine step"),
    ("Q / E", "start / end to playhead"),
    ("Z / V", "seek -/+ 1s"),
    ("X / C", "seek -/+ 0.2s"),
    ("\u{2191} / \u{2193}", "previous / next rally"),
    ("Space", "play / pause"),
    ("N", "add rally"),
    ("Del", "delete"),
    ("Ctrl+Z", "undo"),
    ("+ / -", "zoom"),
];

#[derive(Properties, PartialEq)]
pub struct KeyboardHintProps {
    #[prop_or_default]
    pub selected: Option<Rally>,
    pub add_state: AddRallyState,
    /// Keyboard editing is on (no dialog open).
    pub enabled: bool,
}

#[function_component(KeyboardHint)]
pub fn keyboard_hint(props: &KeyboardHintProps) -> Html {
    let status = match (props.add_state, props.selected) {
        (AddRallyState::PendingStart(start), _) => html! {
            <span class="hint-pending">
                { format!("New rally from {}, press N again to set the end", format_time(start, true)) }
            </span>
        },
        (AddRallyState::Idle, Some(rally)) => html! {
            <span class="hint-selected">
                <strong>{ format!("#{}", rally.rally_index) }</strong>
                { format!(
                    " {} - {} ({:.1}s)",
                    format_time(rally.start_time, true),
                    format_time(rally.end_time, true),
                    rally.duration,
                ) }
            </span>
        },
        (AddRallyState::Idle, None) => html! {
            <span class="hint-empty">{ "Click a rally to edit it" }</span>
        },
    };

    html! {
        <div class={classes!("keyboard-hint", (!props.enabled).then_some("disabled"))}>
            { status }
            <ul class="hint-keys">
                { for SHORTCUTS.iter().map(|(keys, what)| html! {
                    <li><kbd>{ *keys }</kbd>{ " " }{ *what }</li>
                }) }
            </ul>
        </div>
    }
}
