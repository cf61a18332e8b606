//! Paste-JSON import dialog.

use rally_core::time::format_time;
use rally_core::transfer::parse_import;
use rally_core::Rally;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::components::Modal;

const PLACEHOLDER: &str = r#"[
  { "startTime": 12.3, "endTime": 18.9 },
  { "startTime": 25.0, "endTime": 31.4 }
]"#;

#[derive(Properties, PartialEq)]
pub struct ImportModalProps {
    pub state: UseStateHandle<bool>,
    /// Video length for the overrun warning, 0 when unknown.
    pub duration: f64,
    /// Replaces the current rallies.
    pub on_import: Callback<Vec<Rally>>,
}

#[function_component(ImportModal)]
pub fn import_modal(props: &ImportModalProps) -> Html {
    let text = use_state(String::new);
    let error = use_state(|| None::<String>);

    let oninput = {
        let text = text.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                text.set(area.value());
                error.set(None);
            }
        })
    };

    let reset = {
        let text = text.clone();
        let error = error.clone();
        move || {
            text.set(String::new());
            error.set(None);
        }
    };

    let on_confirm = {
        let text = text.clone();
        let error = error.clone();
        let state = props.state.clone();
        let on_import = props.on_import.clone();
        let duration = props.duration;
        let reset = reset.clone();
        Callback::from(move |_: MouseEvent| {
            let outcome = match parse_import(&text, duration) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::debug!(%err, "import rejected");
                    error.set(Some(err.to_string()));
                    return;
                }
            };
            if outcome.exceeds_duration {
                let message = format!(
                    "Some rallies end at {} but the video is only {} long. Import anyway?",
                    format_time(outcome.max_end_time(), true),
                    format_time(duration, true),
                );
                if !gloo::dialogs::confirm(&message) {
                    return;
                }
            }
            tracing::info!(count = outcome.rallies.len(), "importing rallies");
            on_import.emit(outcome.rallies);
            state.set(false);
            reset();
        })
    };

    let on_cancel = {
        let state = props.state.clone();
        let reset = reset.clone();
        Callback::from(move |_: MouseEvent| {
            state.set(false);
            reset();
        })
    };

    let footer = html! {
        <>
            <button class="text-btn" onclick={on_cancel}>{ "Cancel" }</button>
            <button class="primary-btn" disabled={text.trim().is_empty()} onclick={on_confirm}>
                { "Replace rallies" }
            </button>
        </>
    };

    html! {
        <Modal
            state={props.state.clone()}
            title="Import rallies"
            {footer}
            onclose={Callback::from(move |()| reset())}
            class="import-modal"
        >
            <p class="import-help">
                { "Paste a JSON array of rallies, or an object with a \"rallies\" array. \
                   Importing replaces every current rally." }
            </p>
            <textarea
                class="import-textarea"
                rows="12"
                spellcheck="false"
                placeholder={PLACEHOLDER}
                value={(*text).clone()}
                {oninput}
            />
            if let Some(err) = (*error).clone() {
                <div class="import-error">{ err }</div>
            }
        </Modal>
    }
}
