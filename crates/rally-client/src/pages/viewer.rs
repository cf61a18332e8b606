//! Video lookup and the rally editor.

use rally_core::{AnalysisStatus, ApiConfig};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_icons::{Icon, IconData};

use crate::components::{RallyWorkspace, StatusBadge};
use crate::hooks::{AnalysisState, use_analysis, use_editor_config, use_querystring};

#[function_component(ViewerPage)]
pub fn viewer_page() -> Html {
    let video_id = use_querystring("id");
    let input = use_state(|| (*video_id).clone());
    let config = use_editor_config();
    let analysis = use_analysis(ApiConfig::from_build_env(), config.poll_interval_ms);

    // Look up the id from the address bar on first load
    {
        let fetch = analysis.fetch.clone();
        let video_id = video_id.clone();
        use_effect_with((), move |_| {
            if !video_id.is_empty() {
                fetch.emit((*video_id).clone());
            }
        });
    }

    let submit = {
        let input = input.clone();
        let video_id = video_id.clone();
        let fetch = analysis.fetch.clone();
        move || {
            let id = input.trim().to_string();
            if id.is_empty() {
                return;
            }
            video_id.set(id.clone());
            fetch.emit(id);
        }
    };

    let oninput = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(el) = e.target_dyn_into::<HtmlInputElement>() {
                input.set(el.value());
            }
        })
    };

    let onkeydown = {
        let submit = submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                submit();
            }
        })
    };

    let onclick = Callback::from(move |_: MouseEvent| submit());

    let loading = matches!(analysis.state, AnalysisState::Loading);

    let body = match &analysis.state {
        AnalysisState::Idle => html! {
            <p class="viewer-hint">{ "Enter a video id to load its rallies." }</p>
        },
        AnalysisState::Loading => html! {
            <p class="viewer-hint">{ "Loading..." }</p>
        },
        AnalysisState::Failed(message) => html! {
            <div class="viewer-error">{ format!("Error: {message}") }</div>
        },
        AnalysisState::Loaded(response) => {
            let badge = html! { <StatusBadge status={response.status} /> };
            match (&response.video_url, response.is_ready()) {
                (Some(url), true) => html! {
                    <>
                        { badge }
                        <RallyWorkspace
                            key={response.video_id.clone()}
                            video_id={response.video_id.clone()}
                            video_url={url.clone()}
                            rallies={response.rallies_or_empty().to_vec()}
                        />
                    </>
                },
                _ if response.status.is_in_progress() => html! {
                    <>
                        { badge }
                        <p class="viewer-hint">{ "Analysis in progress. This page updates automatically." }</p>
                    </>
                },
                _ => html! {
                    <>
                        { badge }
                        <div class="viewer-error">
                            { response.error.clone().unwrap_or_else(|| {
                                if response.status == AnalysisStatus::Completed {
                                    "The analysis has no playable video.".to_string()
                                } else {
                                    "Analysis failed.".to_string()
                                }
                            }) }
                        </div>
                    </>
                },
            }
        }
    };

    html! {
        <main class="page viewer-page">
            <header class="viewer-header">
                <h1>{ "Rally Viewer" }</h1>
                <div class="viewer-search">
                    <input
                        type="text"
                        placeholder="Video id"
                        value={(*input).clone()}
                        {oninput}
                        {onkeydown}
                    />
                    <button class="primary-btn" disabled={loading} {onclick}>
                        <Icon data={IconData::LUCIDE_SEARCH} width="16px" height="16px" />
                        <span>{ "Analyze" }</span>
                    </button>
                </div>
            </header>
            { body }
        </main>
    }
}
