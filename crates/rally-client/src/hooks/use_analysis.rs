//! Analysis lookup with polling while the service is still processing.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Interval;
use rally_core::{AnalysisResponse, ApiConfig};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::fetch_analysis;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Loading,
    Loaded(AnalysisResponse),
    Failed(String),
}

#[derive(Clone, PartialEq)]
pub struct AnalysisHandle {
    pub state: AnalysisState,
    /// Starts a lookup, cancelling any poll loop of a previous one.
    pub fetch: Callback<String>,
}

/// Shared pieces every request needs.
#[derive(Clone)]
struct Lookup {
    config: ApiConfig,
    state: UseStateHandle<AnalysisState>,
    poll: Rc<RefCell<Option<Interval>>>,
    /// Bumped per lookup; responses of older lookups are dropped.
    generation: Rc<RefCell<u64>>,
}

impl Lookup {
    fn is_current(&self, generation: u64) -> bool {
        *self.generation.borrow() == generation
    }

    fn start(&self, video_id: String, poll_interval_ms: u32) {
        self.poll.borrow_mut().take();
        let generation = {
            let mut current = self.generation.borrow_mut();
            *current += 1;
            *current
        };
        self.state.set(AnalysisState::Loading);
        tracing::info!(%video_id, "fetching analysis");

        let lookup = self.clone();
        spawn_local(async move {
            let result = fetch_analysis(&lookup.config, &video_id).await;
            if !lookup.is_current(generation) {
                return;
            }
            match result {
                Ok(response) => {
                    let in_progress = response.status.is_in_progress();
                    tracing::info!(%video_id, status = response.status.as_str(), "analysis received");
                    lookup.state.set(AnalysisState::Loaded(response));
                    if in_progress {
                        let interval = lookup.poll_loop(video_id, generation, poll_interval_ms);
                        *lookup.poll.borrow_mut() = Some(interval);
                    }
                }
                Err(err) => {
                    tracing::error!(%video_id, %err, "analysis request failed");
                    lookup.state.set(AnalysisState::Failed(err.to_string()));
                }
            }
        });
    }

    fn poll_loop(&self, video_id: String, generation: u64, poll_interval_ms: u32) -> Interval {
        let lookup = self.clone();
        Interval::new(poll_interval_ms, move || {
            let lookup = lookup.clone();
            let video_id = video_id.clone();
            spawn_local(async move {
                let result = fetch_analysis(&lookup.config, &video_id).await;
                if !lookup.is_current(generation) {
                    return;
                }
                match result {
                    Ok(response) => {
                        if !response.status.is_in_progress() {
                            tracing::info!(%video_id, status = response.status.as_str(), "analysis finished");
                            lookup.poll.borrow_mut().take();
                        }
                        lookup.state.set(AnalysisState::Loaded(response));
                    }
                    // A transient failure should not end the loop
                    Err(err) => tracing::warn!(%video_id, %err, "polling failed"),
                }
            });
        })
    }
}

#[hook]
pub fn use_analysis(config: ApiConfig, poll_interval_ms: u32) -> AnalysisHandle {
    let state = use_state(|| AnalysisState::Idle);
    let poll = use_mut_ref(|| None::<Interval>);
    let generation = use_mut_ref(|| 0_u64);

    // Stop polling on unmount
    {
        let poll = poll.clone();
        let generation = generation.clone();
        use_effect_with((), move |_| {
            move || {
                poll.borrow_mut().take();
                *generation.borrow_mut() += 1;
            }
        });
    }

    let lookup = Lookup {
        config,
        state: state.clone(),
        poll,
        generation,
    };
    let fetch = Callback::from(move |video_id: String| {
        let video_id = video_id.trim().to_string();
        if !video_id.is_empty() {
            lookup.start(video_id, poll_interval_ms);
        }
    });

    AnalysisHandle {
        state: (*state).clone(),
        fetch,
    }
}
