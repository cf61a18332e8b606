//! `<video>` element behind the engine's playback capability.

use rally_core::VideoPlayback;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;
use yew::NodeRef;

/// The mounted video element, or nothing while the player is not rendered.
/// Calls on a missing element are no-ops.
#[derive(Debug, Clone, Default)]
pub struct HtmlVideo(Option<HtmlVideoElement>);

impl HtmlVideo {
    pub fn from_ref(node: &NodeRef) -> Self {
        Self(node.cast::<HtmlVideoElement>())
    }
}

impl VideoPlayback for HtmlVideo {
    fn current_time(&self) -> f64 {
        self.0.as_ref().map_or(0.0, |v| v.current_time())
    }

    fn duration(&self) -> f64 {
        // NaN until metadata is loaded, Infinity for live streams
        self.0
            .as_ref()
            .map(|v| v.duration())
            .filter(|d| d.is_finite())
            .unwrap_or(0.0)
    }

    fn seek_to(&mut self, seconds: f64) {
        if let Some(video) = &self.0 {
            video.set_current_time(seconds);
        }
        self.play();
    }

    fn seek_to_with_preview(&mut self, seconds: f64) {
        if let Some(video) = &self.0 {
            video.set_current_time(seconds);
        }
    }

    fn play(&mut self) {
        let Some(video) = &self.0 else {
            return;
        };
        if let Ok(promise) = video.play() {
            wasm_bindgen_futures::spawn_local(async move {
                // Rejected when autoplay is blocked
                if let Err(err) = JsFuture::from(promise).await {
                    tracing::debug!(?err, "video play() rejected");
                }
            });
        }
    }

    fn pause(&mut self) {
        if let Some(video) = &self.0 {
            let _ = video.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.0.as_ref().is_none_or(|v| v.paused())
    }
}
