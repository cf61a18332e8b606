//! Playback capability consumed by the editing engine.

/// Narrow view of the video element.
///
/// The engine never inspects raw element state; everything it needs goes
/// through these calls. Time-update and duration-known notifications flow the
/// other way and are handled by the host.
pub trait VideoPlayback {
    fn current_time(&self) -> f64;

    /// Total length in seconds, `0.0` until metadata is known.
    fn duration(&self) -> f64;

    fn seek_to(&mut self, seconds: f64);

    /// Seeks without changing the paused/playing state, so the frame at the
    /// edited boundary becomes visible.
    fn seek_to_with_preview(&mut self, seconds: f64);

    fn play(&mut self);

    fn pause(&mut self);

    fn toggle_play(&mut self) {
        if self.is_paused() {
            self.play();
        } else {
            self.pause();
        }
    }

    fn is_paused(&self) -> bool;
}

/// Pauses playback if needed, then previews `seconds`.
///
/// Used by every edit path that moves a boundary: the user wants to see the
/// frame they are adjusting, not have playback carry on past it.
pub fn preview_at(video: &mut dyn VideoPlayback, seconds: f64) {
    if !video.is_paused() {
        video.pause();
    }
    video.seek_to_with_preview(seconds);
}
