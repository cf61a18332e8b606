//! Pointer-drag translation for rally blocks.
//!
//! [`DragTracker`] turns pointer positions into *incremental* time deltas:
//! each move reports only the distance travelled since the previous move.
//! The same tracker then drives the three block gestures through
//! [`drag_patch`], which decides which bounds move and how they are clamped.

use crate::editor::RallyPatch;
use crate::rally::Rally;

/// Which part of a rally block is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Left handle: moves the start only.
    Start,
    /// Right handle: moves the end only.
    End,
    /// Block body: shifts both bounds, keeping the length.
    Move,
}

/// Tracks one drag gesture in pixel space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragTracker {
    pixels_per_second: f64,
    origin_x: Option<f64>,
    last_offset: f64,
}

impl DragTracker {
    pub fn new(pixels_per_second: f64) -> Self {
        Self {
            pixels_per_second,
            origin_x: None,
            last_offset: 0.0,
        }
    }

    /// Zoom changes mid-drag take effect on the next move.
    pub fn set_pixels_per_second(&mut self, pixels_per_second: f64) {
        self.pixels_per_second = pixels_per_second;
    }

    pub fn is_dragging(&self) -> bool {
        self.origin_x.is_some()
    }

    /// Records the pointer-down position.
    pub fn begin(&mut self, x: f64) {
        self.origin_x = Some(x);
        self.last_offset = 0.0;
    }

    /// Seconds moved since the previous call, or `None` when no drag is
    /// active or the scale is degenerate.
    pub fn move_to(&mut self, x: f64) -> Option<f64> {
        let origin = self.origin_x?;
        if !(self.pixels_per_second.is_finite() && self.pixels_per_second > 0.0) {
            return None;
        }
        let offset = (x - origin) / self.pixels_per_second;
        let delta = offset - self.last_offset;
        self.last_offset = offset;
        Some(delta)
    }

    /// Ends the gesture. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        self.last_offset = 0.0;
        self.origin_x.take().is_some()
    }
}

/// Bound changes for moving `rally` by `delta` seconds in `mode`.
///
/// `duration` is the video length and `min_gap` the smallest rally length a
/// handle drag may produce.
pub fn drag_patch(
    mode: DragMode,
    rally: &Rally,
    delta: f64,
    duration: f64,
    min_gap: f64,
) -> RallyPatch {
    match mode {
        DragMode::Start => {
            let upper = rally.end_time - min_gap;
            RallyPatch::start((rally.start_time + delta).min(upper).max(0.0))
        }
        DragMode::End => {
            let lower = rally.start_time + min_gap;
            RallyPatch::end((rally.end_time + delta).min(duration).max(lower))
        }
        DragMode::Move => {
            let length = rally.end_time - rally.start_time;
            let mut start = rally.start_time + delta;
            let mut end = rally.end_time + delta;

            if start < 0.0 {
                start = 0.0;
                end = length;
            }
            if end > duration {
                end = duration;
                start = duration - length;
            }
            RallyPatch::both(start, end)
        }
    }
}

/// Boundary the video previews while dragging in `mode`.
pub fn preview_time(mode: DragMode, patch: &RallyPatch) -> Option<f64> {
    match mode {
        DragMode::Start | DragMode::Move => patch.start_time,
        DragMode::End => patch.end_time,
    }
}
