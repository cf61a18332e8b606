//! Timeline editing session.
//!
//! Wraps the [`RallyEditor`] with the state the timeline UI needs around it:
//! the selected rally, the two-phase "add new" gesture, zoom, the keyboard
//! controller and the active drag. All edit paths that move a boundary
//! preview it on the video.

use crate::Millis;
use crate::config::EditorConfig;
use crate::drag::{self, DragMode, DragTracker};
use crate::editor::{RallyEditor, RallyPatch};
use crate::keyboard::{EditAction, KeyCommand, KeyInput, KeyOutcome, KeyboardController};
use crate::rally::Rally;
use crate::time::{clamp_time, pixels_to_time, round_time};
use crate::video::{VideoPlayback, preview_at};

/// Two-phase add gesture: the first press marks the start, the second
/// commits `[start, now]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AddRallyState {
    #[default]
    Idle,
    PendingStart(f64),
}

impl AddRallyState {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PendingStart(_))
    }
}

/// What the host has to do after a key-down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyResponse {
    /// The key belongs to the editor; suppress the browser default.
    pub handled: bool,
    /// A hold-repeat started; the host arms its repeat timers.
    pub repeat_started: bool,
    /// Position of a rally the user asked to delete, pending confirmation.
    pub confirm_delete: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct DragGesture {
    index: usize,
    mode: DragMode,
    tracker: DragTracker,
    /// Sub-decimal remainder lost to rounding, fed into the next move.
    carry: f64,
    edit_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSession {
    editor: RallyEditor,
    config: EditorConfig,
    keyboard: KeyboardController,
    selected: Option<usize>,
    add_state: AddRallyState,
    zoom: f64,
    drag: Option<DragGesture>,
    play_until: Option<f64>,
    /// The current key hold has opened its undo entry.
    hold_edit_open: bool,
}

impl TimelineSession {
    pub fn new(initial: Vec<Rally>, config: EditorConfig) -> Self {
        Self {
            editor: RallyEditor::with_undo_limit(initial, config.max_undo_steps),
            keyboard: KeyboardController::new(config.repeat_delay_ms, config.repeat_interval_ms),
            config,
            selected: None,
            add_state: AddRallyState::Idle,
            zoom: 1.0,
            drag: None,
            play_until: None,
            hold_edit_open: false,
        }
    }

    pub fn editor(&self) -> &RallyEditor {
        &self.editor
    }

    pub fn rallies(&self) -> &[Rally] {
        self.editor.rallies()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn keyboard(&self) -> &KeyboardController {
        &self.keyboard
    }

    /// Applies new tunables. Any held key is released.
    pub fn set_config(&mut self, config: EditorConfig) {
        let enabled = self.keyboard.is_enabled();
        self.keyboard = KeyboardController::new(config.repeat_delay_ms, config.repeat_interval_ms);
        self.keyboard.set_enabled(enabled);
        self.zoom = self.zoom.min(config.max_zoom).max(config.min_zoom);
        self.config = config;
    }

    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard.set_enabled(enabled);
        if !enabled {
            self.hold_edit_open = false;
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_rally(&self) -> Option<&Rally> {
        self.selected.and_then(|i| self.editor.get(i))
    }

    /// Out-of-range positions clear the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.editor.len());
    }

    /// With nothing selected, jumps to the last rally.
    pub fn select_previous(&mut self) {
        let len = self.editor.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            None => len - 1,
            Some(i) => i.saturating_sub(1).min(len - 1),
        });
    }

    /// With nothing selected, jumps to the first rally.
    pub fn select_next(&mut self) {
        let len = self.editor.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    fn fix_selection(&mut self) {
        self.selected = self.selected.filter(|&i| i < self.editor.len());
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * self.config.zoom_factor).min(self.config.max_zoom);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / self.config.zoom_factor).max(self.config.min_zoom);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = self.config.min_zoom;
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.config.max_zoom
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.config.min_zoom
    }

    pub fn add_state(&self) -> AddRallyState {
        self.add_state
    }

    /// Advances the add gesture at the current playhead. Returns the new
    /// rally's position when one was committed.
    pub fn add_new(&mut self, video: &dyn VideoPlayback) -> Option<usize> {
        let current = video.current_time();
        match self.add_state {
            AddRallyState::Idle => {
                self.add_state = AddRallyState::PendingStart(current);
                tracing::debug!(start = current, "add rally: start marked");
                None
            }
            AddRallyState::PendingStart(start) => {
                self.add_state = AddRallyState::Idle;
                let (start, end) = (round_time(start), round_time(current));
                if end <= start {
                    tracing::debug!(start, end, "add rally: end before start, dropped");
                    return None;
                }
                self.editor.add(start, end);
                let position = self
                    .editor
                    .rallies()
                    .iter()
                    .position(|r| r.start_time == start && r.end_time == end);
                self.selected = position;
                position
            }
        }
    }

    pub fn cancel_add(&mut self) {
        self.add_state = AddRallyState::Idle;
    }

    /// Deletes a rally the user already confirmed. The selection follows.
    pub fn delete(&mut self, index: usize) -> bool {
        if !self.editor.delete(index) {
            return false;
        }
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        true
    }

    pub fn delete_all(&mut self) {
        self.editor.replace_all(&[]);
        self.selected = None;
    }

    /// Replaces the list (draft restore, import).
    pub fn replace_all(&mut self, rallies: &[Rally]) {
        self.editor.replace_all(rallies);
        self.selected = None;
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.editor.undo();
        self.fix_selection();
        undone
    }

    pub fn revert_all(&mut self) {
        self.editor.revert_all();
        self.fix_selection();
    }

    pub fn key_down(
        &mut self,
        input: &KeyInput,
        now: Millis,
        video: &mut dyn VideoPlayback,
    ) -> KeyResponse {
        match self.keyboard.key_down(input, now) {
            KeyOutcome::Unhandled => KeyResponse::default(),
            KeyOutcome::Consumed => KeyResponse {
                handled: true,
                ..KeyResponse::default()
            },
            KeyOutcome::Command(command) => KeyResponse {
                handled: true,
                repeat_started: matches!(command, KeyCommand::Adjust { .. }),
                confirm_delete: self.execute(command, video),
            },
        }
    }

    pub fn key_up(&mut self) -> bool {
        self.hold_edit_open = false;
        self.keyboard.key_up()
    }

    pub fn blur(&mut self) -> bool {
        self.hold_edit_open = false;
        self.keyboard.blur()
    }

    /// Runs the repeats that became due. Returns how many ran.
    pub fn poll_repeat(&mut self, now: Millis, video: &mut dyn VideoPlayback) -> usize {
        let due = self.keyboard.poll(now);
        for command in &due {
            self.execute(*command, video);
        }
        due.len()
    }

    /// Runs one command. Deletion is not performed here: the position to
    /// delete is returned so the host can confirm first.
    pub fn execute(&mut self, command: KeyCommand, video: &mut dyn VideoPlayback) -> Option<usize> {
        match command {
            KeyCommand::Adjust {
                action,
                precise,
                repeat,
            } => {
                self.adjust(action, precise, repeat, video);
            }
            KeyCommand::SetStartToCurrent => {
                self.set_start_to_current(video);
            }
            KeyCommand::SetEndToCurrent => {
                self.set_end_to_current(video);
            }
            KeyCommand::DeleteSelected => return self.selected,
            KeyCommand::SelectPrevious => self.select_previous(),
            KeyCommand::SelectNext => self.select_next(),
            KeyCommand::TogglePlay => video.toggle_play(),
            KeyCommand::AddNew => {
                self.add_new(video);
            }
            KeyCommand::ZoomIn => self.zoom_in(),
            KeyCommand::ZoomOut => self.zoom_out(),
            KeyCommand::Undo => {
                self.undo();
            }
        }
        None
    }

    /// One step of a bound adjustment or playhead seek.
    ///
    /// Bound moves are clamped to `start >= 0`, `end <= duration` and a
    /// minimum rally length, and dropped if the clamp leaves nothing to move.
    /// The first fire of a hold that actually moves a bound opens the undo
    /// entry for the whole hold, even if it is a repeat.
    pub fn adjust(
        &mut self,
        action: EditAction,
        precise: bool,
        repeat: bool,
        video: &mut dyn VideoPlayback,
    ) -> bool {
        if !repeat {
            self.hold_edit_open = false;
        }
        let duration = known_duration(video);

        if action.is_seek() {
            let delta = match action {
                EditAction::SeekBack => -1.0,
                EditAction::SeekForward => 1.0,
                EditAction::SeekBackFine => -0.2,
                _ => 0.2,
            };
            let target = clamp_time(video.current_time() + delta, 0.0, duration);
            preview_at(video, target);
            return true;
        }

        let Some((index, rally)) = self.selected.zip(self.selected_rally().copied()) else {
            return false;
        };
        let step = self.config.step_for(precise);
        let gap = self.config.min_gap;

        let patch = match action {
            EditAction::StartDecrease => {
                let start = round_time((rally.start_time - step).max(0.0));
                (start < rally.start_time).then_some(RallyPatch::start(start))
            }
            EditAction::StartIncrease => {
                let limit = rally.end_time - gap;
                let start = round_time((rally.start_time + step).min(limit));
                (start > rally.start_time && start <= limit + 1e-9)
                    .then_some(RallyPatch::start(start))
            }
            EditAction::EndDecrease => {
                let limit = rally.start_time + gap;
                let end = round_time((rally.end_time - step).max(limit));
                (end < rally.end_time && end >= limit - 1e-9).then_some(RallyPatch::end(end))
            }
            _ => {
                let end = round_time(clamp_time(rally.end_time + step, 0.0, duration));
                (end > rally.end_time).then_some(RallyPatch::end(end))
            }
        };
        let Some(patch) = patch else {
            tracing::trace!(?action, index, "adjustment has no room, dropped");
            return false;
        };

        if !self.hold_edit_open {
            self.hold_edit_open = true;
            self.editor.begin_edit();
        }
        if let Some(position) = self.editor.update_live(index, patch) {
            self.selected = Some(position);
        }
        if let Some(time) = drag::preview_time(edited_mode(action), &patch) {
            preview_at(video, time);
        }
        true
    }

    /// Moves the selected start to the playhead, keeping the minimum length.
    pub fn set_start_to_current(&mut self, video: &mut dyn VideoPlayback) -> bool {
        let Some((index, rally)) = self.selected.zip(self.selected_rally().copied()) else {
            return false;
        };
        let current = video.current_time();
        if current >= rally.end_time - self.config.min_gap {
            return false;
        }
        self.selected = self.editor.update(index, RallyPatch::start(current.max(0.0)));
        true
    }

    /// Moves the selected end to the playhead, keeping the minimum length.
    pub fn set_end_to_current(&mut self, video: &mut dyn VideoPlayback) -> bool {
        let Some((index, rally)) = self.selected.zip(self.selected_rally().copied()) else {
            return false;
        };
        let current = video.current_time();
        if current <= rally.start_time + self.config.min_gap {
            return false;
        }
        self.selected = self.editor.update(index, RallyPatch::end(current));
        true
    }

    /// Pauses and previews the time under a click on the track.
    pub fn seek_track(&mut self, x: f64, track_width: f64, video: &mut dyn VideoPlayback) {
        let duration = video.duration();
        let time = clamp_time(
            pixels_to_time(x, track_width, duration),
            0.0,
            known_duration(video),
        );
        preview_at(video, time);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_mode(&self) -> Option<(usize, DragMode)> {
        self.drag.as_ref().map(|d| (d.index, d.mode))
    }

    /// Pointer-down on a block or one of its handles. Selects the rally.
    pub fn begin_drag(&mut self, index: usize, mode: DragMode, x: f64, pixels_per_second: f64) {
        if index >= self.editor.len() {
            return;
        }
        let mut tracker = DragTracker::new(pixels_per_second);
        tracker.begin(x);
        self.selected = Some(index);
        self.drag = Some(DragGesture {
            index,
            mode,
            tracker,
            carry: 0.0,
            edit_open: false,
        });
        tracing::trace!(index, ?mode, "drag started");
    }

    /// Pointer-move during a drag. The first real move opens the undo entry
    /// for the whole gesture.
    pub fn drag_to(&mut self, x: f64, video: &mut dyn VideoPlayback) -> bool {
        let Some(gesture) = self.drag.as_mut() else {
            return false;
        };
        let Some(delta) = gesture.tracker.move_to(x) else {
            return false;
        };
        let Some(rally) = self.editor.get(gesture.index).copied() else {
            return false;
        };
        let duration = known_duration(video).unwrap_or(f64::INFINITY);
        let patch = drag::drag_patch(
            gesture.mode,
            &rally,
            delta + gesture.carry,
            duration,
            self.config.min_gap,
        );
        let requested = drag::preview_time(gesture.mode, &patch);

        if !gesture.edit_open {
            gesture.edit_open = true;
            self.editor.begin_edit();
        }
        let Some(position) = self.editor.update_live(gesture.index, patch) else {
            return false;
        };
        gesture.index = position;
        self.selected = Some(position);

        if let (Some(requested), Some(stored)) = (requested, self.editor.get(position)) {
            let stored = match gesture.mode {
                DragMode::End => stored.end_time,
                DragMode::Start | DragMode::Move => stored.start_time,
            };
            gesture.carry = requested - stored;
            preview_at(video, stored);
        }
        true
    }

    /// Pointer-up anywhere. Returns whether a drag was active.
    pub fn end_drag(&mut self) -> bool {
        let ended = self.drag.take().is_some();
        if ended {
            tracing::trace!("drag ended");
        }
        ended
    }

    /// Plays one rally from its start and arms the auto-pause at its end.
    pub fn play_rally(&mut self, index: usize, video: &mut dyn VideoPlayback) {
        let Some(rally) = self.editor.get(index).copied() else {
            return;
        };
        self.selected = Some(index);
        self.play_until = Some(rally.end_time);
        video.seek_to(rally.start_time);
        video.play();
    }

    /// Time-update notification from the video. Returns true if playback was
    /// auto-paused at the end of a rally played from the list.
    pub fn time_update(&mut self, video: &mut dyn VideoPlayback) -> bool {
        match self.play_until {
            Some(until) if video.current_time() >= until => {
                self.play_until = None;
                video.pause();
                true
            }
            _ => false,
        }
    }

    /// Position of the rally under the playhead.
    pub fn active_rally(&self, time: f64) -> Option<usize> {
        crate::rally::rally_at(self.editor.rallies(), time)
    }
}

/// Video length, if metadata has arrived.
fn known_duration(video: &dyn VideoPlayback) -> Option<f64> {
    let duration = video.duration();
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

fn edited_mode(action: EditAction) -> DragMode {
    match action {
        EditAction::EndDecrease | EditAction::EndIncrease => DragMode::End,
        _ => DragMode::Start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyInput;
    use crate::rally;
    use crate::test_utils::FakeVideo;

    fn session(bounds: &[(f64, f64)]) -> TimelineSession {
        let raw: Vec<Rally> = bounds.iter().map(|&(s, e)| Rally::new(s, e)).collect();
        TimelineSession::new(rally::reindex(&raw), EditorConfig::default())
    }

    fn bounds(session: &TimelineSession, index: usize) -> (f64, f64) {
        let r = session.rallies()[index];
        (r.start_time, r.end_time)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_start_adjustments_clamp() {
        let mut s = session(&[(0.3, 10.0)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        assert!(s.adjust(EditAction::StartDecrease, false, false, &mut video));
        assert_close(bounds(&s, 0).0, 0.0);
        // Already at zero: nothing to do
        assert!(!s.adjust(EditAction::StartDecrease, false, true, &mut video));

        let mut s = session(&[(9.7, 10.0)]);
        s.select(Some(0));
        assert!(s.adjust(EditAction::StartIncrease, false, false, &mut video));
        assert_close(bounds(&s, 0).0, 9.9);
        assert!(!s.adjust(EditAction::StartIncrease, true, true, &mut video));
    }

    #[test]
    fn test_end_adjustments_clamp() {
        let mut s = session(&[(5.0, 59.8)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        assert!(s.adjust(EditAction::EndIncrease, false, false, &mut video));
        assert_close(bounds(&s, 0).1, 60.0);
        assert!(!s.adjust(EditAction::EndIncrease, false, true, &mut video));

        let mut s = session(&[(5.0, 5.3)]);
        s.select(Some(0));
        assert!(s.adjust(EditAction::EndDecrease, false, false, &mut video));
        assert_close(bounds(&s, 0).1, 5.1);
        assert!(!s.adjust(EditAction::EndDecrease, false, true, &mut video));
    }

    #[test]
    fn test_precise_step() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        s.adjust(EditAction::EndIncrease, true, false, &mut video);
        assert_close(bounds(&s, 0).1, 10.1);
        s.adjust(EditAction::EndIncrease, false, true, &mut video);
        assert_close(bounds(&s, 0).1, 10.6);
    }

    #[test]
    fn test_adjust_previews_bound_and_pauses() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0).at(7.0);
        video.paused = false;
        s.select(Some(0));

        s.adjust(EditAction::StartDecrease, false, false, &mut video);
        assert!(video.paused);
        assert_close(video.time, 4.5);
    }

    #[test]
    fn test_adjust_without_selection_is_ignored() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);
        assert!(!s.adjust(EditAction::StartDecrease, false, false, &mut video));
        assert!(!s.editor().can_undo());
    }

    #[test]
    fn test_key_hold_is_one_undo_step() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        let response = s.key_down(&KeyInput::code("ArrowRight"), 0.0, &mut video);
        assert!(response.handled && response.repeat_started);
        assert_eq!(s.poll_repeat(450.0, &mut video), 3);
        s.key_up();
        assert_eq!(s.poll_repeat(1000.0, &mut video), 0);

        assert_close(bounds(&s, 0).1, 12.0);
        assert_eq!(s.editor().undo_depth(), 1);
        assert!(s.undo());
        assert_close(bounds(&s, 0).1, 10.0);
    }

    #[test]
    fn test_hold_opens_undo_on_first_effective_fire() {
        let mut s = session(&[(0.0, 5.0), (10.0, 15.0)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        // Start is already at zero, so the press itself changes nothing
        s.key_down(&KeyInput::code("KeyA"), 0.0, &mut video);
        assert!(!s.editor().can_undo());

        // Selection moves while the key is still held
        s.select(Some(1));
        assert_eq!(s.poll_repeat(500.0, &mut video), 4);
        assert_close(bounds(&s, 1).0, 8.0);
        assert_eq!(s.editor().undo_depth(), 1);

        s.key_up();
        assert!(s.undo());
        assert_close(bounds(&s, 1).0, 10.0);
    }

    #[test]
    fn test_separate_holds_are_separate_undo_steps() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        s.key_down(&KeyInput::code("ArrowRight"), 0.0, &mut video);
        s.key_up();
        s.key_down(&KeyInput::code("ArrowRight"), 1000.0, &mut video);
        s.key_up();

        assert_close(bounds(&s, 0).1, 11.0);
        assert_eq!(s.editor().undo_depth(), 2);
    }

    #[test]
    fn test_unbound_physical_key_does_not_seek() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0).at(10.0);
        let input = KeyInput {
            code: "KeyW".to_string(),
            key: "z".to_string(),
            key_code: 90,
            ..KeyInput::default()
        };

        let response = s.key_down(&input, 0.0, &mut video);
        assert!(!response.handled);
        assert_close(video.time, 10.0);
        assert!(video.seeks.is_empty());
    }

    #[test]
    fn test_seek_keys_clamp_to_video() {
        let mut s = session(&[]);
        let mut video = FakeVideo::new(10.0).at(0.5);

        s.adjust(EditAction::SeekBack, false, false, &mut video);
        assert_close(video.time, 0.0);

        video.time = 9.9;
        s.adjust(EditAction::SeekForwardFine, false, false, &mut video);
        assert_close(video.time, 10.0);

        s.adjust(EditAction::SeekBackFine, false, false, &mut video);
        assert_close(video.time, 9.8);
    }

    #[test]
    fn test_set_bounds_to_current_time() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0).at(9.95);
        s.select(Some(0));

        // Too close to the end
        assert!(!s.set_start_to_current(&mut video));

        video.time = 6.04;
        assert!(s.set_start_to_current(&mut video));
        assert_close(bounds(&s, 0).0, 6.0);

        video.time = 6.05;
        assert!(!s.set_end_to_current(&mut video));
        video.time = 12.26;
        assert!(s.set_end_to_current(&mut video));
        assert_close(bounds(&s, 0).1, 12.3);
        assert_eq!(s.editor().undo_depth(), 2);
    }

    #[test]
    fn test_selection_follows_resort() {
        let mut s = session(&[(0.0, 5.0), (10.0, 15.0)]);
        let mut video = FakeVideo::new(60.0).at(12.0);
        s.select(Some(0));

        s.set_end_to_current(&mut video);
        video.time = 11.0;
        assert!(s.set_start_to_current(&mut video));
        assert_eq!(s.selected(), Some(1));
        assert_close(bounds(&s, 1).0, 11.0);
    }

    #[test]
    fn test_select_previous_next() {
        let mut s = session(&[(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
        s.select_previous();
        assert_eq!(s.selected(), Some(2));
        s.select_next();
        assert_eq!(s.selected(), Some(2));

        s.select(None);
        s.select_next();
        assert_eq!(s.selected(), Some(0));
        s.select_previous();
        assert_eq!(s.selected(), Some(0));

        let mut empty = session(&[]);
        empty.select_next();
        assert_eq!(empty.selected(), None);
    }

    #[test]
    fn test_add_new_two_phase() {
        let mut s = session(&[(20.0, 30.0)]);
        let mut video = FakeVideo::new(60.0).at(3.04);

        assert_eq!(s.add_new(&video), None);
        assert_eq!(s.add_state(), AddRallyState::PendingStart(3.04));

        video.time = 8.26;
        assert_eq!(s.add_new(&video), Some(0));
        assert_eq!(s.add_state(), AddRallyState::Idle);
        assert_eq!(s.selected(), Some(0));
        assert_eq!(bounds(&s, 0), (3.0, 8.3));
    }

    #[test]
    fn test_add_new_rejects_backwards_end() {
        let mut s = session(&[]);
        let mut video = FakeVideo::new(60.0).at(8.0);
        s.add_new(&video);
        video.time = 4.0;
        assert_eq!(s.add_new(&video), None);
        assert!(s.rallies().is_empty());
        assert!(!s.add_state().is_pending());
    }

    #[test]
    fn test_delete_adjusts_selection() {
        let mut s = session(&[(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
        s.select(Some(2));
        assert!(s.delete(0));
        assert_eq!(s.selected(), Some(1));

        assert!(s.delete(1));
        assert_eq!(s.selected(), None);
        assert!(!s.delete(5));
    }

    #[test]
    fn test_delete_key_asks_for_confirmation() {
        let mut s = session(&[(0.0, 1.0)]);
        let mut video = FakeVideo::new(60.0);
        s.select(Some(0));

        let response = s.key_down(&KeyInput::code("Delete"), 0.0, &mut video);
        assert_eq!(response.confirm_delete, Some(0));
        assert_eq!(s.rallies().len(), 1);
    }

    #[test]
    fn test_delete_all_is_undoable() {
        let mut s = session(&[(0.0, 1.0), (2.0, 3.0)]);
        s.select(Some(1));
        s.delete_all();
        assert!(s.rallies().is_empty());
        assert_eq!(s.selected(), None);
        assert!(s.undo());
        assert_eq!(s.rallies().len(), 2);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut s = session(&[]);
        for _ in 0..20 {
            s.zoom_in();
        }
        assert_close(s.zoom(), 40.0);
        assert!(!s.can_zoom_in());

        s.zoom_out();
        assert_close(s.zoom(), 40.0 / 1.5);
        s.reset_zoom();
        assert_close(s.zoom(), 1.0);
        s.zoom_out();
        assert_close(s.zoom(), 1.0);
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);

        s.begin_drag(0, DragMode::End, 100.0, 10.0);
        assert_eq!(s.selected(), Some(0));
        s.drag_to(110.0, &mut video);
        s.drag_to(130.0, &mut video);
        assert!(s.end_drag());

        assert_close(bounds(&s, 0).1, 13.0);
        assert_close(video.time, 13.0);
        assert_eq!(s.editor().undo_depth(), 1);
        s.undo();
        assert_close(bounds(&s, 0).1, 10.0);
    }

    #[test]
    fn test_click_without_move_leaves_no_undo() {
        let mut s = session(&[(5.0, 10.0)]);
        s.begin_drag(0, DragMode::Move, 100.0, 10.0);
        s.end_drag();
        assert!(!s.editor().can_undo());
    }

    #[test]
    fn test_slow_drag_accumulates() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);

        // 0.04s per move: each alone rounds away
        s.begin_drag(0, DragMode::Start, 0.0, 100.0);
        for i in 1..=5 {
            s.drag_to(f64::from(i) * 4.0, &mut video);
        }
        s.end_drag();
        assert_close(bounds(&s, 0).0, 5.2);
    }

    #[test]
    fn test_move_drag_follows_resort() {
        let mut s = session(&[(0.0, 2.0), (10.0, 12.0)]);
        let mut video = FakeVideo::new(60.0);

        s.begin_drag(0, DragMode::Move, 0.0, 10.0);
        s.drag_to(150.0, &mut video);
        assert_eq!(s.selected(), Some(1));
        assert_eq!(bounds(&s, 1), (15.0, 17.0));

        s.drag_to(160.0, &mut video);
        s.end_drag();
        assert_eq!(bounds(&s, 1), (16.0, 18.0));
        assert_eq!(s.drag_mode(), None);
    }

    #[test]
    fn test_seek_track() {
        let mut s = session(&[]);
        let mut video = FakeVideo::new(100.0);
        s.seek_track(250.0, 1000.0, &mut video);
        assert_close(video.time, 25.0);
        s.seek_track(1500.0, 1000.0, &mut video);
        assert_close(video.time, 100.0);
    }

    #[test]
    fn test_play_rally_pauses_at_end() {
        let mut s = session(&[(5.0, 10.0)]);
        let mut video = FakeVideo::new(60.0);

        s.play_rally(0, &mut video);
        assert!(!video.paused);
        assert_close(video.time, 5.0);

        video.time = 9.9;
        assert!(!s.time_update(&mut video));
        video.time = 10.0;
        assert!(s.time_update(&mut video));
        assert!(video.paused);

        video.time = 11.0;
        assert!(!s.time_update(&mut video));
    }

    #[test]
    fn test_undo_key_fixes_selection() {
        let mut s = session(&[(0.0, 1.0)]);
        let mut video = FakeVideo::new(60.0).at(5.0);
        s.add_new(&video);
        video.time = 6.0;
        s.add_new(&video);
        assert_eq!(s.selected(), Some(1));

        s.key_down(&KeyInput::code("KeyZ").with_ctrl(), 0.0, &mut video);
        assert_eq!(s.rallies().len(), 1);
        assert_eq!(s.selected(), None);
    }
}
