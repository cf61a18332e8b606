//! Rally editor: the single owner of the live rally list.
//!
//! Every mutation leaves the list sorted by start time, densely reindexed
//! from 1, with durations and the overlap map recomputed before returning.
//! Discrete operations push the pre-mutation list onto a bounded undo
//! history; live operations (drag motion, key repeat) do not, and rely on a
//! single [`RallyEditor::begin_edit`] at gesture start.

use std::collections::VecDeque;

use crate::rally::{self, OverlapMap, Rally};
use crate::time::round_time;

/// Default number of snapshots kept by [`UndoHistory`].
pub const MAX_UNDO_STEPS: usize = 20;

/// Requested bound changes for one rally. `None` leaves the bound alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RallyPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl RallyPatch {
    pub fn start(start_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: None,
        }
    }

    pub fn end(end_time: f64) -> Self {
        Self {
            start_time: None,
            end_time: Some(end_time),
        }
    }

    pub fn both(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    /// Applies the patch with one-decimal rounding and a fresh duration.
    fn apply(self, rally: &Rally) -> Rally {
        let patched = Rally {
            start_time: self.start_time.map_or(rally.start_time, round_time),
            end_time: self.end_time.map_or(rally.end_time, round_time),
            ..*rally
        };
        rally::recalc_duration(&patched)
    }
}

/// Bounded LIFO of full list snapshots. The oldest entry is evicted once the
/// limit is exceeded.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoHistory {
    entries: VecDeque<Vec<Rally>>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(MAX_UNDO_STEPS)
    }
}

impl UndoHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, snapshot: Vec<Rally>) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<Vec<Rally>> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Editing session state for one loaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct RallyEditor {
    rallies: Vec<Rally>,
    original: Vec<Rally>,
    history: UndoHistory,
    overlaps: OverlapMap,
    revision: u64,
}

impl RallyEditor {
    /// Starts a session from the rallies reported by the analysis service.
    pub fn new(initial: Vec<Rally>) -> Self {
        Self::with_undo_limit(initial, MAX_UNDO_STEPS)
    }

    /// The server list is normalized up front, so it is canonical before the
    /// first edit and `has_changes` compares against the same order.
    pub fn with_undo_limit(initial: Vec<Rally>, undo_limit: usize) -> Self {
        let initial = rally::normalize(&initial);
        let overlaps = rally::find_overlaps(&initial);
        Self {
            rallies: initial.clone(),
            original: initial,
            history: UndoHistory::new(undo_limit),
            overlaps,
            revision: 0,
        }
    }

    pub fn rallies(&self) -> &[Rally] {
        &self.rallies
    }

    pub fn original(&self) -> &[Rally] {
        &self.original
    }

    pub fn overlaps(&self) -> &OverlapMap {
        &self.overlaps
    }

    pub fn get(&self, index: usize) -> Option<&Rally> {
        self.rallies.get(index)
    }

    pub fn len(&self) -> usize {
        self.rallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rallies.is_empty()
    }

    /// Bumped on every applied change to the list; observers compare it
    /// instead of the list itself.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Owned copy of the current list.
    pub fn apply_changes(&self) -> Vec<Rally> {
        self.rallies.clone()
    }

    /// Positional comparison against the original snapshot.
    pub fn has_changes(&self) -> bool {
        self.rallies.len() != self.original.len()
            || self
                .rallies
                .iter()
                .zip(&self.original)
                .any(|(current, original)| {
                    current.start_time != original.start_time
                        || current.end_time != original.end_time
                })
    }

    /// Adds a rally. Callers validate `start < end` beforehand.
    pub fn add(&mut self, start_time: f64, end_time: f64) {
        self.push_undo();
        let mut next = self.rallies.clone();
        next.push(rally::create(round_time(start_time), round_time(end_time)));
        self.commit(rally::normalize(&next));
        tracing::debug!(start_time, end_time, count = self.rallies.len(), "rally added");
    }

    /// Removes the rally at `index`. Out-of-range indices are ignored.
    pub fn delete(&mut self, index: usize) -> bool {
        if index >= self.rallies.len() {
            return false;
        }
        self.push_undo();
        let mut next = self.rallies.clone();
        next.remove(index);
        self.commit(rally::reindex(&next));
        tracing::debug!(index, count = self.rallies.len(), "rally deleted");
        true
    }

    /// Discrete bound edit: one undo entry per call.
    ///
    /// Returns the rally's position after re-sorting, or `None` if `index`
    /// is out of range.
    pub fn update(&mut self, index: usize, patch: RallyPatch) -> Option<usize> {
        if index >= self.rallies.len() {
            return None;
        }
        self.push_undo();
        Some(self.apply_patch(index, patch))
    }

    /// Continuous bound edit: never touches the undo history.
    pub fn update_live(&mut self, index: usize, patch: RallyPatch) -> Option<usize> {
        if index >= self.rallies.len() {
            return None;
        }
        Some(self.apply_patch(index, patch))
    }

    /// Records the current list once before a live gesture.
    pub fn begin_edit(&mut self) {
        self.push_undo();
    }

    /// Replaces the whole list with a normalized copy of `rallies`.
    pub fn replace_all(&mut self, rallies: &[Rally]) {
        self.push_undo();
        let recomputed: Vec<Rally> = rallies.iter().map(rally::recalc_duration).collect();
        self.commit(rally::normalize(&recomputed));
        tracing::debug!(count = self.rallies.len(), "rally list replaced");
    }

    /// Restores the state before the most recent discrete operation.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.commit(previous);
        tracing::debug!(remaining = self.history.len(), "undo");
        true
    }

    /// Drops every edit and returns to the original snapshot.
    pub fn revert_all(&mut self) {
        self.history.clear();
        self.commit(self.original.clone());
        tracing::debug!("reverted to original rallies");
    }

    fn push_undo(&mut self) {
        self.history.push(self.rallies.clone());
    }

    fn apply_patch(&mut self, index: usize, patch: RallyPatch) -> usize {
        let mut patched = self.rallies.clone();
        patched[index] = patch.apply(&patched[index]);

        // Stable sort of positions so the edited rally can be followed.
        let mut order: Vec<usize> = (0..patched.len()).collect();
        order.sort_by(|&a, &b| patched[a].start_time.total_cmp(&patched[b].start_time));
        let position = order.iter().position(|&i| i == index).unwrap_or(index);

        let sorted: Vec<Rally> = order.iter().map(|&i| patched[i]).collect();
        self.commit(rally::reindex(&sorted));
        position
    }

    fn commit(&mut self, rallies: Vec<Rally>) {
        self.overlaps = rally::find_overlaps(&rallies);
        self.rallies = rallies;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(bounds: &[(f64, f64)]) -> RallyEditor {
        let list: Vec<Rally> = bounds.iter().map(|&(s, e)| Rally::new(s, e)).collect();
        RallyEditor::new(rally::reindex(&list))
    }

    fn assert_canonical(editor: &RallyEditor) {
        for (i, r) in editor.rallies().iter().enumerate() {
            assert_eq!(r.rally_index as usize, i + 1);
            assert!((r.duration - (r.end_time - r.start_time)).abs() < 1e-9);
        }
        for pair in editor.rallies().windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
        }
    }

    #[test]
    fn test_add_sorts_and_reindexes() {
        let mut ed = editor(&[(10.0, 20.0), (30.0, 40.0)]);
        ed.add(0.04, 5.26);

        assert_eq!(ed.len(), 3);
        let first = ed.get(0).unwrap();
        assert!((first.start_time - 0.0).abs() < 1e-9);
        assert!((first.end_time - 5.3).abs() < 1e-9);
        assert_eq!(ed.undo_depth(), 1);
        assert_canonical(&ed);
    }

    #[test]
    fn test_delete_reindexes() {
        let mut ed = editor(&[(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
        assert!(ed.delete(0));
        assert_eq!(ed.len(), 2);
        assert!((ed.get(0).unwrap().start_time - 2.0).abs() < 1e-9);
        assert_canonical(&ed);

        assert!(!ed.delete(10));
        assert_eq!(ed.undo_depth(), 1);
    }

    #[test]
    fn test_update_resorts() {
        let mut ed = editor(&[(0.0, 5.0), (10.0, 15.0)]);
        ed.update(0, RallyPatch::both(12.0, 18.0));

        assert!((ed.get(0).unwrap().start_time - 10.0).abs() < 1e-9);
        assert!((ed.get(1).unwrap().start_time - 12.0).abs() < 1e-9);
        assert!((ed.get(1).unwrap().duration - 6.0).abs() < 1e-9);
        assert_eq!(ed.overlaps().get(&0), Some(&vec![1]));
        assert_canonical(&ed);
    }

    #[test]
    fn test_update_reports_new_position() {
        let mut ed = editor(&[(0.0, 5.0), (10.0, 15.0), (20.0, 25.0)]);
        assert_eq!(ed.update(0, RallyPatch::both(21.0, 22.0)), Some(2));
        assert_eq!(ed.update_live(2, RallyPatch::end(23.0)), Some(2));
        assert_eq!(ed.update_live(1, RallyPatch::start(0.5)), Some(0));
    }

    #[test]
    fn test_update_rounds_to_one_decimal() {
        let mut ed = editor(&[(0.0, 5.0)]);
        ed.update(0, RallyPatch::end(5.149_999));
        assert!((ed.get(0).unwrap().end_time - 5.1).abs() < 1e-9);
    }

    #[test]
    fn test_undo_restores_exact_state() {
        let mut ed = editor(&[(0.0, 5.0), (10.0, 15.0)]);
        let before = ed.apply_changes();

        ed.update(1, RallyPatch::start(2.0));
        assert_ne!(ed.rallies(), before.as_slice());

        assert!(ed.undo());
        assert_eq!(ed.rallies(), before.as_slice());
        assert!(!ed.undo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut ed = editor(&[(0.0, 100.0)]);
        let mut states = vec![ed.apply_changes()];
        for i in 1..=25 {
            ed.update(0, RallyPatch::end(100.0 + f64::from(i)));
            states.push(ed.apply_changes());
        }
        assert_eq!(ed.undo_depth(), MAX_UNDO_STEPS);

        let mut undone = 0;
        while ed.undo() {
            undone += 1;
            assert_eq!(ed.rallies(), states[25 - undone].as_slice());
        }
        assert_eq!(undone, MAX_UNDO_STEPS);
        // The five oldest pre-states are gone.
        assert_eq!(ed.rallies(), states[5].as_slice());
    }

    #[test]
    fn test_live_updates_do_not_grow_history() {
        let mut ed = editor(&[(0.0, 5.0)]);
        ed.begin_edit();
        for i in 1..=10 {
            ed.update_live(0, RallyPatch::end(5.0 + f64::from(i) * 0.1));
        }
        assert_eq!(ed.undo_depth(), 1);
        assert!((ed.get(0).unwrap().end_time - 6.0).abs() < 1e-9);

        ed.undo();
        assert!((ed.get(0).unwrap().end_time - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_replace_all_normalizes() {
        let mut ed = editor(&[(0.0, 1.0)]);
        let mut incoming = vec![Rally::new(8.0, 9.0), Rally::new(2.0, 3.0)];
        incoming[0].duration = 99.0;
        ed.replace_all(&incoming);

        assert_eq!(ed.len(), 2);
        assert!((ed.get(0).unwrap().start_time - 2.0).abs() < 1e-9);
        assert_canonical(&ed);
        assert!(ed.can_undo());
    }

    #[test]
    fn test_revert_all_clears_history() {
        let mut ed = editor(&[(0.0, 1.0), (2.0, 3.0)]);
        ed.delete(0);
        ed.add(5.0, 6.0);
        assert!(ed.has_changes());

        ed.revert_all();
        assert_eq!(ed.rallies(), ed.original());
        assert!(!ed.can_undo());
        assert!(!ed.has_changes());
    }

    #[test]
    fn test_unsorted_server_list_is_normalized() {
        let list = vec![Rally::new(30.0, 40.0), Rally::new(10.0, 20.0)];
        let ed = RallyEditor::new(list);

        assert_canonical(&ed);
        assert!((ed.rallies()[0].start_time - 10.0).abs() < 1e-9);
        assert_eq!(ed.original(), ed.rallies());
        assert!(!ed.has_changes());
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_has_changes_is_positional() {
        let mut ed = editor(&[(0.0, 1.0), (2.0, 3.0)]);
        assert!(!ed.has_changes());

        ed.update(0, RallyPatch::end(1.5));
        assert!(ed.has_changes());

        ed.update(0, RallyPatch::end(1.0));
        assert!(!ed.has_changes());
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut ed = editor(&[(0.0, 1.0)]);
        assert_eq!(ed.revision(), 0);
        ed.update_live(0, RallyPatch::end(2.0));
        ed.undo();
        assert_eq!(ed.revision(), 1);

        ed.begin_edit();
        ed.undo();
        assert_eq!(ed.revision(), 2);

        assert!(ed.update(5, RallyPatch::end(1.0)).is_none());
        assert_eq!(ed.revision(), 2);
    }
}
