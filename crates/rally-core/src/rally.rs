//! Rally segments and the pure list operations over them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map from list position to the positions of every other rally whose
/// interval intersects it. Positions without an overlap are absent.
pub type OverlapMap = BTreeMap<usize, Vec<usize>>;

/// One detected play segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rally {
    /// 1-based display index, reassigned after every reorder.
    pub rally_index: u32,
    pub start_time: f64,
    pub end_time: f64,
    /// Always `end_time - start_time` once the rally has been edited.
    pub duration: f64,
}

impl Rally {
    /// Builds a rally with a derived duration. The index is assigned later
    /// by [`reindex`].
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            rally_index: 0,
            start_time,
            end_time,
            duration: end_time - start_time,
        }
    }

    /// Whether two closed intervals share more than an endpoint.
    pub fn overlaps(&self, other: &Rally) -> bool {
        other.start_time < self.end_time && other.end_time > self.start_time
    }

    /// Whether `time` lies within `[start_time, end_time]`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

/// Same as [`Rally::new`].
pub fn create(start_time: f64, end_time: f64) -> Rally {
    Rally::new(start_time, end_time)
}

/// Stable ascending sort by start time.
pub fn sort(rallies: &[Rally]) -> Vec<Rally> {
    let mut sorted = rallies.to_vec();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    sorted
}

/// Assigns `rally_index = position + 1` without reordering.
pub fn reindex(rallies: &[Rally]) -> Vec<Rally> {
    rallies
        .iter()
        .zip(1u32..)
        .map(|(rally, index)| Rally {
            rally_index: index,
            ..*rally
        })
        .collect()
}

/// Sort followed by reindex: the canonical list form.
pub fn normalize(rallies: &[Rally]) -> Vec<Rally> {
    reindex(&sort(rallies))
}

/// Returns a copy with `duration` recomputed from the bounds.
pub fn recalc_duration(rally: &Rally) -> Rally {
    Rally {
        duration: rally.end_time - rally.start_time,
        ..*rally
    }
}

/// Pairwise overlap scan.
pub fn find_overlaps(rallies: &[Rally]) -> OverlapMap {
    let mut overlaps = OverlapMap::new();

    for (i, current) in rallies.iter().enumerate() {
        let overlapping: Vec<usize> = rallies
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && current.overlaps(other))
            .map(|(j, _)| j)
            .collect();

        if !overlapping.is_empty() {
            overlaps.insert(i, overlapping);
        }
    }

    overlaps
}

/// Human-readable problems with a single rally. Empty means valid.
pub fn validate(rally: &Rally) -> Vec<String> {
    let mut errors = Vec::new();

    if rally.start_time < 0.0 {
        errors.push("Start time must be zero or greater.".to_string());
    }
    if rally.end_time <= rally.start_time {
        errors.push("End time must be greater than start time.".to_string());
    }
    if rally.duration <= 0.0 {
        errors.push("Duration must be greater than zero.".to_string());
    }

    errors
}

/// Validation errors for one list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RallyErrors {
    pub index: usize,
    pub messages: Vec<String>,
}

/// Result of [`validate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValidation {
    pub errors: Vec<RallyErrors>,
    pub overlaps: OverlapMap,
}

impl ListValidation {
    /// No per-rally errors and no overlaps.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.overlaps.is_empty()
    }
}

/// Validates every rally and collects the overlap map.
pub fn validate_all(rallies: &[Rally]) -> ListValidation {
    let errors = rallies
        .iter()
        .enumerate()
        .filter_map(|(index, rally)| {
            let messages = validate(rally);
            (!messages.is_empty()).then_some(RallyErrors { index, messages })
        })
        .collect();

    ListValidation {
        errors,
        overlaps: find_overlaps(rallies),
    }
}

/// Position of the first rally containing `time`.
pub fn rally_at(rallies: &[Rally], time: f64) -> Option<usize> {
    rallies.iter().position(|rally| rally.contains(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rally(start: f64, end: f64) -> Rally {
        Rally::new(start, end)
    }

    #[test]
    fn test_create_derives_duration() {
        let r = create(1.5, 4.0);
        assert!((r.duration - 2.5).abs() < 1e-9);
        assert_eq!(r.rally_index, 0);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut a = rally(5.0, 6.0);
        a.rally_index = 1;
        let mut b = rally(1.0, 2.0);
        b.rally_index = 2;
        let mut c = rally(5.0, 7.0);
        c.rally_index = 3;

        let sorted = sort(&[a, b, c]);
        let order: Vec<u32> = sorted.iter().map(|r| r.rally_index).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_reindex_keeps_order() {
        let list = reindex(&[rally(9.0, 10.0), rally(1.0, 2.0)]);
        assert_eq!(list[0].rally_index, 1);
        assert!((list[0].start_time - 9.0).abs() < 1e-9);
        assert_eq!(list[1].rally_index, 2);
    }

    #[test]
    fn test_recalc_duration() {
        let mut r = rally(1.0, 2.0);
        r.end_time = 5.0;
        assert!((recalc_duration(&r).duration - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_rallies_do_not_overlap() {
        let overlaps = find_overlaps(&[rally(0.0, 5.0), rally(5.0, 10.0)]);
        assert!(overlaps.is_empty());
    }

    #[test]
    fn test_overlap_is_mutual() {
        let overlaps = find_overlaps(&[rally(0.0, 5.0), rally(4.0, 10.0), rally(20.0, 25.0)]);
        assert_eq!(overlaps.get(&0), Some(&vec![1]));
        assert_eq!(overlaps.get(&1), Some(&vec![0]));
        assert!(!overlaps.contains_key(&2));
    }

    #[test]
    fn test_contained_rally_overlaps_both_ways() {
        let overlaps = find_overlaps(&[rally(0.0, 10.0), rally(2.0, 3.0), rally(4.0, 5.0)]);
        assert_eq!(overlaps.get(&0), Some(&vec![1, 2]));
        assert_eq!(overlaps.get(&1), Some(&vec![0]));
        assert_eq!(overlaps.get(&2), Some(&vec![0]));
    }

    #[test]
    fn test_validate() {
        assert!(validate(&rally(1.0, 2.0)).is_empty());

        let bad = Rally {
            rally_index: 1,
            start_time: -1.0,
            end_time: -2.0,
            duration: -1.0,
        };
        assert_eq!(validate(&bad).len(), 3);

        let inverted = rally(3.0, 3.0);
        assert_eq!(validate(&inverted).len(), 2);
    }

    #[test]
    fn test_validate_all() {
        let result = validate_all(&[rally(0.0, 5.0), rally(4.0, 3.0)]);
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].index, 1);

        assert!(validate_all(&[rally(0.0, 1.0), rally(1.0, 2.0)]).is_valid());
    }

    #[test]
    fn test_rally_at() {
        let list = [rally(0.0, 5.0), rally(10.0, 12.0)];
        assert_eq!(rally_at(&list, 5.0), Some(0));
        assert_eq!(rally_at(&list, 11.0), Some(1));
        assert_eq!(rally_at(&list, 7.0), None);
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_string(&reindex(&[rally(0.5, 1.5)])).unwrap();
        assert!(json.contains("\"rallyIndex\":1"));
        assert!(json.contains("\"startTime\":0.5"));

        let parsed: Vec<Rally> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].rally_index, 1);
    }
}
