//! Bulk import (pasted JSON) and export (CSV lines).

use std::fmt::Write as _;

use serde_json::Value;

use crate::rally::{self, Rally};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("object has no `rallies` array")]
    MissingRallies,
    #[error("expected an array of rallies")]
    NotAnArray,
    #[error("the rally list is empty")]
    Empty,
    #[error("item {item}: startTime and endTime must be numbers")]
    NotNumeric { item: usize },
    #[error("item {item}: times must not be negative")]
    Negative { item: usize },
    #[error("item {item}: startTime ({start}) must be less than endTime ({end})")]
    Inverted { item: usize, start: f64, end: f64 },
}

/// A validated import, ready for [`crate::RallyEditor::replace_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub rallies: Vec<Rally>,
    /// Some rally ends after the known video duration. The caller asks the
    /// user before applying.
    pub exceeds_duration: bool,
}

impl ImportOutcome {
    pub fn max_end_time(&self) -> f64 {
        self.rallies
            .iter()
            .map(|r| r.end_time)
            .fold(0.0, f64::max)
    }
}

/// Parses pasted rally JSON.
///
/// Accepts a bare array or an object with a `rallies` array. Items need
/// numeric, non-negative `startTime < endTime`; `rallyIndex` and `duration`
/// are optional. Any invalid item rejects the whole input, citing its 1-based
/// position.
pub fn parse_import(text: &str, video_duration: f64) -> Result<ImportOutcome, ImportError> {
    let parsed: Value =
        serde_json::from_str(text.trim()).map_err(|err| ImportError::Json(err.to_string()))?;

    let items = match parsed {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("rallies") {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::MissingRallies),
        },
        _ => return Err(ImportError::NotAnArray),
    };
    if items.is_empty() {
        return Err(ImportError::Empty);
    }

    let parsed = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_item(i + 1, item))
        .collect::<Result<Vec<_>, _>>()?;

    let rallies = rally::normalize(&parsed);
    let outcome = ImportOutcome {
        exceeds_duration: false,
        rallies,
    };
    let exceeds_duration = video_duration > 0.0 && outcome.max_end_time() > video_duration;
    tracing::debug!(count = outcome.rallies.len(), exceeds_duration, "import parsed");
    Ok(ImportOutcome {
        exceeds_duration,
        ..outcome
    })
}

fn parse_item(item: usize, value: &Value) -> Result<Rally, ImportError> {
    let number = |field: &str| value.get(field).and_then(Value::as_f64);

    let (Some(start), Some(end)) = (number("startTime"), number("endTime")) else {
        return Err(ImportError::NotNumeric { item });
    };
    if start < 0.0 || end < 0.0 {
        return Err(ImportError::Negative { item });
    }
    if start >= end {
        return Err(ImportError::Inverted { item, start, end });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rally_index = number("rallyIndex").map_or(item as u32, |i| i as u32);
    Ok(Rally {
        rally_index,
        start_time: start,
        end_time: end,
        duration: number("duration").unwrap_or(end - start),
    })
}

/// One `<videoId>.mp4,<start>,<end>,rally` line per rally, times to two
/// decimals.
pub fn export_csv(video_id: &str, rallies: &[Rally]) -> String {
    let mut out = String::new();
    for (i, r) in rallies.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{video_id}.mp4,{:.2},{:.2},rally", r.start_time, r.end_time);
    }
    out
}
