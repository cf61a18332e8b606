//! Rally-Viewer Core Library
//!
//! Timeline editing engine for rally segments detected in a video.
//!
//! Everything here is browser-independent: timers are modelled as
//! timestamp-driven state machines and the video element and local storage
//! are reached through small capability traits, so the whole engine runs
//! under native tests.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod autosave;
pub mod config;
pub mod drag;
pub mod editor;
pub mod keyboard;
pub mod rally;
pub mod session;
pub mod time;
pub mod transfer;
pub mod video;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::{AnalysisRequest, AnalysisResponse, AnalysisStatus};
pub use autosave::{AutoSave, DraftRecord, DraftStorage, StorageError};
pub use config::{ApiConfig, EditorConfig};
pub use drag::{DragMode, DragTracker};
pub use editor::{RallyEditor, RallyPatch, UndoHistory};
pub use keyboard::{EditAction, KeyCommand, KeyInput, KeyOutcome, KeyRepeat, KeyboardController};
pub use rally::{OverlapMap, Rally};
pub use session::{AddRallyState, KeyResponse, TimelineSession};
pub use transfer::{ImportError, ImportOutcome};
pub use video::VideoPlayback;

/// Milliseconds on the host clock (`Date.now()` in the browser, a manual
/// counter in tests).
pub type Millis = f64;
