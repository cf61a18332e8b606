//! UI components.

pub mod modal;
pub mod rally_list;
pub mod status_badge;
pub mod timeline;
pub mod video_player;
pub mod workspace;

pub use modal::Modal;
pub use rally_list::RallyList;
pub use status_badge::StatusBadge;
pub use timeline::TimelineEditor;
pub use video_player::VideoPlayer;
pub use workspace::RallyWorkspace;
