mod use_analysis;
mod use_autosave;
mod use_drag_resize;
mod use_editor_config;
mod use_keyboard_edit;
mod use_localstorage;
mod use_querystring;
mod use_timeline_session;

pub use use_analysis::*;
pub use use_autosave::*;
pub use use_drag_resize::*;
pub use use_editor_config::use_editor_config;
pub use use_keyboard_edit::use_keyboard_edit;
pub use use_localstorage::use_localstorage;
pub use use_querystring::use_querystring;
pub use use_timeline_session::*;
