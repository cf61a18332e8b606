//! Hook for the persisted editor tunables.

use rally_core::EditorConfig;
use yew::prelude::*;

use crate::hooks::use_localstorage;

const CONFIG_EDITOR_KEY: &str = "$rally-viewer$/config/editor";

#[hook]
pub fn use_editor_config() -> UseStateHandle<EditorConfig> {
    use_localstorage(CONFIG_EDITOR_KEY, EditorConfig::default)
}
