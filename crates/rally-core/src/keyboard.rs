//! Keyboard edit controller.
//!
//! Maps physical keys to editor commands and runs the press-and-hold repeat
//! state machine. Key positions are resolved from `KeyboardEvent.code` (with
//! a legacy `keyCode` fallback) so the bindings work under any text layout.
//!
//! Repeat timing is driven by explicit timestamps: a held bound adjustment
//! fires once on key-down, stays silent for the repeat delay, then fires
//! once per repeat interval until key-up or blur. The host owns the real
//! timers and only calls [`KeyboardController::poll`] when they tick.

use crate::Millis;

/// Physical key positions the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalKey {
    A,
    D,
    Q,
    E,
    Z,
    V,
    X,
    C,
    N,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Delete,
    Backspace,
    Plus,
    Minus,
}

impl PhysicalKey {
    /// Resolves `KeyboardEvent.code`.
    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "KeyA" => Self::A,
            "KeyD" => Self::D,
            "KeyQ" => Self::Q,
            "KeyE" => Self::E,
            "KeyZ" => Self::Z,
            "KeyV" => Self::V,
            "KeyX" => Self::X,
            "KeyC" => Self::C,
            "KeyN" => Self::N,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Space" => Self::Space,
            "Delete" => Self::Delete,
            "Backspace" => Self::Backspace,
            "Equal" | "NumpadAdd" => Self::Plus,
            "Minus" | "NumpadSubtract" => Self::Minus,
            _ => return None,
        })
    }

    /// Resolves the legacy `KeyboardEvent.keyCode`.
    fn from_key_code(key_code: u32) -> Option<Self> {
        Some(match key_code {
            65 => Self::A,
            68 => Self::D,
            81 => Self::Q,
            69 => Self::E,
            90 => Self::Z,
            86 => Self::V,
            88 => Self::X,
            67 => Self::C,
            78 => Self::N,
            37 => Self::ArrowLeft,
            39 => Self::ArrowRight,
            38 => Self::ArrowUp,
            40 => Self::ArrowDown,
            32 => Self::Space,
            46 => Self::Delete,
            8 => Self::Backspace,
            187 | 107 => Self::Plus,
            189 | 109 => Self::Minus,
            _ => return None,
        })
    }

    /// Resolves the logical `KeyboardEvent.key` for keys whose position
    /// differs between layouts.
    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "=" | "+" => Self::Plus,
            "-" | "_" => Self::Minus,
            " " => Self::Space,
            _ => return None,
        })
    }
}

/// A key event as seen by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub code: String,
    pub key: String,
    pub key_code: u32,
    pub shift: bool,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    /// Focus is inside a text field.
    pub in_text_input: bool,
}

impl KeyInput {
    /// Convenience constructor from a `code` value only.
    pub fn code(code: &str) -> Self {
        Self {
            code: code.to_string(),
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Key by physical position. `key` and the legacy `keyCode` are only
    /// consulted when the browser reports no `code`, so unbound keys never
    /// borrow a binding from the letter they type.
    pub fn physical(&self) -> Option<PhysicalKey> {
        if !self.code.is_empty() && self.code != "Unidentified" {
            return PhysicalKey::from_code(&self.code);
        }
        PhysicalKey::from_key(&self.key).or_else(|| PhysicalKey::from_key_code(self.key_code))
    }
}

/// Repeatable bound or playhead adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    StartDecrease,
    StartIncrease,
    EndDecrease,
    EndIncrease,
    SeekBack,
    SeekForward,
    SeekBackFine,
    SeekForwardFine,
}

impl EditAction {
    /// Playhead moves rather than rally bound edits.
    pub fn is_seek(self) -> bool {
        matches!(
            self,
            Self::SeekBack | Self::SeekForward | Self::SeekBackFine | Self::SeekForwardFine
        )
    }
}

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// `repeat` is false for the immediate fire on key-down.
    Adjust {
        action: EditAction,
        precise: bool,
        repeat: bool,
    },
    SetStartToCurrent,
    SetEndToCurrent,
    DeleteSelected,
    SelectPrevious,
    SelectNext,
    TogglePlay,
    AddNew,
    ZoomIn,
    ZoomOut,
    Undo,
}

/// Result of a key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not an editor key; let the browser have it.
    Unhandled,
    /// An editor key with nothing to do (held key auto-repeat).
    Consumed,
    Command(KeyCommand),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveRepeat {
    action: EditAction,
    precise: bool,
    pressed_at: Millis,
    fired: u64,
}

/// Delayed-then-periodic repeat for one held action.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRepeat {
    delay: Millis,
    interval: Millis,
    active: Option<ActiveRepeat>,
}

impl KeyRepeat {
    pub fn new(delay_ms: u32, interval_ms: u32) -> Self {
        Self {
            delay: f64::from(delay_ms),
            interval: f64::from(interval_ms.max(1)),
            active: None,
        }
    }

    /// Starts repeating `action`. Returns false if it is already active.
    pub fn press(&mut self, action: EditAction, precise: bool, now: Millis) -> bool {
        if self.active.is_some_and(|a| a.action == action) {
            return false;
        }
        self.active = Some(ActiveRepeat {
            action,
            precise,
            pressed_at: now,
            fired: 0,
        });
        true
    }

    /// Number of repeats that became due since the last poll.
    ///
    /// Repeat `k` (from 1) is due at `pressed_at + delay + k * interval`.
    pub fn poll(&mut self, now: Millis) -> u64 {
        let Some(active) = self.active.as_mut() else {
            return 0;
        };
        let since_delay = now - active.pressed_at - self.delay;
        if since_delay < self.interval {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = (since_delay / self.interval).floor() as u64;
        let due = total.saturating_sub(active.fired);
        active.fired = total.max(active.fired);
        due
    }

    /// Stops the repeat. Returns whether one was running.
    pub fn release(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// The held action and its precise flag.
    pub fn active(&self) -> Option<(EditAction, bool)> {
        self.active.map(|a| (a.action, a.precise))
    }

    pub fn delay_ms(&self) -> Millis {
        self.delay
    }

    pub fn interval_ms(&self) -> Millis {
        self.interval
    }
}

/// Turns key events into [`KeyCommand`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardController {
    repeat: KeyRepeat,
    enabled: bool,
}

impl KeyboardController {
    pub fn new(repeat_delay_ms: u32, repeat_interval_ms: u32) -> Self {
        Self {
            repeat: KeyRepeat::new(repeat_delay_ms, repeat_interval_ms),
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.repeat.release();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn repeat(&self) -> &KeyRepeat {
        &self.repeat
    }

    pub fn key_down(&mut self, input: &KeyInput, now: Millis) -> KeyOutcome {
        if !self.enabled || input.in_text_input {
            return KeyOutcome::Unhandled;
        }
        let Some(key) = input.physical() else {
            return KeyOutcome::Unhandled;
        };

        // Browser shortcuts other than undo stay with the browser.
        if input.ctrl {
            return if key == PhysicalKey::Z {
                KeyOutcome::Command(KeyCommand::Undo)
            } else {
                KeyOutcome::Unhandled
            };
        }

        if let Some(action) = repeatable_action(key) {
            if !self.repeat.press(action, input.shift, now) {
                return KeyOutcome::Consumed;
            }
            tracing::trace!(?action, precise = input.shift, "repeat started");
            return KeyOutcome::Command(KeyCommand::Adjust {
                action,
                precise: input.shift,
                repeat: false,
            });
        }

        let command = match key {
            PhysicalKey::Q => KeyCommand::SetStartToCurrent,
            PhysicalKey::E => KeyCommand::SetEndToCurrent,
            PhysicalKey::Delete | PhysicalKey::Backspace => KeyCommand::DeleteSelected,
            PhysicalKey::ArrowUp => KeyCommand::SelectPrevious,
            PhysicalKey::ArrowDown => KeyCommand::SelectNext,
            PhysicalKey::Space => KeyCommand::TogglePlay,
            PhysicalKey::N => KeyCommand::AddNew,
            PhysicalKey::Plus => KeyCommand::ZoomIn,
            PhysicalKey::Minus => KeyCommand::ZoomOut,
            _ => return KeyOutcome::Unhandled,
        };
        KeyOutcome::Command(command)
    }

    /// Any key-up ends the active repeat, whichever key it was.
    pub fn key_up(&mut self) -> bool {
        self.release()
    }

    /// Focus loss ends the active repeat.
    pub fn blur(&mut self) -> bool {
        self.release()
    }

    /// Repeat commands that became due since the last poll.
    pub fn poll(&mut self, now: Millis) -> Vec<KeyCommand> {
        let Some((action, precise)) = self.repeat.active() else {
            return Vec::new();
        };
        let due = self.repeat.poll(now);
        (0..due)
            .map(|_| KeyCommand::Adjust {
                action,
                precise,
                repeat: true,
            })
            .collect()
    }

    fn release(&mut self) -> bool {
        let released = self.repeat.release();
        if released {
            tracing::trace!("repeat released");
        }
        released
    }
}

fn repeatable_action(key: PhysicalKey) -> Option<EditAction> {
    Some(match key {
        PhysicalKey::A => EditAction::StartDecrease,
        PhysicalKey::D => EditAction::StartIncrease,
        PhysicalKey::ArrowLeft => EditAction::EndDecrease,
        PhysicalKey::ArrowRight => EditAction::EndIncrease,
        PhysicalKey::Z => EditAction::SeekBack,
        PhysicalKey::V => EditAction::SeekForward,
        PhysicalKey::X => EditAction::SeekBackFine,
        PhysicalKey::C => EditAction::SeekForwardFine,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> KeyboardController {
        KeyboardController::new(300, 50)
    }

    fn adjust(action: EditAction, repeat: bool) -> KeyOutcome {
        KeyOutcome::Command(KeyCommand::Adjust {
            action,
            precise: false,
            repeat,
        })
    }

    #[test]
    fn test_physical_key_resolution() {
        assert_eq!(KeyInput::code("KeyA").physical(), Some(PhysicalKey::A));

        // Korean layout: code still resolves, key would be 'ㅁ'
        let input = KeyInput {
            code: "KeyD".to_string(),
            key: "ㅇ".to_string(),
            ..KeyInput::default()
        };
        assert_eq!(input.physical(), Some(PhysicalKey::D));

        // Legacy keyCode fallback
        let input = KeyInput {
            key_code: 81,
            ..KeyInput::default()
        };
        assert_eq!(input.physical(), Some(PhysicalKey::Q));

        let input = KeyInput {
            key: "+".to_string(),
            ..KeyInput::default()
        };
        assert_eq!(input.physical(), Some(PhysicalKey::Plus));

        let input = KeyInput {
            code: "Unidentified".to_string(),
            key_code: 78,
            ..KeyInput::default()
        };
        assert_eq!(input.physical(), Some(PhysicalKey::N));
    }

    #[test]
    fn test_unbound_code_ignores_typed_letter() {
        // AZERTY: the key in the W position types 'z'
        let input = KeyInput {
            code: "KeyW".to_string(),
            key: "z".to_string(),
            key_code: 90,
            ..KeyInput::default()
        };
        assert_eq!(input.physical(), None);
        assert_eq!(controller().key_down(&input, 0.0), KeyOutcome::Unhandled);
    }

    #[test]
    fn test_hold_repeats_after_delay() {
        let mut kb = controller();

        assert_eq!(
            kb.key_down(&KeyInput::code("KeyA"), 0.0),
            adjust(EditAction::StartDecrease, false)
        );

        // Silence through the initial delay plus one interval
        assert!(kb.poll(100.0).is_empty());
        assert!(kb.poll(300.0).is_empty());
        assert!(kb.poll(349.0).is_empty());

        // Then one per 50ms
        assert_eq!(kb.poll(350.0).len(), 1);
        assert_eq!(kb.poll(399.0).len(), 0);
        assert_eq!(kb.poll(400.0).len(), 1);
        assert_eq!(kb.poll(500.0).len(), 2);

        assert!(kb.key_up());
        assert!(kb.poll(1000.0).is_empty());
    }

    #[test]
    fn test_os_autorepeat_is_suppressed() {
        let mut kb = controller();
        let a = KeyInput::code("KeyA");

        assert!(matches!(kb.key_down(&a, 0.0), KeyOutcome::Command(_)));
        assert_eq!(kb.key_down(&a, 30.0), KeyOutcome::Consumed);
        assert_eq!(kb.key_down(&a, 60.0), KeyOutcome::Consumed);

        // The original press time still governs the schedule
        assert_eq!(kb.poll(350.0).len(), 1);
    }

    #[test]
    fn test_new_action_replaces_active_one() {
        let mut kb = controller();
        kb.key_down(&KeyInput::code("KeyA"), 0.0);
        assert_eq!(
            kb.key_down(&KeyInput::code("KeyD"), 200.0),
            adjust(EditAction::StartIncrease, false)
        );
        assert!(kb.poll(500.0).is_empty());
        assert_eq!(
            kb.poll(550.0),
            vec![KeyCommand::Adjust {
                action: EditAction::StartIncrease,
                precise: false,
                repeat: true
            }]
        );
    }

    #[test]
    fn test_blur_cancels_repeat() {
        let mut kb = controller();
        kb.key_down(&KeyInput::code("ArrowRight"), 0.0);
        assert!(kb.blur());
        assert!(!kb.blur());
        assert!(kb.poll(10_000.0).is_empty());
    }

    #[test]
    fn test_shift_selects_precise_step() {
        let mut kb = controller();
        let outcome = kb.key_down(&KeyInput::code("ArrowLeft").with_shift(), 0.0);
        assert_eq!(
            outcome,
            KeyOutcome::Command(KeyCommand::Adjust {
                action: EditAction::EndDecrease,
                precise: true,
                repeat: false
            })
        );
        assert!(matches!(
            kb.poll(350.0)[0],
            KeyCommand::Adjust { precise: true, .. }
        ));
    }

    #[test]
    fn test_single_shot_commands() {
        let mut kb = controller();
        let cases = [
            ("KeyQ", KeyCommand::SetStartToCurrent),
            ("KeyE", KeyCommand::SetEndToCurrent),
            ("Delete", KeyCommand::DeleteSelected),
            ("Backspace", KeyCommand::DeleteSelected),
            ("ArrowUp", KeyCommand::SelectPrevious),
            ("ArrowDown", KeyCommand::SelectNext),
            ("Space", KeyCommand::TogglePlay),
            ("KeyN", KeyCommand::AddNew),
            ("Equal", KeyCommand::ZoomIn),
            ("Minus", KeyCommand::ZoomOut),
        ];
        for (code, expected) in cases {
            assert_eq!(
                kb.key_down(&KeyInput::code(code), 0.0),
                KeyOutcome::Command(expected),
                "{code}"
            );
        }
        assert!(kb.repeat().active().is_none());
    }

    #[test]
    fn test_ctrl_keys() {
        let mut kb = controller();
        assert_eq!(
            kb.key_down(&KeyInput::code("KeyZ").with_ctrl(), 0.0),
            KeyOutcome::Command(KeyCommand::Undo)
        );
        assert_eq!(
            kb.key_down(&KeyInput::code("KeyC").with_ctrl(), 0.0),
            KeyOutcome::Unhandled
        );
        assert!(kb.repeat().active().is_none());
    }

    #[test]
    fn test_ignored_inputs() {
        let mut kb = controller();
        let mut typing = KeyInput::code("KeyA");
        typing.in_text_input = true;
        assert_eq!(kb.key_down(&typing, 0.0), KeyOutcome::Unhandled);
        assert_eq!(kb.key_down(&KeyInput::code("KeyP"), 0.0), KeyOutcome::Unhandled);

        kb.set_enabled(false);
        assert_eq!(kb.key_down(&KeyInput::code("KeyA"), 0.0), KeyOutcome::Unhandled);
    }

    #[test]
    fn test_seek_actions() {
        assert!(EditAction::SeekBackFine.is_seek());
        assert!(!EditAction::EndIncrease.is_seek());
        assert_eq!(repeatable_action(PhysicalKey::C), Some(EditAction::SeekForwardFine));
    }
}
