// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyboard shortcuts.
//!
//! Key events are routed by where keyboard focus is, given as an
//! `InputTarget` by the caller. Text fields keep their keys; everything
//! else maps to `KeyCommand`s for the app to carry out.

use egui::{Event, Key};

/// What currently owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    /// The canvas or nothing in particular
    Canvas,
    /// A text or number field is being edited
    TextField,
}

/// A shortcut, already resolved against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    PreviousFrame,
    NextFrame,
    /// `V` held: show at 100%
    ShowNormal,
    /// `V` released
    ShowScaled,
    /// `Tab` held: overlay the label mask
    ShowReference,
    /// `Tab` released
    ShowInternal,
    ClearStrokes,
}

/// Map one key transition. Arrow keys and `R` only act while editing.
pub fn map_key(target: InputTarget, key: Key, pressed: bool, repeat: bool, editing: bool) -> Option<KeyCommand> {
    if target == InputTarget::TextField {
        return None;
    }
    match (key, pressed) {
        (Key::ArrowLeft, true) if editing => Some(KeyCommand::PreviousFrame),
        (Key::ArrowRight, true) if editing => Some(KeyCommand::NextFrame),
        (Key::R, true) if editing && !repeat => Some(KeyCommand::ClearStrokes),
        (Key::V, true) if !repeat => Some(KeyCommand::ShowNormal),
        (Key::V, false) => Some(KeyCommand::ShowScaled),
        (Key::Tab, true) if !repeat => Some(KeyCommand::ShowReference),
        (Key::Tab, false) => Some(KeyCommand::ShowInternal),
        _ => None,
    }
}

/// Map every key event of a frame, in order.
pub fn key_commands(events: &[Event], target: InputTarget, editing: bool) -> Vec<KeyCommand> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key,
                pressed,
                repeat,
                ..
            } => map_key(target, *key, *pressed, *repeat, editing),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Modifiers;

    fn key(key: Key, pressed: bool) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat: false,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_arrows_only_while_editing() {
        let events = [key(Key::ArrowRight, true), key(Key::ArrowLeft, true)];
        assert!(key_commands(&events, InputTarget::Canvas, false).is_empty());
        assert_eq!(
            key_commands(&events, InputTarget::Canvas, true),
            vec![KeyCommand::NextFrame, KeyCommand::PreviousFrame]
        );
    }

    #[test]
    fn test_hold_keys() {
        let events = [
            key(Key::V, true),
            key(Key::V, false),
            key(Key::Tab, true),
            key(Key::Tab, false),
        ];
        assert_eq!(
            key_commands(&events, InputTarget::Canvas, false),
            vec![
                KeyCommand::ShowNormal,
                KeyCommand::ShowScaled,
                KeyCommand::ShowReference,
                KeyCommand::ShowInternal
            ]
        );
    }

    #[test]
    fn test_text_field_keeps_keys() {
        let events = [key(Key::R, true), key(Key::ArrowRight, true), key(Key::V, true)];
        assert!(key_commands(&events, InputTarget::TextField, true).is_empty());
    }

    #[test]
    fn test_repeat_does_not_clear_twice() {
        assert_eq!(
            map_key(InputTarget::Canvas, Key::R, true, false, true),
            Some(KeyCommand::ClearStrokes)
        );
        assert_eq!(map_key(InputTarget::Canvas, Key::R, true, true, true), None);
        assert_eq!(
            map_key(InputTarget::Canvas, Key::ArrowRight, true, true, true),
            Some(KeyCommand::NextFrame)
        );
    }
}
