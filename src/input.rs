//! Keyboard bindings.
//!
//! Held keys become `Movement` flags; everything else is a one-shot
//! `Command` applied between frames.

use winit::keyboard::KeyCode;

/// Camera translation bound to a held key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Discrete action triggered by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleWireframe,
    ToggleLightTexture,
    ToggleKeyLight,
    ToggleFullscreen,
    IncreaseLevel,
    DecreaseLevel,
    ExpandRadii,
    ShrinkRadii,
    Exit,
}

impl Command {
    /// Whether OS key-repeat events should fire the command again
    pub fn repeats(self) -> bool {
        matches!(
            self,
            Command::IncreaseLevel
                | Command::DecreaseLevel
                | Command::ExpandRadii
                | Command::ShrinkRadii
        )
    }
}

pub fn movement_for_key(key: KeyCode) -> Option<Movement> {
    match key {
        KeyCode::KeyW => Some(Movement::Forward),
        KeyCode::KeyS => Some(Movement::Backward),
        KeyCode::KeyA => Some(Movement::Left),
        KeyCode::KeyD => Some(Movement::Right),
        KeyCode::Space => Some(Movement::Up),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Movement::Down),
        _ => None,
    }
}

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::KeyT => Some(Command::ToggleWireframe),
        KeyCode::KeyL => Some(Command::ToggleLightTexture),
        KeyCode::KeyK => Some(Command::ToggleKeyLight),
        KeyCode::F1 => Some(Command::ToggleFullscreen),
        KeyCode::ArrowRight => Some(Command::IncreaseLevel),
        KeyCode::ArrowLeft => Some(Command::DecreaseLevel),
        KeyCode::ArrowUp => Some(Command::ExpandRadii),
        KeyCode::ArrowDown => Some(Command::ShrinkRadii),
        KeyCode::Escape => Some(Command::Exit),
        _ => None,
    }
}

/// Command for a pressed key, dropping repeats of toggles
pub fn command_for_press(key: KeyCode, repeat: bool) -> Option<Command> {
    command_for_key(key).filter(|command| !repeat || command.repeats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_bindings() {
        assert_eq!(movement_for_key(KeyCode::KeyW), Some(Movement::Forward));
        assert_eq!(movement_for_key(KeyCode::ShiftRight), Some(Movement::Down));
        assert_eq!(movement_for_key(KeyCode::Space), Some(Movement::Up));
        assert_eq!(movement_for_key(KeyCode::KeyT), None);
    }

    #[test]
    fn test_arrow_keys_drive_lod() {
        assert_eq!(command_for_key(KeyCode::ArrowLeft), Some(Command::DecreaseLevel));
        assert_eq!(command_for_key(KeyCode::ArrowRight), Some(Command::IncreaseLevel));
        assert_eq!(command_for_key(KeyCode::ArrowUp), Some(Command::ExpandRadii));
        assert_eq!(command_for_key(KeyCode::ArrowDown), Some(Command::ShrinkRadii));
    }

    #[test]
    fn test_toggles_ignore_key_repeat() {
        assert_eq!(
            command_for_press(KeyCode::KeyT, false),
            Some(Command::ToggleWireframe)
        );
        assert_eq!(command_for_press(KeyCode::KeyT, true), None);
        assert_eq!(command_for_press(KeyCode::KeyL, true), None);
        assert_eq!(
            command_for_press(KeyCode::ArrowRight, true),
            Some(Command::IncreaseLevel)
        );
    }

    #[test]
    fn test_movement_and_commands_do_not_overlap() {
        for key in [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::Space,
            KeyCode::ShiftLeft,
        ] {
            assert!(command_for_key(key).is_none(), "{key:?}");
        }
    }
}
