// Keyboard-to-controller mapping
//
// Translates winit key events into pad-1 button state. The binding
// follows the usual emulator convention: Z/X for B/A, Space for Select,
// Enter for Start, arrows for the D-pad.

use winit::keyboard::{KeyCode, PhysicalKey};

use super::Controller;

/// Key binding for one controller
#[derive(Debug, Clone, Copy)]
pub struct KeyboardMapping {
    pub a: KeyCode,
    pub b: KeyCode,
    pub select: KeyCode,
    pub start: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for KeyboardMapping {
    fn default() -> Self {
        KeyboardMapping {
            a: KeyCode::KeyX,
            b: KeyCode::KeyZ,
            select: KeyCode::Space,
            start: KeyCode::Enter,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
        }
    }
}

impl KeyboardMapping {
    /// Apply a key transition to the pad. Returns true when the key was
    /// one of ours.
    pub fn apply(&self, physical_key: PhysicalKey, pressed: bool, pad: &mut Controller) -> bool {
        let PhysicalKey::Code(code) = physical_key else {
            return false;
        };

        match code {
            c if c == self.a => pad.a = pressed,
            c if c == self.b => pad.b = pressed,
            c if c == self.select => pad.select = pressed,
            c if c == self.start => pad.start = pressed,
            c if c == self.up => pad.up = pressed,
            c if c == self.down => pad.down = pressed,
            c if c == self.left => pad.left = pressed,
            c if c == self.right => pad.right = pressed,
            _ => return false,
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binding_applies() {
        let mapping = KeyboardMapping::default();
        let mut pad = Controller::new();

        assert!(mapping.apply(PhysicalKey::Code(KeyCode::KeyX), true, &mut pad));
        assert!(pad.a);

        assert!(mapping.apply(PhysicalKey::Code(KeyCode::ArrowLeft), true, &mut pad));
        assert!(pad.left);

        assert!(mapping.apply(PhysicalKey::Code(KeyCode::KeyX), false, &mut pad));
        assert!(!pad.a);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mapping = KeyboardMapping::default();
        let mut pad = Controller::new();

        assert!(!mapping.apply(PhysicalKey::Code(KeyCode::KeyQ), true, &mut pad));
        assert_eq!(pad, Controller::new());
    }
}
