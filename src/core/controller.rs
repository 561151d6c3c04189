/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseMiddle,
    MouseRight,
}

/// Controller - pointer and button state as seen by camera controls
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Pointer movement in pixels since the last reset
    fn pointer_delta(&self) -> (f32, f32);

    /// Wheel movement in lines since the last reset, positive scrolls up
    fn wheel_delta(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_button_equality() {
        assert_eq!(Button::MouseLeft, Button::MouseLeft);
        assert_ne!(Button::MouseLeft, Button::MouseRight);
    }

    #[test]
    fn test_button_debug() {
        assert_eq!(format!("{:?}", Button::MouseLeft), "MouseLeft");
    }

    #[test]
    fn test_all_button_variants_unique() {
        let all_buttons = [Button::MouseLeft, Button::MouseMiddle, Button::MouseRight];
        let set: HashSet<_> = all_buttons.iter().collect();
        assert_eq!(set.len(), 3);
    }

    // Test mock controller implementation
    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn pointer_delta(&self) -> (f32, f32) {
            (0.0, 0.0)
        }

        fn wheel_delta(&self) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::MouseLeft],
        };

        assert!(controller.is_down(Button::MouseLeft));
        assert!(!controller.is_down(Button::MouseRight));
    }

    #[test]
    fn test_controller_no_keys_pressed() {
        let controller = MockController { pressed: vec![] };

        assert!(!controller.is_down(Button::MouseLeft));
        assert!(!controller.is_down(Button::MouseMiddle));
    }
}
