//! Keyboard, mouse and scroll state collected between frames.
//!
//! Winit delivers events one at a time; [`InputState`] folds them into held
//! actions, edge-triggered toggles and accumulated mouse/scroll deltas. The
//! frame driver drains the accumulated state once per frame with
//! [`InputState::take_frame`].

use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::gfx::camera::fps_camera::MoveDirection;

/// Scroll pixels treated as one wheel line for touchpads
const PIXELS_PER_LINE: f64 = 40.0;

/// Everything a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Grow,
    Shrink,
    RugForward,
    RugBackward,
    RugLeft,
    RugRight,
    ToggleRug,
    ToggleRotation,
    Quit,
}

impl Action {
    /// Toggles fire once per physical press; everything else is held.
    pub fn is_toggle(self) -> bool {
        matches!(self, Action::ToggleRug | Action::ToggleRotation | Action::Quit)
    }
}

/// Default key bindings
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::KeyA => Action::LookLeft,
        KeyCode::KeyD => Action::LookRight,
        KeyCode::KeyW => Action::LookUp,
        KeyCode::KeyS => Action::LookDown,
        KeyCode::KeyI => Action::MoveForward,
        KeyCode::KeyK => Action::MoveBackward,
        KeyCode::KeyJ => Action::StrafeLeft,
        KeyCode::KeyL => Action::StrafeRight,
        KeyCode::Space => Action::Grow,
        KeyCode::ControlLeft => Action::Shrink,
        KeyCode::ArrowUp => Action::RugForward,
        KeyCode::ArrowDown => Action::RugBackward,
        KeyCode::ArrowLeft => Action::RugLeft,
        KeyCode::ArrowRight => Action::RugRight,
        KeyCode::KeyR => Action::ToggleRug,
        KeyCode::KeyC => Action::ToggleRotation,
        KeyCode::Escape => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Input gathered for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Keyboard look axis: x > 0 turns right, y > 0 looks up. Each in [-1, 1].
    pub look_axis: (f32, f32),
    /// Raw mouse motion since the last frame, in device units.
    pub mouse_delta: (f64, f64),
    pub moves: Vec<MoveDirection>,
    /// Rug axis: x and z in [-1, 1].
    pub rug_axis: (f32, f32),
    pub grow: bool,
    pub shrink: bool,
    /// Wheel lines scrolled since the last frame; positive scrolls up.
    pub scroll_lines: f32,
    pub toggle_rug: bool,
    pub toggle_rotation: bool,
    pub quit: bool,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Action>,
    pending_toggles: Vec<Action>,
    mouse_delta: (f64, f64),
    scroll_lines: f64,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(key) = event.physical_key else {
            return false;
        };
        self.handle_key(key, event.state, event.repeat)
    }

    /// Records a key transition. Returns true when the key is bound.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) -> bool {
        let Some(action) = action_for_key(key) else {
            return false;
        };

        if action.is_toggle() {
            if state == ElementState::Pressed && !repeat {
                self.pending_toggles.push(action);
            }
            return true;
        }

        match state {
            ElementState::Pressed => {
                self.held.insert(action);
            }
            ElementState::Released => {
                self.held.remove(&action);
            }
        }
        true
    }

    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta.0 += delta.0;
        self.mouse_delta.1 += delta.1;
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        self.scroll_lines += match delta {
            MouseScrollDelta::LineDelta(_, lines) => *lines as f64,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y / PIXELS_PER_LINE,
        };
    }

    /// Drops held keys, e.g. after the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Snapshots held keys and drains the accumulators and pending toggles.
    pub fn take_frame(&mut self) -> FrameInput {
        let mouse_delta = std::mem::take(&mut self.mouse_delta);
        let scroll_lines = std::mem::take(&mut self.scroll_lines) as f32;

        let axis = |neg: Action, pos: Action| -> f32 {
            (self.is_held(pos) as i32 - self.is_held(neg) as i32) as f32
        };
        let look_axis = (
            axis(Action::LookLeft, Action::LookRight),
            axis(Action::LookDown, Action::LookUp),
        );
        // Left/right arrows run against +X, matching the scene's default view.
        let rug_axis = (
            axis(Action::RugRight, Action::RugLeft),
            axis(Action::RugBackward, Action::RugForward),
        );

        let mut moves = Vec::new();
        for (action, direction) in [
            (Action::MoveForward, MoveDirection::Forward),
            (Action::MoveBackward, MoveDirection::Backward),
            (Action::StrafeLeft, MoveDirection::Left),
            (Action::StrafeRight, MoveDirection::Right),
        ] {
            if self.is_held(action) {
                moves.push(direction);
            }
        }

        let mut frame = FrameInput {
            look_axis,
            mouse_delta,
            moves,
            rug_axis,
            grow: self.is_held(Action::Grow),
            shrink: self.is_held(Action::Shrink),
            scroll_lines,
            ..Default::default()
        };

        for toggle in self.pending_toggles.drain(..) {
            match toggle {
                Action::ToggleRug => frame.toggle_rug ^= true,
                Action::ToggleRotation => frame.toggle_rotation ^= true,
                Action::Quit => frame.quit = true,
                _ => {}
            }
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputState, key: KeyCode) {
        input.handle_key(key, ElementState::Pressed, false);
    }

    fn release(input: &mut InputState, key: KeyCode) {
        input.handle_key(key, ElementState::Released, false);
    }

    #[test]
    fn test_held_keys_are_level_triggered() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyD);
        press(&mut input, KeyCode::KeyW);

        for _ in 0..3 {
            let frame = input.take_frame();
            assert_eq!(frame.look_axis, (1.0, 1.0));
        }

        release(&mut input, KeyCode::KeyD);
        assert_eq!(input.take_frame().look_axis, (0.0, 1.0));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyA);
        press(&mut input, KeyCode::KeyD);
        assert_eq!(input.take_frame().look_axis, (0.0, 0.0));
    }

    #[test]
    fn test_toggles_are_edge_triggered() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyR);
        input.handle_key(KeyCode::KeyR, ElementState::Pressed, true);
        input.handle_key(KeyCode::KeyR, ElementState::Pressed, true);

        let frame = input.take_frame();
        assert!(frame.toggle_rug);

        // Still physically held, but no new press
        assert!(!input.take_frame().toggle_rug);

        release(&mut input, KeyCode::KeyR);
        press(&mut input, KeyCode::KeyR);
        assert!(input.take_frame().toggle_rug);
    }

    #[test]
    fn test_two_presses_in_one_frame_cancel() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyC);
        release(&mut input, KeyCode::KeyC);
        press(&mut input, KeyCode::KeyC);
        assert!(!input.take_frame().toggle_rotation);
    }

    #[test]
    fn test_escape_requests_quit() {
        let mut input = InputState::new();
        assert!(!input.take_frame().quit);
        press(&mut input, KeyCode::Escape);
        assert!(input.take_frame().quit);
    }

    #[test]
    fn test_mouse_and_scroll_accumulate_then_drain() {
        let mut input = InputState::new();
        input.process_mouse_motion((3.0, -1.0));
        input.process_mouse_motion((2.0, 4.0));
        input.process_scroll(&MouseScrollDelta::LineDelta(0.0, 1.0));
        input.process_scroll(&MouseScrollDelta::LineDelta(0.0, 2.0));

        let frame = input.take_frame();
        assert_eq!(frame.mouse_delta, (5.0, 3.0));
        assert_eq!(frame.scroll_lines, 3.0);

        let frame = input.take_frame();
        assert_eq!(frame.mouse_delta, (0.0, 0.0));
        assert_eq!(frame.scroll_lines, 0.0);
    }

    #[test]
    fn test_held_keys_and_motion_in_one_frame() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyS);
        press(&mut input, KeyCode::ArrowRight);
        input.process_mouse_motion((-2.0, 1.5));
        input.process_scroll(&MouseScrollDelta::LineDelta(0.0, -1.0));

        let frame = input.take_frame();
        assert_eq!(frame.look_axis, (0.0, -1.0));
        assert_eq!(frame.rug_axis, (-1.0, 0.0));
        assert_eq!(frame.mouse_delta, (-2.0, 1.5));
        assert_eq!(frame.scroll_lines, -1.0);

        let frame = input.take_frame();
        assert_eq!(frame.look_axis, (0.0, -1.0));
        assert_eq!(frame.mouse_delta, (0.0, 0.0));
        assert_eq!(frame.scroll_lines, 0.0);
    }

    #[test]
    fn test_movement_keys_map_to_directions() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyI);
        press(&mut input, KeyCode::KeyL);
        let frame = input.take_frame();
        assert_eq!(frame.moves, vec![MoveDirection::Forward, MoveDirection::Right]);
    }

    #[test]
    fn test_rug_axis_and_scale_keys() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::ArrowLeft);
        press(&mut input, KeyCode::ArrowUp);
        press(&mut input, KeyCode::Space);
        let frame = input.take_frame();
        assert_eq!(frame.rug_axis, (1.0, 1.0));
        assert!(frame.grow);
        assert!(!frame.shrink);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut input = InputState::new();
        assert!(!input.handle_key(KeyCode::KeyZ, ElementState::Pressed, false));
        assert_eq!(input.take_frame(), FrameInput::default());
    }

    #[test]
    fn test_release_all_clears_held() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyI);
        input.release_all();
        assert!(input.take_frame().moves.is_empty());
    }
}
