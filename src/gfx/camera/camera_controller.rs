use super::fps_camera::FpsCamera;
use crate::input::FrameInput;

/// Turns per-frame input into camera motion.
pub struct CameraController {
    /// Degrees of rotation per unit of raw mouse motion.
    pub mouse_sensitivity: f32,
    /// Screen-space mouse y grows downwards; flip to look up when moving up.
    pub invert_mouse_y: bool,
}

impl CameraController {
    pub fn new(mouse_sensitivity: f32) -> Self {
        Self {
            mouse_sensitivity,
            invert_mouse_y: false,
        }
    }

    /// Applies look and translation for one frame.
    ///
    /// The basis is not refreshed here; the caller runs
    /// [`FpsCamera::update_vectors`] once all mutations are in.
    pub fn apply(&self, camera: &mut FpsCamera, input: &FrameInput, dt: f32) {
        camera.clear_velocity();

        let (look_x, look_y) = input.look_axis;
        if look_x != 0.0 || look_y != 0.0 {
            camera.look(look_x, look_y, dt);
        }

        let (dx, dy) = input.mouse_delta;
        if dx != 0.0 || dy != 0.0 {
            let sign = if self.invert_mouse_y { 1.0 } else { -1.0 };
            camera.look_by(
                dx as f32 * self.mouse_sensitivity,
                sign * dy as f32 * self.mouse_sensitivity,
            );
        }

        // Keyboard look may have moved the basis; translate along the fresh one.
        if !input.moves.is_empty() {
            camera.update_vectors();
            for &direction in &input.moves {
                camera.translate(direction, dt);
            }
        }
    }
}
