pub mod camera_controller;
pub mod camera_utils;
pub mod fps_camera;
pub mod orientation;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{CameraManager, CameraUniform, Projection};
pub use fps_camera::{FpsCamera, MoveDirection};
