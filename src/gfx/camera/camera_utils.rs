use cgmath::{perspective, Deg, Matrix4, SquareMatrix};

use super::{camera_controller::CameraController, fps_camera::FpsCamera};
use crate::input::FrameInput;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// Perspective projection; only the aspect ratio changes at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: Deg<f32>, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy,
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Zero-sized windows (minimised) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Owns the FPS camera together with its controller and projection.
pub struct CameraManager {
    pub camera: FpsCamera,
    pub controller: CameraController,
    pub projection: Projection,
    pub uniform: CameraUniform,
}

impl CameraManager {
    pub fn new(camera: FpsCamera, controller: CameraController, projection: Projection) -> Self {
        let mut manager = Self {
            camera,
            controller,
            projection,
            uniform: CameraUniform::default(),
        };
        manager.update_uniform();
        manager
    }

    /// Applies one frame of input, then refreshes the basis and the uniform.
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        self.controller.apply(&mut self.camera, input, dt);
        self.camera.update_vectors();
        self.update_uniform();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.update_uniform();
    }

    fn update_uniform(&mut self) {
        self.uniform = CameraUniform {
            view_position: self.camera.position_h(),
            view_proj: convert_matrix4_to_array(self.build_view_projection_matrix()),
        };
    }
}

impl Camera for CameraManager {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.view_matrix()
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector4};

    #[test]
    fn test_projection_keeps_aspect_when_minimised() {
        let mut projection = Projection::new(1920, 1080, Deg(90.0), 0.1, 100.0);
        assert!((projection.aspect - 16.0 / 9.0).abs() < 1e-6);

        projection.resize(0, 0);
        assert!((projection.aspect - 16.0 / 9.0).abs() < 1e-6);

        projection.resize(800, 800);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = FpsCamera::new(Point3::new(0.0, 1.0, 3.5), -90.0, -10.0, 2.0, 90.0);
        let manager = CameraManager::new(
            camera,
            CameraController::new(0.1),
            Projection::new(1280, 720, Deg(90.0), 0.1, 100.0),
        );

        let target = manager.camera.target();
        let clip = manager.build_view_projection_matrix() * Vector4::new(target.x, target.y, target.z, 1.0);
        let ndc = clip / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        // wgpu depth range
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_uniform_tracks_camera_position() {
        let camera = FpsCamera::new(Point3::new(1.0, 2.0, 3.0), 0.0, 0.0, 2.0, 90.0);
        let manager = CameraManager::new(
            camera,
            CameraController::new(0.1),
            Projection::new(100, 100, Deg(90.0), 0.1, 100.0),
        );
        assert_eq!(manager.uniform.view_position, [1.0, 2.0, 3.0, 1.0]);
    }
}
