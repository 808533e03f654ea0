use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, Vector3, Zero};

use super::orientation::{basis_from_angles, clamp_pitch};

/// Translation intents understood by [`FpsCamera::translate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// First-person camera driven by yaw/pitch angles in degrees.
///
/// Orientation changes (`look`, `look_by`, `set_yaw`, `set_pitch`) only touch
/// the angles. The `front`/`right`/`up` basis is recomputed by
/// [`FpsCamera::update_vectors`], which the caller runs after mutating the
/// angles and before querying `target()`/`up()` in the same frame.
#[derive(Debug, Clone, Copy)]
pub struct FpsCamera {
    position: Point3<f32>,
    velocity: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    world_up: Vector3<f32>,
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per second for a unit look input.
    pub look_speed: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 1.0, 3.5), -90.0, -10.0, 2.0, 90.0)
    }
}

impl FpsCamera {
    pub fn new(position: Point3<f32>, yaw: f32, pitch: f32, move_speed: f32, look_speed: f32) -> Self {
        let mut camera = Self {
            position,
            velocity: Vector3::zero(),
            yaw,
            pitch: clamp_pitch(pitch),
            front: Vector3::unit_x(), // Recomputed below
            right: Vector3::unit_z(),
            up: Vector3::unit_y(),
            world_up: Vector3::unit_y(),
            move_speed,
            look_speed,
        };
        camera.update_vectors();
        camera
    }

    /// Rotates the view by a look input scaled with `look_speed` and `dt`.
    ///
    /// `d_yaw` > 0 turns right, `d_pitch` > 0 looks up.
    pub fn look(&mut self, d_yaw: f32, d_pitch: f32, dt: f32) {
        self.look_by(d_yaw * self.look_speed * dt, d_pitch * self.look_speed * dt);
    }

    /// Rotates the view by raw angle deltas in degrees.
    pub fn look_by(&mut self, d_yaw_deg: f32, d_pitch_deg: f32) {
        self.set_yaw(self.yaw + d_yaw_deg);
        self.set_pitch(self.pitch + d_pitch_deg);
    }

    /// Moves the camera along its current basis at `move_speed`.
    ///
    /// The applied velocity is kept for [`FpsCamera::velocity`]; it is not
    /// integrated again on later frames.
    pub fn translate(&mut self, direction: MoveDirection, dt: f32) {
        let axis = match direction {
            MoveDirection::Forward => self.front,
            MoveDirection::Backward => -self.front,
            MoveDirection::Right => self.right,
            MoveDirection::Left => -self.right,
            MoveDirection::Up => self.world_up,
            MoveDirection::Down => -self.world_up,
        };

        self.velocity = axis * self.move_speed;
        self.position += self.velocity * dt;
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Sets the pitch, clamped to the safe range
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = clamp_pitch(pitch);
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Recomputes `front`, `right` and `up` from the current angles.
    pub fn update_vectors(&mut self) {
        let basis = basis_from_angles(Deg(self.yaw), Deg(self.pitch), self.world_up);
        self.front = basis.front;
        self.right = basis.right;
        self.up = basis.up;
    }

    /// Clears the recorded velocity; called once per frame before new input.
    pub fn clear_velocity(&mut self) {
        self.velocity = Vector3::zero();
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Look-at point one unit ahead of the camera
    pub fn target(&self) -> Point3<f32> {
        self.position + self.front
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn world_up(&self) -> Vector3<f32> {
        self.world_up
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Right-handed look-at view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target(), self.up)
    }

    /// Position as a homogeneous vector, as uploaded to shaders
    pub fn position_h(&self) -> [f32; 4] {
        let p = self.position.to_vec();
        [p.x, p.y, p.z, 1.0]
    }
}
