use cgmath::{Deg, Point3};
use wgpu::Device;

use super::{
    assets::SceneAssets,
    cloth::Cloth,
    layout::{build_layout, root_transform, DrawCommand, LayoutParams},
    lights::LightRig,
    player::{PlayerState, SceneScale},
};
use crate::{
    config::AppConfig,
    error::Result,
    gfx::camera::{CameraController, CameraManager, FpsCamera, Projection},
    input::FrameInput,
};

/// Period of the rotation angle in degrees.
///
/// Stars turn at 5x and bees at -2.5x the angle, so wrapping at 720 keeps
/// every derived angle continuous.
const ROTATION_PERIOD_DEG: f32 = 720.0;

/// Animated scene state: camera, clocks, toggles, rug and scale
pub struct Scene {
    pub camera_manager: CameraManager,
    pub player: PlayerState,
    pub scale: SceneScale,
    pub cloth: Cloth,
    /// Loaded GPU assets; `None` until [`Scene::init_gpu_resources`] ran
    pub assets: Option<SceneAssets>,
    time: f32,
    cloth_time: f32,
    rotation_deg: f32,
    rotation_speed: f32,
    rug_speed: f32,
    rotating: bool,
    rug_moving: bool,
}

impl Scene {
    pub fn new(
        camera_manager: CameraManager,
        player: PlayerState,
        scale: SceneScale,
        cloth: Cloth,
    ) -> Self {
        Self {
            camera_manager,
            player,
            scale,
            cloth,
            assets: None,
            time: 0.0,
            cloth_time: 0.0,
            rotation_deg: 0.0,
            rotation_speed: 24.0,
            rug_speed: 7.2,
            rotating: false,
            rug_moving: true,
        }
    }

    /// Builds the scene and its camera from configuration.
    pub fn from_config(config: &AppConfig, width: u32, height: u32) -> Self {
        let cam = &config.camera;
        let player = PlayerState {
            height: config.player.height,
        };

        let camera = FpsCamera::new(
            Point3::new(cam.spawn[0], player.height, cam.spawn[1]),
            cam.yaw,
            cam.pitch,
            cam.move_speed,
            cam.look_speed,
        );
        let mut controller = CameraController::new(cam.mouse_sensitivity);
        controller.invert_mouse_y = cam.invert_mouse_y;
        let projection = Projection::new(width, height, Deg(cam.fov_deg), cam.znear, cam.zfar);

        let s = &config.scene;
        let mut scene = Self::new(
            CameraManager::new(camera, controller, projection),
            player,
            SceneScale::new(s.scale_step, s.scale_min, s.scale_max),
            Cloth::new(s.rug_origin),
        );
        scene.rotation_speed = s.rotation_speed_deg;
        scene.rug_speed = s.rug_speed;
        scene.rotating = s.start_rotating;
        scene.rug_moving = s.start_rug_moving;
        scene
    }

    /// Loads textures and models and uploads them.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        config: &AppConfig,
    ) -> Result<()> {
        let assets = SceneAssets::load(device, queue, &config.assets)?;
        let stats = assets.statistics();
        log::info!(
            "Scene assets ready: {} models, {} materials, {} triangles",
            stats.model_count,
            stats.material_count,
            stats.total_triangles
        );
        self.assets = Some(assets);
        Ok(())
    }

    /// Advances the scene by one frame.
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        if input.toggle_rotation {
            self.rotating = !self.rotating;
            log::debug!("World rotation {}", on_off(self.rotating));
        }
        if input.toggle_rug {
            self.rug_moving = !self.rug_moving;
            log::debug!("Rug motion {}", on_off(self.rug_moving));
        }

        self.camera_manager.update(input, dt);

        if input.grow {
            self.scale.grow(dt);
        }
        if input.shrink {
            self.scale.shrink(dt);
        }
        if input.scroll_lines != 0.0 {
            self.scale.scroll(input.scroll_lines);
        }

        let (rug_x, rug_z) = input.rug_axis;
        if rug_x != 0.0 || rug_z != 0.0 {
            let step = self.rug_speed * dt;
            self.cloth.nudge(rug_x * step, rug_z * step);
        }

        self.time += dt;
        if self.rug_moving {
            self.cloth_time += dt;
        }
        self.rotation_deg =
            (self.rotation_deg + self.rotation_speed * dt).rem_euclid(ROTATION_PERIOD_DEG);
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            time: self.time,
            cloth_time: self.cloth_time,
            rotation_deg: self.rotation_deg,
            rotating: self.rotating,
            scale: self.scale.factor(),
        }
    }

    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        build_layout(&self.layout_params(), &self.cloth)
    }

    /// Lights for this frame, with the spotlight on the rug centre.
    pub fn light_rig(&self) -> LightRig {
        let root = root_transform(&self.layout_params());
        LightRig::at(self.time, self.cloth.centre(self.cloth_time), root)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_manager.resize(width, height);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn cloth_time(&self) -> f32 {
        self.cloth_time
    }

    pub fn rotation_deg(&self) -> f32 {
        self.rotation_deg
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_rug_moving(&self) -> bool {
        self.rug_moving
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::MoveDirection;
    use cgmath::InnerSpace;

    fn scene() -> Scene {
        Scene::from_config(&AppConfig::default(), 1920, 1080)
    }

    #[test]
    fn test_spawn_at_player_height() {
        let scene = scene();
        let camera = &scene.camera_manager.camera;
        assert_eq!(camera.position(), Point3::new(0.0, 1.0, 3.5));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), -10.0);
    }

    #[test]
    fn test_toggles_flip_once_per_press() {
        let mut scene = scene();
        assert!(!scene.is_rotating());
        assert!(scene.is_rug_moving());

        let press = FrameInput {
            toggle_rotation: true,
            toggle_rug: true,
            ..Default::default()
        };
        scene.update(&press, 0.01);
        assert!(scene.is_rotating());
        assert!(!scene.is_rug_moving());

        scene.update(&FrameInput::default(), 0.01);
        assert!(scene.is_rotating());
        assert!(!scene.is_rug_moving());
    }

    #[test]
    fn test_frozen_rug_stops_cloth_clock() {
        let mut scene = scene();
        scene.update(&FrameInput::default(), 0.5);
        assert_eq!(scene.cloth_time(), 0.5);

        let freeze = FrameInput {
            toggle_rug: true,
            ..Default::default()
        };
        scene.update(&freeze, 0.5);
        scene.update(&FrameInput::default(), 0.5);
        assert_eq!(scene.cloth_time(), 0.5);
        assert_eq!(scene.time(), 1.5);
    }

    #[test]
    fn test_rotation_advances_while_static() {
        let mut scene = scene();
        scene.update(&FrameInput::default(), 0.5);
        assert!((scene.rotation_deg() - 12.0).abs() < 1e-5);
        assert!(!scene.is_rotating());
    }

    #[test]
    fn test_rotation_wraps() {
        let mut scene = scene();
        for _ in 0..31 {
            scene.update(&FrameInput::default(), 1.0);
        }
        // 31 * 24 = 744
        assert!((scene.rotation_deg() - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_rug_moves_at_configured_speed() {
        let mut scene = scene();
        let before = scene.cloth.origin;
        let input = FrameInput {
            rug_axis: (1.0, -1.0),
            ..Default::default()
        };
        scene.update(&input, 0.25);
        assert!((scene.cloth.origin[0] - before[0] - 1.8).abs() < 1e-5);
        assert!((scene.cloth.origin[1] - before[1] + 1.8).abs() < 1e-5);

        // 0.05 units per frame at 144 FPS
        let before = scene.cloth.origin;
        scene.update(&input, 1.0 / 144.0);
        assert!((scene.cloth.origin[0] - before[0] - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_scale_input() {
        let mut scene = scene();
        let grow = FrameInput {
            grow: true,
            ..Default::default()
        };
        scene.update(&grow, 1.0);
        assert!((scene.scale.factor() - 1.5).abs() < 1e-6);

        let scroll = FrameInput {
            scroll_lines: -3.0,
            ..Default::default()
        };
        scene.update(&scroll, 0.0);
        assert!((scene.scale.factor() - 1.2).abs() < 1e-5);
        assert_eq!(scene.layout_params().scale, scene.scale.factor());
    }

    #[test]
    fn test_camera_moves_through_scene_update() {
        let mut scene = scene();
        let input = FrameInput {
            moves: vec![MoveDirection::Forward],
            ..Default::default()
        };
        let before = scene.camera_manager.camera.position();
        scene.update(&input, 0.5);
        let after = scene.camera_manager.camera.position();
        assert!(after != before);
        assert_eq!(scene.camera_manager.uniform.view_position[2], after.z);
    }

    #[test]
    fn test_spotlight_tracks_rug_centre() {
        let scene = scene();
        let rig = scene.light_rig();
        let centre = scene.cloth.centre(0.0);
        let expected = (centre - rig.spot.position).normalize();
        assert!((rig.spot.direction - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_commands_without_assets() {
        let scene = scene();
        assert!(scene.assets.is_none());
        assert!(!scene.draw_commands().is_empty());
    }
}
