//! Runtime configuration loaded from TOML.
//!
//! Every section uses `#[serde(default)]`, so a file only needs the keys it
//! wants to override:
//!
//! ```toml
//! [window]
//! fullscreen = true
//!
//! [camera]
//! mouse_sensitivity = 0.05
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "scene.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub scene: SceneConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
    /// Frame cap; 0 disables pacing.
    pub target_fps: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chadd scene".to_string(),
            width: 1920,
            height: 1080,
            fullscreen: false,
            target_fps: 144.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per second for keyboard look.
    pub look_speed: f32,
    /// Degrees per unit of mouse motion.
    pub mouse_sensitivity: f32,
    pub invert_mouse_y: bool,
    /// Initial yaw in degrees.
    pub yaw: f32,
    /// Initial pitch in degrees; clamped like any other pitch.
    pub pitch: f32,
    /// Spawn point on the ground plane as (x, z); the eye sits at the player height.
    pub spawn: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 90.0,
            znear: 0.1,
            zfar: 100.0,
            move_speed: 2.0,
            look_speed: 90.0,
            mouse_sensitivity: 0.1,
            invert_mouse_y: false,
            yaw: -90.0,
            pitch: -10.0,
            spawn: [0.0, 3.5],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Eye height above the ground plane.
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { height: 1.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Rug travel speed for the arrow keys, units per second. The default is
    /// 0.05 units per frame at 144 FPS.
    pub rug_speed: f32,
    /// Initial rug origin as (x, z).
    pub rug_origin: [f32; 2],
    /// Scene scale change per second while grow/shrink is held.
    pub scale_step: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    /// World spin rate in degrees per second.
    pub rotation_speed_deg: f32,
    pub start_rotating: bool,
    pub start_rug_moving: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rug_speed: 7.2,
            rug_origin: [-0.6, -0.3],
            scale_step: 0.5,
            scale_min: 0.1,
            scale_max: 5.0,
            rotation_speed_deg: 24.0,
            start_rotating: false,
            start_rug_moving: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    pub texture_dir: PathBuf,
    pub star_model: PathBuf,
    pub bee_model: PathBuf,
    pub goku_model: PathBuf,
    pub dragon_model: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            star_model: PathBuf::from("res/star/star.obj"),
            bee_model: PathBuf::from("res/bee/bee.obj"),
            goku_model: PathBuf::from("res/goku/Goku.obj"),
            dragon_model: PathBuf::from("res/dragon/dragon.obj"),
        }
    }
}

impl AppConfig {
    /// Load and validate a config file. Missing keys use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| SceneError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the projection or the frame pacer cannot work with.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !camera.fov_deg.is_finite() || camera.fov_deg <= 0.0 || camera.fov_deg >= 180.0 {
            return Err(invalid(
                "camera.fov_deg",
                format!("{} is not in (0, 180) degrees", camera.fov_deg),
            ));
        }
        if !camera.znear.is_finite() || camera.znear <= 0.0 {
            return Err(invalid(
                "camera.znear",
                format!("{} must be positive", camera.znear),
            ));
        }
        if !camera.zfar.is_finite() || camera.zfar <= camera.znear {
            return Err(invalid(
                "camera.zfar",
                format!("{} must be greater than znear ({})", camera.zfar, camera.znear),
            ));
        }

        let fps = self.window.target_fps;
        if !fps.is_finite() || fps < 0.0 {
            return Err(invalid(
                "window.target_fps",
                format!("{fps} must be 0 (unlimited) or a positive rate"),
            ));
        }
        if fps > 0.0 && Duration::try_from_secs_f64(1.0 / fps as f64).is_err() {
            return Err(invalid(
                "window.target_fps",
                format!("{fps} is too small to give a frame budget"),
            ));
        }
        Ok(())
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the config from an optional explicit path.
    ///
    /// An explicit path must exist. Without one, `scene.toml` in the working
    /// directory is used if present, otherwise the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Loading config from {}", path.display());
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("Loading config from {}", fallback.display());
            Self::load(fallback)
        } else {
            log::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }
}

fn invalid(field: &'static str, reason: String) -> SceneError {
    SceneError::InvalidConfig { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [window]
            fullscreen = true

            [camera]
            mouse_sensitivity = 0.05
            "#,
        )
        .unwrap();

        assert!(config.window.fullscreen);
        assert_eq!(config.window.title, "Chadd scene");
        assert_eq!(config.window.target_fps, 144.0);
        assert_eq!(config.camera.mouse_sensitivity, 0.05);
        assert_eq!(config.camera.fov_deg, 90.0);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(AppConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_value_type_is_an_error() {
        assert!(AppConfig::parse("[window]\nwidth = \"wide\"").is_err());
    }

    fn invalid_field(text: &str) -> &'static str {
        let config = AppConfig::parse(text).unwrap();
        match config.validate() {
            Err(SceneError::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
        assert!(AppConfig::parse("[window]\ntarget_fps = 0.0")
            .unwrap()
            .validate()
            .is_ok());
    }

    #[test]
    fn test_fov_out_of_range_is_rejected() {
        assert_eq!(invalid_field("[camera]\nfov_deg = 180.0"), "camera.fov_deg");
        assert_eq!(invalid_field("[camera]\nfov_deg = 0.0"), "camera.fov_deg");
        assert_eq!(invalid_field("[camera]\nfov_deg = nan"), "camera.fov_deg");
    }

    #[test]
    fn test_non_positive_znear_is_rejected() {
        assert_eq!(invalid_field("[camera]\nznear = 0.0"), "camera.znear");
        assert_eq!(invalid_field("[camera]\nznear = -1.0"), "camera.znear");
    }

    #[test]
    fn test_zfar_must_exceed_znear() {
        assert_eq!(invalid_field("[camera]\nzfar = 0.1"), "camera.zfar");
        assert_eq!(invalid_field("[camera]\nznear = 5.0\nzfar = 2.0"), "camera.zfar");
        assert_eq!(invalid_field("[camera]\nzfar = inf"), "camera.zfar");
    }

    #[test]
    fn test_unusable_target_fps_is_rejected() {
        assert_eq!(invalid_field("[window]\ntarget_fps = -1.0"), "window.target_fps");
        assert_eq!(invalid_field("[window]\ntarget_fps = nan"), "window.target_fps");
        assert_eq!(invalid_field("[window]\ntarget_fps = 1e-30"), "window.target_fps");
    }

    #[test]
    fn test_load_validates() {
        let path = std::env::temp_dir()
            .join(format!("chadd-scene-{}-znear.toml", std::process::id()));
        std::fs::write(&path, "[camera]\nznear = 0.0\n").unwrap();
        let result = AppConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            result,
            Err(SceneError::InvalidConfig { field: "camera.znear", .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = AppConfig::resolve(Some(Path::new("definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, SceneError::ConfigRead { .. }));
    }
}
