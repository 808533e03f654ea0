//! # Scene Module
//!
//! Everything that changes from frame to frame: the animated layout, the
//! procedural rug, the light rig and the player/scale state, plus the loaded
//! meshes the layout refers to.
//!
//! ## Key Components
//!
//! - [`Scene`] - Camera, clocks, toggles and the per-frame update
//! - [`build_layout`] - Turns the scene state into [`DrawCommand`]s
//! - [`Cloth`] - The sine-driven rug
//! - [`LightRig`] - Sun, four pulsing lamps and the moon spotlight
//! - [`Vertex3D`] - GPU vertex layout shared by primitives and models
//!
//! ## Usage
//!
//! ```no_run
//! use chadd_scene::config::AppConfig;
//! use chadd_scene::gfx::scene::Scene;
//! use chadd_scene::input::FrameInput;
//!
//! let mut scene = Scene::from_config(&AppConfig::default(), 1920, 1080);
//! scene.update(&FrameInput::default(), 1.0 / 144.0);
//! let commands = scene.draw_commands();
//! let lights = scene.light_rig();
//! ```

pub mod assets;
pub mod cloth;
pub mod layout;
pub mod lights;
pub mod object;
pub mod player;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use assets::{MeshKey, SceneAssets};
pub use cloth::Cloth;
pub use layout::{build_layout, DrawCommand, ModelId, PipelineKind, Shape};
pub use lights::LightRig;
pub use object::{DrawObject, Mesh, Object};
pub use player::{PlayerState, SceneScale};
pub use scene::Scene;
pub use vertex::Vertex3D;
