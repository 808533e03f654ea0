//! # Graphics Module
//!
//! Everything between the scene state and the screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Yaw/pitch orientation, FPS camera and projection
//! - **Geometry** ([`geometry`]) - Procedural box and pyramid primitives
//! - **Scene** ([`scene`]) - Clocks, toggles, rug, lights and the per-frame layout
//! - **Resources** ([`resources`]) - Textures, materials, OBJ models and global uniforms
//! - **Rendering** ([`rendering`]) - Phong and unlit pipelines with instanced batches
//!
//! ## Usage
//!
//! ```no_run
//! use chadd_scene::config::AppConfig;
//! use chadd_scene::gfx::scene::Scene;
//!
//! // The render engine is created by ChaddApp once a window exists:
//! // let engine = RenderEngine::new(window, width, height).await?;
//! // engine.prepare_scene(&mut scene, &config)?;
//! let scene = Scene::from_config(&AppConfig::default(), 1920, 1080);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::fps_camera::FpsCamera;
pub use rendering::render_engine::RenderEngine;
