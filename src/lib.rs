//! Chadd scene
//!
//! A small real-time 3D scene on wgpu and winit: an FPS camera walking around
//! pyramids, trees, loaded models and a rippling rug.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod performance;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ChaddApp;
pub use config::AppConfig;
pub use error::{Result, SceneError};
