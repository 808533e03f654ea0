// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, materials, loaded models and the global uniforms.

pub mod global_bindings;
pub mod material;
pub mod model;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, GlobalUBOContent};
pub use material::{Material, MaterialId, MaterialManager, Surface};
pub use model::load_model;
pub use texture_resource::TextureResource;
