//! Core rendering functionality
//!
//! Handles the wgpu device and surface, render pipelines and instanced
//! frame rendering.

pub mod instanced_renderer;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use instanced_renderer::{build_batches, Batch, BatchKey, InstanceData, InstancedRenderer};
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::{FrameStats, RenderEngine};
