//! GPU-side scene assets: the two primitives, the loaded models and every
//! material they reference.

use std::collections::HashMap;
use std::path::Path;

use wgpu::Device;

use super::layout::{ModelId, Shape};
use super::object::{Mesh, Object};
use crate::{
    config::AssetsConfig,
    error::Result,
    gfx::{
        geometry::{generate_box, generate_pyramid, PRIMITIVE_HALF_EXTENT},
        resources::{
            material::{MaterialId, MaterialManager},
            model::load_model,
        },
    },
};

/// Identifies one uploaded mesh
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKey {
    Cube,
    Pyramid,
    /// Mesh `index` of a loaded model
    Model(ModelId, usize),
}

pub fn model_path(assets: &AssetsConfig, model: ModelId) -> &Path {
    match model {
        ModelId::Star => &assets.star_model,
        ModelId::Bee => &assets.bee_model,
        ModelId::Goku => &assets.goku_model,
        ModelId::Dragon => &assets.dragon_model,
    }
}

pub struct SceneAssets {
    pub materials: MaterialManager,
    cube: Mesh,
    pyramid: Mesh,
    models: HashMap<ModelId, Object>,
}

impl SceneAssets {
    /// Loads textures and models. Any model failing to load is fatal.
    pub fn load(device: &Device, queue: &wgpu::Queue, config: &AssetsConfig) -> Result<Self> {
        let mut materials = MaterialManager::new(device);
        materials.load_surfaces(device, queue, &config.texture_dir);

        let mut cube = Mesh::from_geometry(&generate_box(PRIMITIVE_HALF_EXTENT));
        cube.init_gpu_resources(device, "Cube");
        let mut pyramid = Mesh::from_geometry(&generate_pyramid(PRIMITIVE_HALF_EXTENT));
        pyramid.init_gpu_resources(device, "Pyramid");

        let mut models = HashMap::new();
        for model in ModelId::ALL {
            let object = load_model(device, queue, &mut materials, model_path(config, model))?;
            models.insert(model, object);
        }

        Ok(Self {
            materials,
            cube,
            pyramid,
            models,
        })
    }

    /// Meshes making up `shape`, each with the material it is drawn with.
    pub fn parts(&self, shape: Shape) -> Vec<(MeshKey, MaterialId)> {
        match shape {
            Shape::Cube(surface) => self
                .materials
                .surface(surface)
                .map(|m| vec![(MeshKey::Cube, m)])
                .unwrap_or_default(),
            Shape::Pyramid(surface) => self
                .materials
                .surface(surface)
                .map(|m| vec![(MeshKey::Pyramid, m)])
                .unwrap_or_default(),
            Shape::Model(model) => self
                .models
                .get(&model)
                .map(|object| {
                    object
                        .meshes
                        .iter()
                        .enumerate()
                        .filter_map(|(i, mesh)| mesh.material.map(|m| (MeshKey::Model(model, i), m)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        match key {
            MeshKey::Cube => Some(&self.cube),
            MeshKey::Pyramid => Some(&self.pyramid),
            MeshKey::Model(model, i) => self.models.get(&model).and_then(|o| o.meshes.get(i)),
        }
    }

    pub fn statistics(&self) -> AssetStatistics {
        AssetStatistics {
            model_count: self.models.len(),
            material_count: self.materials.len(),
            total_triangles: self.models.values().map(Object::triangle_count).sum::<u32>()
                + (self.cube.index_count() + self.pyramid.index_count()) / 3,
        }
    }
}

#[derive(Debug)]
pub struct AssetStatistics {
    pub model_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_paths() {
        let assets = AssetsConfig::default();
        assert_eq!(
            model_path(&assets, ModelId::Goku),
            Path::new("res/goku/Goku.obj")
        );
        assert_eq!(
            model_path(&assets, ModelId::Star),
            Path::new("res/star/star.obj")
        );
    }
}
