//! Texture-mapped materials
//!
//! A material is a diffuse map plus a specular map sharing one sampler. The
//! procedural surfaces (sand, brick, bark...) are loaded once at startup;
//! loaded models register one material per MTL entry. Draws reference
//! materials by [`MaterialId`].

use std::collections::HashMap;
use std::path::Path;

use wgpu::Device;

use super::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

/// Index into the [`MaterialManager`]
pub type MaterialId = usize;

/// Specular map for surfaces that shine evenly
pub const WHITE_SPECULAR: &str = "white.png";

/// Textured surfaces used by the procedural primitives
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Moon,
    Sand,
    Brick,
    SmallBrick,
    Cloth,
    Tree,
    Leaf,
}

impl Surface {
    pub const ALL: [Surface; 7] = [
        Surface::Moon,
        Surface::Sand,
        Surface::Brick,
        Surface::SmallBrick,
        Surface::Cloth,
        Surface::Tree,
        Surface::Leaf,
    ];

    /// Diffuse map file name, relative to the texture directory
    pub fn diffuse_file(self) -> &'static str {
        match self {
            Surface::Moon => "moon.jpg",
            Surface::Sand => "sand.jpg",
            Surface::Brick => "brick.png",
            Surface::SmallBrick => "brickSmall.png",
            Surface::Cloth => "cloth.jpg",
            Surface::Tree => "tree.jpg",
            Surface::Leaf => "leaf.jpg",
        }
    }

    /// Specular map file name, relative to the texture directory
    pub fn specular_file(self) -> &'static str {
        match self {
            // Sparkles in the sand
            Surface::Sand => "blackWithDots.jpg",
            _ => WHITE_SPECULAR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Surface::Moon => "moon",
            Surface::Sand => "sand",
            Surface::Brick => "brick",
            Surface::SmallBrick => "small brick",
            Surface::Cloth => "cloth",
            Surface::Tree => "tree",
            Surface::Leaf => "leaf",
        }
    }
}

/// Creates the layout shared by every material: diffuse, specular, sampler.
pub fn material_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(
            wgpu::SamplerBindingType::Filtering,
        ))
        .create(device, "Material Bind Group Layout")
}

/// A diffuse and specular map bound together; the bind group keeps both
/// textures alive.
pub struct Material {
    pub name: String,
    bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &Device,
        layout: &BindGroupLayoutWithDesc,
        name: &str,
        diffuse: &TextureResource,
        specular: &TextureResource,
    ) -> Self {
        let bind_group = BindGroupBuilder::new(layout)
            .texture(&diffuse.view)
            .texture(&specular.view)
            .sampler(&diffuse.sampler)
            .create(device, &format!("Material Bind Group: {name}"));

        Self {
            name: name.to_string(),
            bind_group,
        }
    }

    /// Loads both maps from disk; unreadable files fall back to white.
    pub fn from_files(
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        name: &str,
        diffuse_path: &Path,
        specular_path: &Path,
    ) -> Self {
        let diffuse = TextureResource::load_or_white(device, queue, diffuse_path);
        let specular = TextureResource::load_or_white(device, queue, specular_path);
        Self::new(device, layout, name, &diffuse, &specular)
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Owns every material in the scene
pub struct MaterialManager {
    layout: BindGroupLayoutWithDesc,
    materials: Vec<Material>,
    surfaces: HashMap<Surface, MaterialId>,
    plain: Option<MaterialId>,
}

impl MaterialManager {
    pub fn new(device: &Device) -> Self {
        Self {
            layout: material_bind_group_layout(device),
            materials: Vec::new(),
            surfaces: HashMap::new(),
            plain: None,
        }
    }

    /// Loads the diffuse and specular maps of every [`Surface`].
    pub fn load_surfaces(&mut self, device: &Device, queue: &wgpu::Queue, texture_dir: &Path) {
        for surface in Surface::ALL {
            let material = Material::from_files(
                device,
                queue,
                &self.layout,
                surface.name(),
                &texture_dir.join(surface.diffuse_file()),
                &texture_dir.join(surface.specular_file()),
            );
            let id = self.add_material(material);
            self.surfaces.insert(surface, id);
        }
        log::info!("Loaded {} surface materials", self.surfaces.len());
    }

    /// Untextured white material, created on first use
    pub fn plain(&mut self, device: &Device, queue: &wgpu::Queue) -> MaterialId {
        if let Some(id) = self.plain {
            return id;
        }
        let white = TextureResource::white(device, queue);
        let material = Material::new(device, &self.layout, "plain", &white, &white);
        let id = self.add_material(material);
        self.plain = Some(id);
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Material for a surface, once [`MaterialManager::load_surfaces`] ran
    pub fn surface(&self, surface: Surface) -> Option<MaterialId> {
        self.surfaces.get(&surface).copied()
    }

    pub fn layout(&self) -> &BindGroupLayoutWithDesc {
        &self.layout
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
