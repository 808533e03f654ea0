//! OBJ model loading
//!
//! Geometry comes from `tobj`; every MTL entry becomes a [`Material`] whose
//! diffuse and specular maps are resolved relative to the model's directory.

use std::path::{Path, PathBuf};

use wgpu::Device;

use super::material::{Material, MaterialId, MaterialManager};
use super::texture_resource::TextureResource;
use crate::{
    error::{Result, SceneError},
    gfx::scene::object::{Mesh, Object},
};

/// Loads an OBJ file, uploads its meshes and registers its materials.
pub fn load_model(
    device: &Device,
    queue: &wgpu::Queue,
    materials: &mut MaterialManager,
    path: &Path,
) -> Result<Object> {
    let (models, mtl_result) =
        tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| SceneError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;

    if models.is_empty() {
        return Err(SceneError::EmptyModel(path.to_path_buf()));
    }

    let mtls = mtl_result.unwrap_or_else(|err| {
        log::warn!("{}: no usable MTL ({err}), drawing untextured", path.display());
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let material_ids: Vec<MaterialId> = mtls
        .iter()
        .map(|mtl| {
            let diffuse = texture_for(device, queue, base_dir, mtl.diffuse_texture.as_deref());
            let specular = texture_for(device, queue, base_dir, mtl.specular_texture.as_deref());
            materials.add_material(Material::new(
                device,
                materials.layout(),
                &mtl.name,
                &diffuse,
                &specular,
            ))
        })
        .collect();

    let mut meshes = Vec::with_capacity(models.len());
    for model in &models {
        let mesh = &model.mesh;
        let material = match mesh.material_id.and_then(|i| material_ids.get(i)) {
            Some(&id) => id,
            None => materials.plain(device, queue),
        };

        meshes.push(
            Mesh::from_flat_arrays(
                &mesh.positions,
                &mesh.normals,
                &mesh.texcoords,
                mesh.indices.clone(),
            )
            .with_material(material),
        );
    }

    let name = object_name(path);
    let mut object = Object::new(name, meshes);
    object.init_gpu_resources(device);

    log::info!(
        "Loaded model {} ({} meshes, {} materials, {} triangles)",
        path.display(),
        object.meshes.len(),
        material_ids.len(),
        object.triangle_count()
    );

    Ok(object)
}

fn texture_for(
    device: &Device,
    queue: &wgpu::Queue,
    base_dir: &Path,
    file: Option<&str>,
) -> TextureResource {
    match file.filter(|f| !f.is_empty()) {
        Some(file) => TextureResource::load_or_white(device, queue, &resolve_texture(base_dir, file)),
        None => TextureResource::white(device, queue),
    }
}

/// MTL texture paths are relative to the model file and may use backslashes.
fn resolve_texture(base_dir: &Path, file: &str) -> PathBuf {
    base_dir.join(file.replace('\\', "/"))
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_paths_resolve_next_to_model() {
        let path = resolve_texture(Path::new("res/bee"), "tex\\bee_diffuse.png");
        assert_eq!(path, Path::new("res/bee/tex/bee_diffuse.png"));
    }

    #[test]
    fn test_object_name_uses_file_stem() {
        assert_eq!(object_name(Path::new("res/goku/Goku.obj")), "Goku");
    }
}
