//! Instanced batch rendering
//!
//! Draw commands that share a pipeline, mesh and material are merged into one
//! instanced draw. All instances of a frame live in a single vertex buffer;
//! each batch draws its own range of it.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use wgpu::{Buffer, Device, Queue};

use crate::gfx::{
    resources::material::MaterialId,
    scene::{
        assets::MeshKey,
        layout::{DrawCommand, PipelineKind, Shape},
    },
};

/// Instance data for a single rendered instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    /// Model matrix, column-major
    pub transform: [[f32; 4]; 4],
    /// Color multiplier (RGBA)
    pub color: [f32; 4],
}

impl InstanceData {
    // Locations 0..=2 belong to Vertex3D
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    pub fn from_command(command: &DrawCommand) -> Self {
        Self {
            transform: command.transform.into(),
            color: command.color,
        }
    }

    /// Get vertex buffer layout for instance data
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Everything that must match for two draws to share an instanced call
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchKey {
    pub pipeline: PipelineKind,
    pub mesh: MeshKey,
    pub material: MaterialId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub key: BatchKey,
    pub instances: Range<u32>,
}

/// Groups draw commands into batches.
///
/// `parts` expands a shape into the meshes it is drawn with. Batches come out
/// sorted by pipeline so each pipeline is bound once per frame.
pub fn build_batches<F>(commands: &[DrawCommand], mut parts: F) -> (Vec<InstanceData>, Vec<Batch>)
where
    F: FnMut(Shape) -> Vec<(MeshKey, MaterialId)>,
{
    let mut shape_parts: HashMap<Shape, Vec<(MeshKey, MaterialId)>> = HashMap::new();
    let mut grouped: BTreeMap<BatchKey, Vec<InstanceData>> = BTreeMap::new();

    for command in commands {
        let instance = InstanceData::from_command(command);
        let meshes = shape_parts
            .entry(command.shape)
            .or_insert_with(|| parts(command.shape));

        for &(mesh, material) in meshes.iter() {
            let key = BatchKey {
                pipeline: command.pipeline,
                mesh,
                material,
            };
            grouped.entry(key).or_default().push(instance);
        }
    }

    let mut instances = Vec::with_capacity(grouped.values().map(Vec::len).sum());
    let mut batches = Vec::with_capacity(grouped.len());
    for (key, group) in grouped {
        let start = instances.len() as u32;
        instances.extend(group);
        batches.push(Batch {
            key,
            instances: start..instances.len() as u32,
        });
    }

    (instances, batches)
}

/// Owns the per-frame instance buffer
pub struct InstancedRenderer {
    instance_buffer: Buffer,
    capacity: u32,
}

impl InstancedRenderer {
    pub fn new(device: &Device, capacity: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            instance_buffer: Self::create_buffer(device, capacity),
            capacity,
        }
    }

    fn create_buffer(device: &Device, capacity: u32) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: capacity as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Uploads this frame's instances, growing the buffer when needed.
    pub fn update_instances(&mut self, device: &Device, queue: &Queue, instances: &[InstanceData]) {
        let needed = instances.len() as u32;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.instance_buffer = Self::create_buffer(device, self.capacity);
            log::debug!("Instance buffer grown to {} instances", self.capacity);
        }

        if needed > 0 {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn instance_buffer(&self) -> &Buffer {
        &self.instance_buffer
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Surface;
    use crate::gfx::scene::layout::ModelId;
    use cgmath::{Matrix4, SquareMatrix, Vector3};

    fn parts(shape: Shape) -> Vec<(MeshKey, MaterialId)> {
        match shape {
            Shape::Cube(surface) => vec![(MeshKey::Cube, surface as usize)],
            Shape::Pyramid(surface) => vec![(MeshKey::Pyramid, surface as usize)],
            // Two-part model sharing one material
            Shape::Model(model) => vec![(MeshKey::Model(model, 0), 100), (MeshKey::Model(model, 1), 100)],
        }
    }

    fn cube_at(x: f32, surface: Surface) -> DrawCommand {
        DrawCommand::lit(
            Shape::Cube(surface),
            Matrix4::from_translation(Vector3::new(x, 0.0, 0.0)),
            [1.0; 4],
        )
    }

    #[test]
    fn test_instance_layout_size() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
        assert_eq!(InstanceData::ATTRIBUTES[0].shader_location, 3);
        assert_eq!(InstanceData::ATTRIBUTES[4].offset, 64);
    }

    #[test]
    fn test_same_shape_shares_a_batch() {
        let commands = [
            cube_at(1.0, Surface::Brick),
            cube_at(2.0, Surface::Sand),
            cube_at(3.0, Surface::Brick),
        ];
        let (instances, batches) = build_batches(&commands, parts);

        assert_eq!(instances.len(), 3);
        assert_eq!(batches.len(), 2);
        let brick = batches
            .iter()
            .find(|b| b.key.material == Surface::Brick as usize)
            .unwrap();
        assert_eq!(brick.instances.len(), 2);
        let xs: Vec<f32> = instances[brick.instances.start as usize..brick.instances.end as usize]
            .iter()
            .map(|i| i.transform[3][0])
            .collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn test_models_expand_to_every_mesh() {
        let commands = [DrawCommand::lit(
            Shape::Model(ModelId::Bee),
            Matrix4::identity(),
            [1.0; 4],
        )];
        let (instances, batches) = build_batches(&commands, parts);
        assert_eq!(instances.len(), 2);
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_batches_cover_instances_in_pipeline_order() {
        let mirrored = DrawCommand::lit(
            Shape::Pyramid(Surface::Leaf),
            Matrix4::from_nonuniform_scale(1.0, -1.0, 1.0),
            [1.0; 4],
        );
        let moon = DrawCommand::unlit(Shape::Cube(Surface::Moon), Matrix4::identity(), [1.0; 4]);
        let commands = [moon, mirrored, cube_at(0.0, Surface::Sand)];

        let (instances, batches) = build_batches(&commands, parts);
        let pipelines: Vec<_> = batches.iter().map(|b| b.key.pipeline).collect();
        assert_eq!(
            pipelines,
            vec![PipelineKind::Lit, PipelineKind::LitMirrored, PipelineKind::Unlit]
        );

        let mut next = 0;
        for batch in &batches {
            assert_eq!(batch.instances.start, next);
            next = batch.instances.end;
        }
        assert_eq!(next as usize, instances.len());
    }

    #[test]
    fn test_model_batches_sort_by_model_then_part() {
        let commands = [
            DrawCommand::lit(Shape::Model(ModelId::Dragon), Matrix4::identity(), [1.0; 4]),
            DrawCommand::lit(Shape::Model(ModelId::Star), Matrix4::identity(), [1.0; 4]),
            cube_at(0.0, Surface::Sand),
        ];
        let (_, batches) = build_batches(&commands, parts);
        let meshes: Vec<MeshKey> = batches.iter().map(|b| b.key.mesh).collect();
        assert_eq!(
            meshes,
            vec![
                MeshKey::Cube,
                MeshKey::Model(ModelId::Star, 0),
                MeshKey::Model(ModelId::Star, 1),
                MeshKey::Model(ModelId::Dragon, 0),
                MeshKey::Model(ModelId::Dragon, 1),
            ]
        );
    }

    #[test]
    fn test_shapes_without_parts_are_skipped() {
        let (instances, batches) = build_batches(&[cube_at(0.0, Surface::Tree)], |_| Vec::new());
        assert!(instances.is_empty());
        assert!(batches.is_empty());
    }
}
