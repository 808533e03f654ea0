//! Per-frame scene layout
//!
//! Turns the animated scene state into a flat list of [`DrawCommand`]s. Every
//! command carries its final model matrix, so the renderer only has to group
//! and upload them.

use cgmath::{Deg, InnerSpace, Matrix4, SquareMatrix, Vector3};

use super::cloth::Cloth;
use super::lights::{MOON_POSITION, POINT_LIGHT_PHASES};
use crate::gfx::resources::material::Surface;

/// Models loaded from OBJ files
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelId {
    Star,
    Bee,
    Goku,
    Dragon,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [ModelId::Star, ModelId::Bee, ModelId::Goku, ModelId::Dragon];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Cube(Surface),
    Pyramid(Surface),
    Model(ModelId),
}

/// Render pipeline a command is drawn with
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineKind {
    Lit,
    /// Lit, culling front faces; for transforms that flip winding
    LitMirrored,
    Unlit,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] = [
        PipelineKind::Lit,
        PipelineKind::LitMirrored,
        PipelineKind::Unlit,
    ];

    /// Name the pipeline is registered under
    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::Lit => "lit",
            PipelineKind::LitMirrored => "lit_mirrored",
            PipelineKind::Unlit => "unlit",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub pipeline: PipelineKind,
    pub transform: Matrix4<f32>,
    pub color: [f32; 4],
}

impl DrawCommand {
    /// Lit draw; picks the mirrored pipeline when `transform` flips handedness.
    pub fn lit(shape: Shape, transform: Matrix4<f32>, color: [f32; 4]) -> Self {
        let pipeline = if transform.determinant() < 0.0 {
            PipelineKind::LitMirrored
        } else {
            PipelineKind::Lit
        };
        Self {
            shape,
            pipeline,
            transform,
            color,
        }
    }

    pub fn unlit(shape: Shape, transform: Matrix4<f32>, color: [f32; 4]) -> Self {
        Self {
            shape,
            pipeline: PipelineKind::Unlit,
            transform,
            color,
        }
    }
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const MOON_GLOW: [f32; 4] = [1.2, 1.2, 1.2, 1.0];
const SAND: [f32; 4] = [0.5, 0.5, 0.2, 1.0];
const CAP: [f32; 4] = [0.7, 0.7, 0.2, 1.0];
const BARK: [f32; 4] = [0.3, 0.2, 0.1, 1.0];
const FOLIAGE: [f32; 4] = [0.1, 0.3, 0.1, 1.0];

/// Animation inputs for one frame
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutParams {
    /// Scene clock in seconds
    pub time: f32,
    /// Cloth clock in seconds; stops while the rug is frozen
    pub cloth_time: f32,
    /// Rotation angle in degrees; always advancing
    pub rotation_deg: f32,
    /// Whether the whole world spins by `rotation_deg`
    pub rotating: bool,
    pub scale: f32,
}

/// World spin followed by the uniform scene scale.
pub fn root_transform(params: &LayoutParams) -> Matrix4<f32> {
    let spin = if params.rotating {
        Matrix4::from_angle_y(Deg(params.rotation_deg))
    } else {
        Matrix4::identity()
    };
    spin * Matrix4::from_scale(params.scale)
}

fn translate(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

fn scale3(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(x, y, z)
}

fn rot_y(deg: f32) -> Matrix4<f32> {
    Matrix4::from_angle_y(Deg(deg))
}

/// Star bob height for a lamp phase.
pub fn star_bob(phase: f32, t: f32) -> f32 {
    ((phase + t * 15.0) / 4.0).sin() / 10.0
}

/// Builds every draw of the frame.
pub fn build_layout(params: &LayoutParams, cloth: &Cloth) -> Vec<DrawCommand> {
    let root = root_transform(params);
    let mut commands = Vec::with_capacity(1400);

    push_moon(&mut commands, root);
    push_base_and_pyramids(&mut commands, root, params);
    push_models(&mut commands, root, params.rotation_deg);
    push_trees(&mut commands, root);

    commands.extend(cloth.cells(params.cloth_time).map(|cell| {
        DrawCommand::lit(Shape::Cube(Surface::Cloth), root * cell.transform, cell.color)
    }));

    commands
}

fn push_moon(commands: &mut Vec<DrawCommand>, root: Matrix4<f32>) {
    let axis = Vector3::new(1.0, 1.0, 1.0).normalize();
    let centre = translate(MOON_POSITION.x, MOON_POSITION.y, MOON_POSITION.z);

    for step in 0..8 {
        let turn = Matrix4::from_axis_angle(axis, Deg(step as f32 * 15.0));
        commands.push(DrawCommand::unlit(
            Shape::Cube(Surface::Moon),
            root * centre * turn,
            MOON_GLOW,
        ));
    }
}

/// Pyramid centre, pyramid scale, cap height, cap scale, star height
const PYRAMIDS: [([f32; 3], f32, f32, f32, f32); 4] = [
    ([1.34, 0.2, -1.34], 3.3, 0.8, 0.375, 1.05),
    ([-1.34, 0.2, -1.34], 3.3, 0.8, 0.375, 1.05),
    ([1.4, 0.0, 1.4], 2.2, 0.4, 0.25, 0.6),
    ([-1.4, 0.0, 1.4], 2.2, 0.4, 0.25, 0.6),
];

fn push_base_and_pyramids(
    commands: &mut Vec<DrawCommand>,
    root: Matrix4<f32>,
    params: &LayoutParams,
) {
    commands.push(DrawCommand::lit(
        Shape::Cube(Surface::Sand),
        root * translate(0.0, -0.5, 0.0) * scale3(10.0, 0.3, 10.0),
        SAND,
    ));

    for (k, ([x, y, z], size, cap_y, cap_size, star_y)) in PYRAMIDS.into_iter().enumerate() {
        commands.push(DrawCommand::lit(
            Shape::Pyramid(Surface::Brick),
            root * translate(x, y, z) * Matrix4::from_scale(size),
            SAND,
        ));
        commands.push(DrawCommand::lit(
            Shape::Pyramid(Surface::SmallBrick),
            root * translate(x, cap_y, z) * Matrix4::from_scale(cap_size),
            CAP,
        ));

        let bob = star_bob(POINT_LIGHT_PHASES[k], params.time);
        let star = root
            * translate(x, star_y + bob, z)
            * rot_y(params.rotation_deg * 5.0)
            * Matrix4::from_scale(0.012);
        commands.push(DrawCommand::lit(Shape::Model(ModelId::Star), star, WHITE));
        commands.push(DrawCommand::lit(
            Shape::Model(ModelId::Star),
            star * rot_y(180.0),
            WHITE,
        ));
    }
}

fn push_models(commands: &mut Vec<DrawCommand>, root: Matrix4<f32>, rotation_deg: f32) {
    let orbit = root * rot_y(-2.5 * rotation_deg);
    let bee_scale = Matrix4::from_scale(0.03);

    commands.push(DrawCommand::lit(
        Shape::Model(ModelId::Bee),
        orbit * translate(1.0, 1.0, 0.0) * bee_scale,
        WHITE,
    ));
    commands.push(DrawCommand::lit(
        Shape::Model(ModelId::Bee),
        orbit * translate(-1.0, 1.0, 0.0) * rot_y(180.0) * bee_scale,
        WHITE,
    ));
    commands.push(DrawCommand::lit(
        Shape::Model(ModelId::Goku),
        root * translate(0.0, -0.4, -0.2) * Matrix4::from_scale(0.1),
        WHITE,
    ));
    commands.push(DrawCommand::lit(
        Shape::Model(ModelId::Dragon),
        root * rot_y(180.0) * translate(0.0, 0.0, -2.0) * Matrix4::from_scale(0.3),
        WHITE,
    ));
}

const TREE_ROOTS: [[f32; 3]; 3] = [[1.5, 0.0, 0.0], [-1.5, 0.0, 0.0], [0.0, 0.0, -1.5]];

fn push_trees(commands: &mut Vec<DrawCommand>, root: Matrix4<f32>) {
    for [x, y, z] in TREE_ROOTS {
        let at = |dy: f32| root * translate(x, y + dy, z);

        // Each piece is drawn three times, turned 30 degrees apart
        for i in 0..3 {
            let turn = rot_y(i as f32 * 30.0);

            commands.push(DrawCommand::lit(
                Shape::Cube(Surface::Tree),
                at(0.0) * scale3(0.5, 2.0, 0.5) * turn,
                BARK,
            ));
            commands.push(DrawCommand::lit(
                Shape::Pyramid(Surface::Tree),
                at(-0.3) * turn * scale3(0.8, 0.4, 0.8),
                BARK,
            ));
            // Upside-down layer; the negative scale lands on the mirrored pipeline
            commands.push(DrawCommand::lit(
                Shape::Pyramid(Surface::Leaf),
                at(0.3) * scale3(1.55, -0.6, 1.55) * turn,
                FOLIAGE,
            ));
            commands.push(DrawCommand::lit(
                Shape::Cube(Surface::Leaf),
                at(0.52) * scale3(1.5, 0.6, 1.5) * turn,
                FOLIAGE,
            ));
            commands.push(DrawCommand::lit(
                Shape::Pyramid(Surface::Leaf),
                at(0.77) * scale3(1.55, 0.6, 1.55) * turn,
                FOLIAGE,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::cloth::{HEIGHT_CELLS, WIDTH_CELLS};
    use cgmath::{Point3, Transform};

    fn params(rotating: bool, rotation_deg: f32, scale: f32) -> LayoutParams {
        LayoutParams {
            time: 0.0,
            cloth_time: 0.0,
            rotation_deg,
            rotating,
            scale,
        }
    }

    fn origin_of(command: &DrawCommand) -> Point3<f32> {
        command.transform.transform_point(Point3::new(0.0, 0.0, 0.0))
    }

    fn find(commands: &[DrawCommand], shape: Shape) -> Vec<&DrawCommand> {
        commands.iter().filter(|c| c.shape == shape).collect()
    }

    #[test]
    fn test_command_counts() {
        let commands = build_layout(&params(false, 0.0, 1.0), &Cloth::default());
        let rug = ((WIDTH_CELLS + 1) * (HEIGHT_CELLS + 1)) as usize;

        assert_eq!(find(&commands, Shape::Cube(Surface::Cloth)).len(), rug);
        assert_eq!(find(&commands, Shape::Cube(Surface::Moon)).len(), 8);
        assert_eq!(find(&commands, Shape::Model(ModelId::Star)).len(), 8);
        assert_eq!(find(&commands, Shape::Model(ModelId::Bee)).len(), 2);
        assert_eq!(find(&commands, Shape::Pyramid(Surface::Brick)).len(), 4);
        assert_eq!(find(&commands, Shape::Pyramid(Surface::SmallBrick)).len(), 4);
        // 3 trees, 5 pieces, 3 copies each
        let tree_parts = commands
            .iter()
            .filter(|c| {
                matches!(
                    c.shape,
                    Shape::Cube(Surface::Tree | Surface::Leaf)
                        | Shape::Pyramid(Surface::Tree | Surface::Leaf)
                )
            })
            .count();
        assert_eq!(tree_parts, 45);
        assert_eq!(commands.len(), rug + 8 + 1 + 8 + 8 + 4 + 45);
    }

    #[test]
    fn test_pipelines() {
        let commands = build_layout(&params(true, 33.0, 1.5), &Cloth::default());

        let unlit: Vec<_> = commands
            .iter()
            .filter(|c| c.pipeline == PipelineKind::Unlit)
            .collect();
        assert_eq!(unlit.len(), 8);
        assert!(unlit.iter().all(|c| c.shape == Shape::Cube(Surface::Moon)));

        let mirrored: Vec<_> = commands
            .iter()
            .filter(|c| c.pipeline == PipelineKind::LitMirrored)
            .collect();
        assert_eq!(mirrored.len(), 9);
        assert!(mirrored.iter().all(|c| c.shape == Shape::Pyramid(Surface::Leaf)));
    }

    #[test]
    fn test_static_root_is_identity() {
        let root = root_transform(&params(false, 270.0, 1.0));
        assert_eq!(root, Matrix4::identity());

        let commands = build_layout(&params(false, 0.0, 1.0), &Cloth::default());
        let base = find(&commands, Shape::Cube(Surface::Sand))[0];
        assert_eq!(origin_of(base), Point3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_world_spin_moves_dragon() {
        let still = build_layout(&params(false, 90.0, 1.0), &Cloth::default());
        let dragon = origin_of(find(&still, Shape::Model(ModelId::Dragon))[0]);
        assert!((dragon - Point3::new(0.0, 0.0, 2.0)).magnitude() < 1e-5);

        let spun = build_layout(&params(true, 90.0, 1.0), &Cloth::default());
        let dragon = origin_of(find(&spun, Shape::Model(ModelId::Dragon))[0]);
        assert!((dragon - Point3::new(2.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_scene_scale_scales_positions() {
        let commands = build_layout(&params(false, 0.0, 2.0), &Cloth::default());
        let first_pyramid = origin_of(find(&commands, Shape::Pyramid(Surface::Brick))[0]);
        assert!((first_pyramid - Point3::new(2.68, 0.4, -2.68)).magnitude() < 1e-5);
    }

    #[test]
    fn test_bees_orbit_without_world_spin() {
        let a = build_layout(&params(false, 0.0, 1.0), &Cloth::default());
        let b = build_layout(&params(false, 36.0, 1.0), &Cloth::default());
        let bee_a = origin_of(find(&a, Shape::Model(ModelId::Bee))[0]);
        let bee_b = origin_of(find(&b, Shape::Model(ModelId::Bee))[0]);

        assert!((bee_a - Point3::new(1.0, 1.0, 0.0)).magnitude() < 1e-5);
        // -90 degrees about Y takes +X to +Z
        assert!((bee_b - Point3::new(0.0, 1.0, 1.0)).magnitude() < 1e-5);
    }
}
