//! Scene lighting: one sun, four pulsing red lamps above the pyramids and a
//! spotlight hanging from the moon.

use cgmath::{InnerSpace, Matrix4, Point3, Transform, Vector3};

pub const POINT_LIGHT_COUNT: usize = 4;
/// Phase offsets of the four lamps, in the same units as `15 * t`
pub const POINT_LIGHT_PHASES: [f32; POINT_LIGHT_COUNT] = [0.0, 60.0, 120.0, 180.0];
pub const MOON_POSITION: Point3<f32> = Point3::new(-2.5, 2.5, -2.5);
pub const SHININESS: f32 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(1.0, -1.0, 1.0),
            ambient: Vector3::new(0.1275, 0.1275, 0.1275),
            diffuse: Vector3::new(0.4284, 0.4284, 0.4284),
            specular: Vector3::new(0.271906, 0.271906, 0.271906),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: Attenuation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: Attenuation,
    /// Cosine of the full-intensity cone half-angle
    pub inner_cutoff: f32,
    /// Cosine of the falloff cone half-angle
    pub outer_cutoff: f32,
}

/// Lamp power in `[0, 1]`: dark for the positive half of each sine period.
pub fn point_light_power(phase: f32, t: f32) -> f32 {
    1.0 - ((phase + t * 15.0) / 4.0).sin().max(0.0)
}

/// Vertical bob shared by the lamps and the phase-0 star.
pub fn lamp_bob(t: f32) -> f32 {
    ((t * 15.0) / 4.0).sin() / 10.0
}

fn point_light(position: Point3<f32>, power: f32) -> PointLight {
    PointLight {
        position,
        ambient: Vector3::new(0.1 + power * 0.1, 0.01, 0.01),
        diffuse: Vector3::new(power * 0.4, 0.1, 0.1),
        specular: Vector3::new(power, 0.1, 0.1),
        attenuation: Attenuation {
            constant: 1.0,
            linear: 0.7,
            quadratic: 1.8,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
}

impl LightRig {
    /// Lights at time `t`, with the spotlight aimed at `spot_target`.
    ///
    /// Positions are given in scene space and moved by `root`, the same
    /// transform applied to every object.
    pub fn at(t: f32, spot_target: Point3<f32>, root: Matrix4<f32>) -> Self {
        let bob = lamp_bob(t);
        let positions = [
            Point3::new(1.34, 1.25 + bob, -1.34),
            Point3::new(-1.34, 1.25 + bob, -1.34),
            Point3::new(1.4, 1.05 + bob, 1.4),
            Point3::new(-1.4, 1.05 + bob, 1.4),
        ];

        let points = std::array::from_fn(|k| {
            point_light(
                root.transform_point(positions[k]),
                point_light_power(POINT_LIGHT_PHASES[k], t),
            )
        });

        let moon = root.transform_point(MOON_POSITION);
        let target = root.transform_point(spot_target);
        let colour = Vector3::new(0.8, 0.1, 0.8);

        let spot = SpotLight {
            position: moon,
            direction: (target - moon).normalize(),
            ambient: colour,
            diffuse: colour,
            specular: colour,
            attenuation: Attenuation {
                constant: 1.0,
                linear: 0.092,
                quadratic: 0.032,
            },
            inner_cutoff: 13.5f32.to_radians().cos(),
            outer_cutoff: 17.5f32.to_radians().cos(),
        };

        Self {
            directional: DirectionalLight::default(),
            points,
            spot,
        }
    }
}
