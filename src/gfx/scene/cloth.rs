//! Procedural rug.
//!
//! The rug is a grid of thin cubes whose height and tilt are pure functions
//! of the grid indices and time; nothing is carried between frames.

use cgmath::{Deg, Matrix4, Point3, Vector3};

/// Cells along X are `0..=WIDTH_CELLS`
pub const WIDTH_CELLS: u32 = 25;
/// Cells along Z are `0..=HEIGHT_CELLS`
pub const HEIGHT_CELLS: u32 = 50;
pub const CELL_SPACING: f32 = 0.02;
pub const CELL_SCALE: [f32; 3] = [0.05, 0.01, 0.05];
/// Cell the spotlight aims at
pub const CENTRE_CELL: (u32, u32) = (13, 25);
/// Corner of cell (0, 0) when nothing is configured
pub const DEFAULT_ORIGIN: [f32; 2] = [-0.6, -0.3];

/// Horizontal run used when turning a height difference into an angle
const TILT_RUN: f32 = 0.01;
/// Degrees of tilt per unit of half-angle
const TILT_GAIN: f32 = 120.0;

pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Wave offset of the two index terms at time `t`.
fn wave(i: f32, j: f32, t: f32, period: f32) -> f32 {
    ((i + t * 30.0) / period).sin() / 120.0 + ((j + t * 30.0) / period).sin() / 120.0
}

/// Height of cell `(i, j)` at time `t`.
pub fn cell_height(i: u32, j: u32, t: f32) -> f32 {
    0.7 + (t * 1.5).sin() / 4.0 + wave(i as f32, j as f32, t, 4.0)
}

fn slope_z(i: f32, j: f32, t: f32) -> f32 {
    (t * 1.5).sin() / 3.0 + wave(i, j, t, 3.0)
}

fn slope_x(i: f32, j: f32, t: f32) -> f32 {
    (t * 1.5).sin() / 6.0 + wave(i, j, t, 4.0)
}

/// Half the angle of a rise `dy` over a fixed run.
pub fn tilt_angle(dy: f32) -> f32 {
    (dy / dy.hypot(TILT_RUN)).asin() / 2.0
}

/// Largest tilt, in degrees, a cell can take about either axis
pub const MAX_TILT_DEG: f32 = TILT_GAIN * std::f32::consts::FRAC_PI_4;

/// Tilt of cell `(i, j)` about Z and X, in degrees.
///
/// Z tilt follows the slope one cell ahead along the width index, X tilt one
/// cell ahead along the height index. X tilt is negated.
pub fn cell_tilt(i: u32, j: u32, t: f32) -> (f32, f32) {
    let (fi, fj) = (i as f32, j as f32);
    let dz = slope_z(fi + 1.0, fj, t) - slope_z(fi, fj, t);
    let dx = slope_x(fi, fj + 1.0, t) - slope_x(fi, fj, t);
    (tilt_angle(dz) * TILT_GAIN, -tilt_angle(dx) * TILT_GAIN)
}

/// Red centre stripe inside a yellow band, black border.
pub fn cell_color(i: u32, j: u32) -> [f32; 4] {
    let in_band = (5..=45).contains(&j);
    if in_band && 10 < i && i < 15 {
        RED
    } else if in_band && 5 < i && i < 20 {
        YELLOW
    } else {
        BLACK
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClothCell {
    pub i: u32,
    pub j: u32,
    /// Cell transform relative to the scene root
    pub transform: Matrix4<f32>,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloth {
    /// Corner of cell (0, 0) on the ground plane as (x, z)
    pub origin: [f32; 2],
}

impl Default for Cloth {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

impl Cloth {
    pub fn new(origin: [f32; 2]) -> Self {
        Self { origin }
    }

    pub fn nudge(&mut self, dx: f32, dz: f32) {
        self.origin[0] += dx;
        self.origin[1] += dz;
    }

    pub fn cell_position(&self, i: u32, j: u32, t: f32) -> Point3<f32> {
        Point3::new(
            self.origin[0] + i as f32 * CELL_SPACING,
            cell_height(i, j, t),
            self.origin[1] + j as f32 * CELL_SPACING,
        )
    }

    /// Spotlight target.
    pub fn centre(&self, t: f32) -> Point3<f32> {
        self.cell_position(CENTRE_CELL.0, CENTRE_CELL.1, t)
    }

    pub fn cell(&self, i: u32, j: u32, t: f32) -> ClothCell {
        let p = self.cell_position(i, j, t);
        let (tilt_z, tilt_x) = cell_tilt(i, j, t);
        let [sx, sy, sz] = CELL_SCALE;

        let transform = Matrix4::from_translation(Vector3::new(p.x, p.y, p.z))
            * Matrix4::from_nonuniform_scale(sx, sy, sz)
            * Matrix4::from_angle_z(Deg(tilt_z))
            * Matrix4::from_angle_x(Deg(tilt_x));

        ClothCell {
            i,
            j,
            transform,
            color: cell_color(i, j),
        }
    }

    pub fn cells(&self, t: f32) -> impl Iterator<Item = ClothCell> + '_ {
        (0..=WIDTH_CELLS)
            .flat_map(move |i| (0..=HEIGHT_CELLS).map(move |j| self.cell(i, j, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size() {
        let cloth = Cloth::default();
        assert_eq!(
            cloth.cells(0.0).count(),
            ((WIDTH_CELLS + 1) * (HEIGHT_CELLS + 1)) as usize
        );
    }

    #[test]
    fn test_rest_height_at_time_zero() {
        assert!((cell_height(0, 0, 0.0) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_same_time_same_cells() {
        let cloth = Cloth::default();
        let a: Vec<_> = cloth.cells(12.34).map(|c| c.transform).collect();
        let b: Vec<_> = cloth.cells(12.34).map(|c| c.transform).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tilt_is_bounded() {
        for step in 0..200 {
            let t = step as f32 * 0.173;
            for i in (0..=WIDTH_CELLS).step_by(3) {
                for j in (0..=HEIGHT_CELLS).step_by(5) {
                    let (z, x) = cell_tilt(i, j, t);
                    assert!(z.abs() <= MAX_TILT_DEG + 1e-3);
                    assert!(x.abs() <= MAX_TILT_DEG + 1e-3);
                    assert!(z.is_finite() && x.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_flat_slope_means_no_tilt() {
        assert_eq!(tilt_angle(0.0), 0.0);
        assert!(tilt_angle(1.0) > 0.0);
        assert!(tilt_angle(-1.0) < 0.0);
    }

    #[test]
    fn test_color_bands() {
        assert_eq!(cell_color(12, 25), RED);
        assert_eq!(cell_color(11, 5), RED);
        assert_eq!(cell_color(10, 25), YELLOW);
        assert_eq!(cell_color(15, 45), YELLOW);
        assert_eq!(cell_color(6, 25), YELLOW);
        assert_eq!(cell_color(5, 25), BLACK);
        assert_eq!(cell_color(20, 25), BLACK);
        assert_eq!(cell_color(12, 4), BLACK);
        assert_eq!(cell_color(12, 46), BLACK);
    }

    #[test]
    fn test_centre_follows_origin() {
        let mut cloth = Cloth::default();
        let before = cloth.centre(1.0);
        assert!((before.x - (-0.6 + 13.0 * CELL_SPACING)).abs() < 1e-6);
        assert!((before.z - (-0.3 + 25.0 * CELL_SPACING)).abs() < 1e-6);

        cloth.nudge(0.5, -0.25);
        let after = cloth.centre(1.0);
        assert!((after.x - before.x - 0.5).abs() < 1e-6);
        assert!((after.z - before.z + 0.25).abs() < 1e-6);
        assert_eq!(after.y, before.y);
    }
}
