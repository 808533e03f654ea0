/// Per-player parameters that don't belong on the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    /// Eye height above the ground plane
    pub height: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self { height: 1.0 }
    }
}

/// Scale change per scrolled wheel line
pub const SCROLL_STEP: f32 = 0.1;

/// Uniform scale applied to the whole scene.
///
/// The factor only changes through [`SceneScale::grow`], [`SceneScale::shrink`]
/// and [`SceneScale::scroll`], and always stays within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneScale {
    factor: f32,
    /// Change per second while grow/shrink is held
    step: f32,
    min: f32,
    max: f32,
}

impl Default for SceneScale {
    fn default() -> Self {
        Self::new(0.5, 0.1, 5.0)
    }
}

impl SceneScale {
    pub fn new(step: f32, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            factor: 1.0f32.clamp(min, max),
            step,
            min,
            max,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn grow(&mut self, dt: f32) {
        self.adjust(self.step * dt);
    }

    pub fn shrink(&mut self, dt: f32) {
        self.adjust(-self.step * dt);
    }

    /// Positive lines scroll up and grow the scene.
    pub fn scroll(&mut self, lines: f32) {
        self.adjust(lines * SCROLL_STEP);
    }

    fn adjust(&mut self, delta: f32) {
        self.factor = (self.factor + delta).clamp(self.min, self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_unit_scale() {
        assert_eq!(SceneScale::default().factor(), 1.0);
        assert_eq!(PlayerState::default().height, 1.0);
    }

    #[test]
    fn test_grow_and_shrink_scale_with_dt() {
        let mut scale = SceneScale::new(0.5, 0.1, 5.0);
        scale.grow(1.0);
        assert!((scale.factor() - 1.5).abs() < 1e-6);
        scale.shrink(0.5);
        assert!((scale.factor() - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_scroll_adds_a_tenth_per_line() {
        let mut scale = SceneScale::default();
        scale.scroll(3.0);
        assert!((scale.factor() - 1.3).abs() < 1e-6);
        scale.scroll(-1.0);
        assert!((scale.factor() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_factor_is_clamped() {
        let mut scale = SceneScale::new(0.5, 0.1, 5.0);
        scale.scroll(1000.0);
        assert_eq!(scale.factor(), 5.0);
        for _ in 0..1000 {
            scale.shrink(1.0);
        }
        assert_eq!(scale.factor(), 0.1);
    }

    #[test]
    fn test_swapped_bounds_are_fixed_up() {
        let scale = SceneScale::new(0.5, 5.0, 0.1);
        assert_eq!(scale.bounds(), (0.1, 5.0));
    }
}
