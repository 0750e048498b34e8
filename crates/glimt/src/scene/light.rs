//! Scene lights.
//!
//! Three variants share a color and an intensity; everything else is
//! per-variant. The factory constructors normalize directions and convert
//! spot cutoff angles from degrees to cosine form once, at creation, so the
//! render pass can upload the values untouched.

use glam::{Vec3, Vec4};

/// Distance attenuation constants for point lights.
///
/// The classic `1 / (constant + linear·d + quadratic·d²)` falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        // Covers roughly a 50-unit radius.
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Discriminant uploaded to the shader as `uWorld.lights[i].kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
}

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel rays from infinitely far away; only a direction.
    Directional {
        direction: Vec3,
        color: Vec4,
        intensity: f32,
    },
    /// Emits in all directions from a position, attenuated by distance.
    Point {
        position: Vec3,
        color: Vec4,
        intensity: f32,
        attenuation: Attenuation,
    },
    /// A cone: position + direction with inner/outer cutoffs stored as
    /// cosines of the half-angles.
    Spot {
        position: Vec3,
        direction: Vec3,
        color: Vec4,
        intensity: f32,
        inner_cutoff: f32,
        outer_cutoff: f32,
    },
}

impl Light {
    /// White directional light shining along `direction` (normalized here).
    pub fn directional(direction: Vec3) -> Self {
        Light::Directional {
            direction: direction.normalize_or_zero(),
            color: Vec4::ONE,
            intensity: 1.0,
        }
    }

    /// White point light at `position` with the default falloff.
    pub fn point(position: Vec3) -> Self {
        Light::Point {
            position,
            color: Vec4::ONE,
            intensity: 1.0,
            attenuation: Attenuation::default(),
        }
    }

    /// White spot light. Cutoff half-angles are given in degrees and stored
    /// as cosines.
    pub fn spot(position: Vec3, direction: Vec3, inner_deg: f32, outer_deg: f32) -> Self {
        Light::Spot {
            position,
            direction: direction.normalize_or_zero(),
            color: Vec4::ONE,
            intensity: 1.0,
            inner_cutoff: inner_deg.to_radians().cos(),
            outer_cutoff: outer_deg.to_radians().cos(),
        }
    }

    /// Replace the light color.
    pub fn with_color(mut self, new_color: Vec4) -> Self {
        match &mut self {
            Light::Directional { color, .. }
            | Light::Point { color, .. }
            | Light::Spot { color, .. } => *color = new_color,
        }
        self
    }

    /// Replace the intensity multiplier.
    pub fn with_intensity(mut self, new_intensity: f32) -> Self {
        match &mut self {
            Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Spot { intensity, .. } => *intensity = new_intensity,
        }
        self
    }

    pub fn kind(&self) -> LightKind {
        match self {
            Light::Directional { .. } => LightKind::Directional,
            Light::Point { .. } => LightKind::Point,
            Light::Spot { .. } => LightKind::Spot,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            LightKind::Directional => "directional",
            LightKind::Point => "point",
            LightKind::Spot => "spot",
        }
    }

    pub fn color(&self) -> Vec4 {
        match self {
            Light::Directional { color, .. }
            | Light::Point { color, .. }
            | Light::Spot { color, .. } => *color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Spot { intensity, .. } => *intensity,
        }
    }

    /// World position; the origin for directional lights, which have none.
    pub fn position(&self) -> Vec3 {
        match self {
            Light::Directional { .. } => Vec3::ZERO,
            Light::Point { position, .. } | Light::Spot { position, .. } => *position,
        }
    }

    /// Direction of emission; straight down for point lights, which have none.
    pub fn direction(&self) -> Vec3 {
        match self {
            Light::Directional { direction, .. } | Light::Spot { direction, .. } => *direction,
            Light::Point { .. } => Vec3::NEG_Y,
        }
    }

    /// Falloff constants; the defaults for variants without attenuation.
    pub fn attenuation(&self) -> Attenuation {
        match self {
            Light::Point { attenuation, .. } => *attenuation,
            _ => Attenuation::default(),
        }
    }

    /// `(inner, outer)` cutoff cosines; the default cone for non-spots so
    /// the uniform slots always carry usable values.
    pub fn cutoffs(&self) -> (f32, f32) {
        match self {
            Light::Spot {
                inner_cutoff,
                outer_cutoff,
                ..
            } => (*inner_cutoff, *outer_cutoff),
            _ => (
                12.5_f32.to_radians().cos(),
                17.5_f32.to_radians().cos(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_normalizes_direction() {
        let light = Light::directional(Vec3::new(0.0, -2.0, 0.0));
        assert!((light.direction().length() - 1.0).abs() < 1e-6);
        assert_eq!(light.direction(), Vec3::NEG_Y);
        assert_eq!(light.kind(), LightKind::Directional);
    }

    #[test]
    fn spot_converts_cutoff_degrees_to_cosines() {
        let light = Light::spot(Vec3::ZERO, Vec3::NEG_Z, 12.5, 17.5);
        let (inner, outer) = light.cutoffs();
        assert!((inner - 12.5_f32.to_radians().cos()).abs() < 1e-6);
        assert!((outer - 17.5_f32.to_radians().cos()).abs() < 1e-6);
        // Cosines flip the ordering: a tighter angle has the larger cosine.
        assert!(inner > outer);
    }

    #[test]
    fn builders_override_shared_fields() {
        let light = Light::point(Vec3::ONE)
            .with_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
            .with_intensity(2.5);
        assert_eq!(light.color(), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(light.intensity(), 2.5);
        assert_eq!(light.position(), Vec3::ONE);
    }

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let light = Light::directional(Vec3::NEG_Y);
        assert_eq!(light.position(), Vec3::ZERO);
        assert_eq!(light.attenuation(), Attenuation::default());

        let point = Light::point(Vec3::ZERO);
        assert_eq!(point.direction(), Vec3::NEG_Y);
    }
}
