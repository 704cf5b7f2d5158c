//! Component data owned by [`CoreScene`](crate::CoreScene).

use engine_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D velocity component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    /// Linear velocity in world units per second.
    pub linear: Vec3,
    /// Angular speed around the up axis, radians per second.
    pub spin: f32,
}

impl Velocity {
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        spin: 0.0,
    };

    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
            spin: 0.0,
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Current and maximum hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub invulnerable: bool,
}

impl Health {
    /// Full health at `max` hit points.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self {
            current: max,
            max,
            invulnerable: false,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Apply damage, clamping to zero. Returns the damage actually taken.
    pub fn damage(&mut self, amount: f32) -> f32 {
        if self.invulnerable {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        before - self.current
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full(100.0)
    }
}

/// Display name and scene layer of an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Name {
    pub value: String,
    /// One of the scene's layer names.
    pub layer: String,
    pub notes: String,
}

impl Name {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            value: name.into(),
            ..Self::default()
        }
    }
}

/// A renderable mesh reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshRef {
    /// Path of the model resource.
    pub asset_path: String,
    pub cast_shadows: bool,
    /// Render layer mask.
    pub layer_mask: u32,
}

impl MeshRef {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            asset_path: path.into(),
            cast_shadows: true,
            layer_mask: 1,
        }
    }
}

/// The shape of a light's falloff.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LightKind {
    #[default]
    Point,
    Spot,
    Directional,
}

impl LightKind {
    pub const NAMES: &'static [&'static str] = &["point", "spot", "directional"];
}

impl From<LightKind> for i32 {
    fn from(kind: LightKind) -> i32 {
        kind as i32
    }
}

impl TryFrom<i32> for LightKind {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        match value {
            0 => Ok(LightKind::Point),
            1 => Ok(LightKind::Spot),
            2 => Ok(LightKind::Directional),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// Linear RGB colour.
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    /// Spot cone half angle, radians.
    pub cone: f32,
}

impl Light {
    /// Set the colour from a packed RGBA value, ignoring alpha.
    pub fn tint(&mut self, color: Color) {
        self.color = color.to_vec3();
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            cone: std::f32::consts::FRAC_PI_4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SplinePoint {
    pub position: Vec3,
    pub weight: f32,
}

/// A polyline of weighted control points.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Spline {
    pub points: Vec<SplinePoint>,
    pub closed: bool,
}

impl Spline {
    /// Sum of segment lengths, including the closing segment when closed.
    #[must_use]
    pub fn length(&self) -> f32 {
        let open: f32 = self
            .points
            .windows(2)
            .map(|w| w[0].position.distance(w[1].position))
            .sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 2 => {
                open + last.position.distance(first.position)
            }
            _ => open,
        }
    }
}

/// Keyframed scalar curve, stored as an opaque blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    /// `(time, value)` keys sorted by time.
    pub keys: Vec<(f32, f32)>,
}

impl Curve {
    /// Linear interpolation between the surrounding keys; clamped at the ends.
    #[must_use]
    pub fn sample(&self, t: f32) -> f32 {
        let Some(&(first_t, first_v)) = self.keys.first() else {
            return 0.0;
        };
        if t <= first_t {
            return first_v;
        }
        for pair in self.keys.windows(2) {
            let ((t0, v0), (t1, v1)) = (pair[0], pair[1]);
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                return v0 + (v1 - v0) * (t - t0) / span;
            }
        }
        self.keys.last().map_or(first_v, |&(_, v)| v)
    }
}

/// Scene-wide fog parameters, reflected as a struct.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FogSettings {
    pub enabled: bool,
    pub density: f32,
    pub color: Vec3,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            density: 0.02,
            color: Vec3::splat(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_default() {
        assert_eq!(Velocity::default(), Velocity::ZERO);
    }

    #[test]
    fn test_health_damage_and_heal() {
        let mut h = Health::full(100.0);
        assert_eq!(h.damage(30.0), 30.0);
        assert_eq!(h.current, 70.0);
        h.heal(50.0);
        assert_eq!(h.current, 100.0);
        assert_eq!(h.damage(150.0), 100.0);
        assert!(!h.is_alive());
    }

    #[test]
    fn test_invulnerable_takes_no_damage() {
        let mut h = Health::full(10.0);
        h.invulnerable = true;
        assert_eq!(h.damage(5.0), 0.0);
        assert_eq!(h.current, 10.0);
    }

    #[test]
    fn test_light_kind_conversions() {
        assert_eq!(i32::from(LightKind::Directional), 2);
        assert_eq!(LightKind::try_from(1), Ok(LightKind::Spot));
        assert_eq!(LightKind::try_from(7), Err(7));
        assert_eq!(LightKind::NAMES.len(), 3);
    }

    #[test]
    fn test_light_tint() {
        let mut light = Light::default();
        light.tint(Color::RED);
        assert_eq!(light.color, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_spline_length() {
        let mut spline = Spline {
            points: vec![
                SplinePoint { position: Vec3::ZERO, weight: 1.0 },
                SplinePoint { position: Vec3::X, weight: 1.0 },
                SplinePoint { position: Vec3::new(1.0, 1.0, 0.0), weight: 1.0 },
            ],
            closed: false,
        };
        assert!((spline.length() - 2.0).abs() < 1e-6);
        spline.closed = true;
        assert!((spline.length() - (2.0 + 2f32.sqrt())).abs() < 1e-6);
    }

    #[test]
    fn test_curve_sampling() {
        let curve = Curve {
            keys: vec![(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)],
        };
        assert_eq!(curve.sample(-1.0), 0.0);
        assert_eq!(curve.sample(0.5), 5.0);
        assert_eq!(curve.sample(1.5), 5.0);
        assert_eq!(curve.sample(3.0), 0.0);
        assert_eq!(Curve::default().sample(1.0), 0.0);
    }
}
