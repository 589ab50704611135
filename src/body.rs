use crate::error::{Error, Result};
use ultraviolet::DVec2;

/// Stable identifier of a body within one generated universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of a body. Only generation and visual parameters depend on it,
/// every kind integrates the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BodyKind {
    Star = 0,
    Planet = 1,
    Asteroid = 2,
}

impl BodyKind {
    pub const ALL: [BodyKind; 3] = [BodyKind::Star, BodyKind::Planet, BodyKind::Asteroid];

    /// Radius per cube root of mass. Stars are dense, asteroids are loose rubble.
    pub const fn radius_factor(self) -> f64 {
        match self {
            BodyKind::Star => 0.4,
            BodyKind::Planet => 1.0,
            BodyKind::Asteroid => 1.5,
        }
    }

    /// Visual radius for a body of this kind: `k_kind * mass^(1/3)`.
    pub fn radius_for(self, mass: f64) -> f64 {
        self.radius_factor() * mass.cbrt()
    }

    /// Display colour as RGB.
    pub const fn color(self) -> [u8; 3] {
        match self {
            BodyKind::Star => [255, 255, 0],
            BodyKind::Planet => [0, 100, 255],
            BodyKind::Asteroid => [128, 128, 128],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::Asteroid => "Asteroid",
        }
    }
}

impl std::fmt::Display for BodyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composition {
    Rock,
    Ice,
    Metal,
}

/// Descriptive attributes drawn at generation time. They carry no physics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Traits {
    Star {
        /// Surface temperature in Kelvin.
        temperature: f64,
        /// Luminosity relative to the lightest configured star.
        luminosity: f64,
        /// Age in years.
        age: f64,
    },
    Planet {
        atmosphere: bool,
        water: bool,
        /// Surface temperature in Kelvin.
        temperature: f64,
        /// Star the planet was placed around, if any.
        parent: Option<BodyId>,
    },
    Asteroid {
        composition: Composition,
    },
}

impl Traits {
    pub fn default_for(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Star => Traits::Star {
                temperature: 5800.0,
                luminosity: 1.0,
                age: 4.6e9,
            },
            BodyKind::Planet => Traits::Planet {
                atmosphere: false,
                water: false,
                temperature: 288.0,
                parent: None,
            },
            BodyKind::Asteroid => Traits::Asteroid {
                composition: Composition::Rock,
            },
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            Traits::Star { .. } => BodyKind::Star,
            Traits::Planet { .. } => BodyKind::Planet,
            Traits::Asteroid { .. } => BodyKind::Asteroid,
        }
    }
}

/// Represents a celestial body in the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    /// Position vector.
    pub pos: DVec2,
    /// Velocity vector.
    pub vel: DVec2,
    /// Mass of the body.
    pub mass: f64,
    /// Visual and collision radius of the body.
    pub radius: f64,
    pub traits: Traits,
}

impl Body {
    /// Creates a new body, deriving its radius from mass and kind.
    /// Fails if `mass` is not a positive finite number.
    pub fn new(id: BodyId, kind: BodyKind, pos: DVec2, vel: DVec2, mass: f64) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::invalid(
                "mass",
                format!("must be positive and finite, got {}", mass),
            ));
        }

        Ok(Self {
            id,
            kind,
            pos,
            vel,
            mass,
            radius: kind.radius_for(mass),
            traits: Traits::default_for(kind),
        })
    }

    /// Replaces the descriptive traits. Traits of another kind are ignored.
    pub fn with_traits(mut self, traits: Traits) -> Self {
        if traits.kind() == self.kind {
            self.traits = traits;
        }
        self
    }

    pub fn color(&self) -> [u8; 3] {
        self.kind.color()
    }

    /// Human readable name such as `Planet-014`.
    pub fn name(&self) -> String {
        format!("{}-{:03}", self.kind, self.id.0)
    }

    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.mag_sq()
    }

    /// Velocity half of a semi-implicit Euler step.
    pub fn kick(&mut self, acc: DVec2, dt: f64) {
        self.vel += acc * dt;
    }

    /// Position half of a semi-implicit Euler step, using the already updated velocity.
    pub fn drift(&mut self, dt: f64) {
        self.pos += self.vel * dt;
    }

    /// Whether the two bodies' discs overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        let r = self.radius + other.radius;
        (other.pos - self.pos).mag_sq() < r * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_with_mass() {
        for kind in BodyKind::ALL {
            let small = Body::new(BodyId(0), kind, DVec2::zero(), DVec2::zero(), 1.0).unwrap();
            let large = Body::new(BodyId(1), kind, DVec2::zero(), DVec2::zero(), 8.0).unwrap();
            assert!(small.radius > 0.0);
            assert!((large.radius - 2.0 * small.radius).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_non_positive_mass() {
        for mass in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = Body::new(BodyId(0), BodyKind::Planet, DVec2::zero(), DVec2::zero(), mass)
                .unwrap_err();
            assert_eq!(err.parameter(), "mass");
        }
    }

    #[test]
    fn kick_then_drift_uses_new_velocity() {
        let mut body =
            Body::new(BodyId(3), BodyKind::Asteroid, DVec2::zero(), DVec2::zero(), 1.0).unwrap();
        body.kick(DVec2::new(2.0, 0.0), 0.5);
        body.drift(0.5);
        assert_eq!(body.vel, DVec2::new(1.0, 0.0));
        assert_eq!(body.pos, DVec2::new(0.5, 0.0));
    }

    #[test]
    fn traits_of_other_kind_are_ignored() {
        let star = Body::new(BodyId(0), BodyKind::Star, DVec2::zero(), DVec2::zero(), 10.0)
            .unwrap()
            .with_traits(Traits::Asteroid {
                composition: Composition::Ice,
            });
        assert_eq!(star.traits.kind(), BodyKind::Star);
        assert_eq!(star.name(), "Star-000");
        assert_eq!(star.color(), [255, 255, 0]);
    }
}
