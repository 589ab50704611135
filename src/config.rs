//! Tunable parameters for generation and integration.
//!
//! [`UniverseConfig`] is `serde`-deserializable so an outer layer can load it
//! from any format; every field has a default, so a partial document is
//! enough:
//!
//! ```yaml
//! star_count: { min: 1, max: 2 }
//! body_count: { min: 30, max: 80 }
//! orbit_distribution: exponential
//! orbit_scale: 150.0
//! collision: merge
//! time_step: 0.005
//! ```
//!
//! Validation happens once, when a [`Generator`](crate::Generator) or
//! [`Simulation`](crate::Simulation) is built or reconfigured, never while
//! stepping.

use crate::body::BodyKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T> Range<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// Mass range per body kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassRanges {
    pub star: Range<f64>,
    pub planet: Range<f64>,
    pub asteroid: Range<f64>,
}

impl Default for MassRanges {
    fn default() -> Self {
        Self {
            star: Range::new(5.0e4, 2.0e5),
            planet: Range::new(5.0, 50.0),
            asteroid: Range::new(0.01, 1.0),
        }
    }
}

impl MassRanges {
    pub fn for_kind(&self, kind: BodyKind) -> Range<f64> {
        match kind {
            BodyKind::Star => self.star,
            BodyKind::Planet => self.planet,
            BodyKind::Asteroid => self.asteroid,
        }
    }
}

/// How orbit distances are drawn from `orbit_radius`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitDistribution {
    #[default]
    Uniform,
    /// Exponential falloff from the inner edge with length `orbit_scale`,
    /// truncated to the range.
    Exponential,
}

/// Time integration scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Velocity update from the current force, then position from the new velocity.
    #[default]
    SymplecticEuler,
    /// Kick-drift-kick leapfrog, two force evaluations per step.
    VelocityVerlet,
}

/// What happens when two bodies overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Bodies interpenetrate; softening bounds the force.
    #[default]
    PassThrough,
    /// The lighter body is absorbed by the heavier one.
    Merge,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Number of stars; at least one.
    pub star_count: Range<usize>,
    /// Number of planets and asteroids.
    pub body_count: Range<usize>,
    pub mass: MassRanges,
    /// Distance of an orbiting body from its host star.
    pub orbit_radius: Range<f64>,
    pub orbit_distribution: OrbitDistribution,
    /// Length scale of the exponential orbit distribution.
    pub orbit_scale: f64,
    /// Distance of additional stars from the primary star.
    pub star_separation: Range<f64>,
    /// Probability that an orbiting body is a planet rather than an asteroid.
    pub planet_fraction: f64,
    /// Maximum relative perturbation of the circular orbit speed.
    pub eccentricity: f64,
    /// Extra gap required between bodies at generation time.
    pub min_clearance: f64,
    pub max_placement_attempts: u32,
    pub gravitational_constant: f64,
    /// Minimum separation used in the force law.
    pub softening_length: f64,
    pub time_step: f64,
    pub scheme: Scheme,
    pub collision: CollisionMode,
    /// Seed of the first universe and of the seed source used by unseeded resets.
    pub seed: u64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            star_count: Range::new(1, 3),
            body_count: Range::new(20, 60),
            mass: MassRanges::default(),
            orbit_radius: Range::new(60.0, 600.0),
            orbit_distribution: OrbitDistribution::Uniform,
            orbit_scale: 150.0,
            star_separation: Range::new(3000.0, 6000.0),
            planet_fraction: 0.3,
            eccentricity: 0.05,
            min_clearance: 1.0,
            max_placement_attempts: 32,
            gravitational_constant: 1.0,
            softening_length: 0.5,
            time_step: 0.01,
            scheme: Scheme::SymplecticEuler,
            collision: CollisionMode::PassThrough,
            seed: 0,
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(
            name,
            format!("must be positive and finite, got {}", value),
        ))
    }
}

fn check_positive_range(name: &'static str, range: Range<f64>) -> Result<()> {
    check_positive(name, range.min)?;
    check_positive(name, range.max)?;
    if range.min > range.max {
        return Err(Error::invalid(
            name,
            format!("min {} exceeds max {}", range.min, range.max),
        ));
    }
    Ok(())
}

fn check_count_range(name: &'static str, range: Range<usize>) -> Result<()> {
    if range.min > range.max {
        return Err(Error::invalid(
            name,
            format!("min {} exceeds max {}", range.min, range.max),
        ));
    }
    Ok(())
}

pub(crate) fn check_time_step(dt: f64) -> Result<()> {
    check_positive("time_step", dt)
}

impl UniverseConfig {
    /// Checks every parameter, reporting the first one out of range.
    pub fn validate(&self) -> Result<()> {
        check_count_range("star_count", self.star_count)?;
        if self.star_count.min == 0 {
            return Err(Error::invalid("star_count", "at least one star is required"));
        }
        check_count_range("body_count", self.body_count)?;

        check_positive_range("mass.star", self.mass.star)?;
        check_positive_range("mass.planet", self.mass.planet)?;
        check_positive_range("mass.asteroid", self.mass.asteroid)?;

        check_positive_range("orbit_radius", self.orbit_radius)?;
        check_positive("orbit_scale", self.orbit_scale)?;
        check_positive_range("star_separation", self.star_separation)?;

        if !(0.0..=1.0).contains(&self.planet_fraction) {
            return Err(Error::invalid(
                "planet_fraction",
                format!("must be within [0, 1], got {}", self.planet_fraction),
            ));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(Error::invalid(
                "eccentricity",
                format!("must be within [0, 1), got {}", self.eccentricity),
            ));
        }
        if !(self.min_clearance.is_finite() && self.min_clearance >= 0.0) {
            return Err(Error::invalid(
                "min_clearance",
                format!("must be non-negative, got {}", self.min_clearance),
            ));
        }
        if self.max_placement_attempts == 0 {
            return Err(Error::invalid("max_placement_attempts", "must be at least 1"));
        }

        check_positive("gravitational_constant", self.gravitational_constant)?;
        check_positive("softening_length", self.softening_length)?;
        check_time_step(self.time_step)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        UniverseConfig::default().validate().unwrap();
    }

    fn assert_rejected(name: &str, mutate: impl FnOnce(&mut UniverseConfig)) {
        let mut config = UniverseConfig::default();
        mutate(&mut config);
        let err = config.validate().unwrap_err();
        assert_eq!(err.parameter(), name, "{}", err);
    }

    #[test]
    fn rejects_each_bad_parameter_by_name() {
        assert_rejected("star_count", |c| c.star_count = Range::new(0, 2));
        assert_rejected("star_count", |c| c.star_count = Range::new(3, 1));
        assert_rejected("body_count", |c| c.body_count = Range::new(5, 4));
        assert_rejected("mass.star", |c| c.mass.star.min = 0.0);
        assert_rejected("mass.planet", |c| c.mass.planet = Range::new(10.0, 1.0));
        assert_rejected("mass.asteroid", |c| c.mass.asteroid.max = f64::NAN);
        assert_rejected("orbit_radius", |c| c.orbit_radius.min = -5.0);
        assert_rejected("orbit_scale", |c| c.orbit_scale = 0.0);
        assert_rejected("star_separation", |c| c.star_separation.max = 0.0);
        assert_rejected("planet_fraction", |c| c.planet_fraction = 1.5);
        assert_rejected("eccentricity", |c| c.eccentricity = 1.0);
        assert_rejected("min_clearance", |c| c.min_clearance = -1.0);
        assert_rejected("max_placement_attempts", |c| c.max_placement_attempts = 0);
        assert_rejected("gravitational_constant", |c| c.gravitational_constant = 0.0);
        assert_rejected("softening_length", |c| c.softening_length = -0.1);
        assert_rejected("time_step", |c| c.time_step = f64::INFINITY);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let yaml = "
star_count: { min: 2, max: 2 }
orbit_distribution: exponential
orbit_scale: 80.0
collision: merge
scheme: velocity_verlet
mass:
  planet: { min: 1.0, max: 2.0 }
";
        let config: UniverseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.star_count, Range::new(2, 2));
        assert_eq!(config.orbit_distribution, OrbitDistribution::Exponential);
        assert_eq!(config.orbit_scale, 80.0);
        assert_eq!(config.collision, CollisionMode::Merge);
        assert_eq!(config.scheme, Scheme::VelocityVerlet);
        assert_eq!(config.mass.planet, Range::new(1.0, 2.0));
        assert_eq!(config.mass.star, MassRanges::default().star);
        assert_eq!(config.time_step, UniverseConfig::default().time_step);
        config.validate().unwrap();
    }
}
