use crate::body::{Body, BodyId, BodyKind, Composition, Traits};
use crate::config::{OrbitDistribution, Range, UniverseConfig};
use crate::error::Result;
use log::{debug, warn};
use std::f64::consts::TAU;
use ultraviolet::DVec2;

/// Builds initial universes from a validated [`UniverseConfig`].
///
/// Generation is a pure function of the config and the seed: all randomness
/// comes from one `fastrand::Rng` seeded per call.
#[derive(Clone, Debug)]
pub struct Generator {
    config: UniverseConfig,
}

/// Speed of a circular orbit of radius `r` around mass `m`.
pub fn circular_speed(g: f64, m: f64, r: f64) -> f64 {
    (g * m / r).sqrt()
}

fn uniform(rng: &mut fastrand::Rng, range: Range<f64>) -> f64 {
    range.min + rng.f64() * (range.max - range.min)
}

/// Log-uniform draw, so small values are as likely per decade as large ones.
fn log_uniform(rng: &mut fastrand::Rng, range: Range<f64>) -> f64 {
    let (lo, hi) = (range.min.ln(), range.max.ln());
    (lo + rng.f64() * (hi - lo)).exp().clamp(range.min, range.max)
}

fn unit_vector(angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(cos, sin)
}

/// Counter-clockwise tangent to `offset`.
fn perpendicular(offset: DVec2) -> DVec2 {
    DVec2::new(-offset.y, offset.x) / offset.mag()
}

fn is_clear(bodies: &[Body], pos: DVec2, radius: f64, clearance: f64) -> bool {
    bodies
        .iter()
        .all(|b| (b.pos - pos).mag() >= b.radius + radius + clearance)
}

impl Generator {
    /// Validates `config` and wraps it.
    pub fn new(config: UniverseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Generates a fresh universe with ids assigned from zero in creation order.
    pub fn generate(&self, seed: u64) -> Result<Vec<Body>> {
        self.generate_from(seed, 0)
    }

    /// Generates a fresh universe whose ids count up from `first_id`.
    /// Apart from the ids, the result does not depend on `first_id`.
    ///
    /// - Stars come first. The primary sits at rest on the origin, the others
    ///   circle it on wide orbits.
    /// - Planets and asteroids are placed around a random star and given the
    ///   circular-orbit velocity of their dominant attractor.
    /// - Placements overlapping an existing body are resampled; a body that
    ///   still does not fit after `max_placement_attempts` is dropped.
    pub fn generate_from(&self, seed: u64, first_id: u32) -> Result<Vec<Body>> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut bodies = Vec::new();

        self.place_stars(&mut rng, &mut bodies, first_id)?;
        let star_count = bodies.len();

        let count = &self.config.body_count;
        let wanted = rng.usize(count.min..=count.max);
        for _ in 0..wanted {
            if let Some(body) = self.place_orbiter(&mut rng, &bodies, star_count, first_id)? {
                bodies.push(body);
            }
        }

        debug!(
            "generated {} stars and {} orbiting bodies from seed {}",
            star_count,
            bodies.len() - star_count,
            seed
        );
        Ok(bodies)
    }

    fn next_id(bodies: &[Body], first_id: u32) -> BodyId {
        BodyId(first_id + bodies.len() as u32)
    }

    fn star_traits(&self, rng: &mut fastrand::Rng, mass: f64) -> Traits {
        Traits::Star {
            temperature: 3000.0 + rng.f64() * 47_000.0,
            luminosity: mass / self.config.mass.star.min,
            age: rng.f64() * 1.0e10,
        }
    }

    fn place_stars(
        &self,
        rng: &mut fastrand::Rng,
        bodies: &mut Vec<Body>,
        first_id: u32,
    ) -> Result<()> {
        let config = &self.config;
        let count = rng.usize(config.star_count.min..=config.star_count.max);
        let g = config.gravitational_constant;

        let mass = log_uniform(rng, config.mass.star);
        let primary = Body::new(
            Self::next_id(bodies, first_id),
            BodyKind::Star,
            DVec2::zero(),
            DVec2::zero(),
            mass,
        )?;
        let traits = self.star_traits(rng, mass);
        bodies.push(primary.with_traits(traits));

        for _ in 1..count {
            let mass = log_uniform(rng, config.mass.star);
            let radius = BodyKind::Star.radius_for(mass);

            let placed = (0..config.max_placement_attempts).find_map(|_| {
                let pos = unit_vector(rng.f64() * TAU) * uniform(rng, config.star_separation);
                is_clear(bodies, pos, radius, config.min_clearance).then_some(pos)
            });
            let Some(pos) = placed else {
                warn!(
                    "no room for star {} after {} attempts",
                    bodies.len(),
                    config.max_placement_attempts
                );
                continue;
            };

            let primary = bodies[0];
            let offset = pos - primary.pos;
            let vel = primary.vel
                + perpendicular(offset) * circular_speed(g, primary.mass, offset.mag());

            let star = Body::new(Self::next_id(bodies, first_id), BodyKind::Star, pos, vel, mass)?;
            let traits = self.star_traits(rng, mass);
            bodies.push(star.with_traits(traits));
        }
        Ok(())
    }

    fn orbit_distance(&self, rng: &mut fastrand::Rng) -> f64 {
        let range = self.config.orbit_radius;
        match self.config.orbit_distribution {
            OrbitDistribution::Uniform => uniform(rng, range),
            OrbitDistribution::Exponential => {
                // Inverse CDF of an exponential truncated to [0, max - min].
                let scale = self.config.orbit_scale;
                let tail = 1.0 - (-(range.max - range.min) / scale).exp();
                let d = -scale * (1.0 - rng.f64() * tail).ln();
                (range.min + d).clamp(range.min, range.max)
            }
        }
    }

    /// Star pulling hardest on `pos`.
    fn dominant_attractor(stars: &[Body], pos: DVec2) -> &Body {
        let pull = |s: &Body| s.mass / (s.pos - pos).mag_sq();
        stars
            .iter()
            .max_by(|a, b| pull(a).total_cmp(&pull(b)))
            .unwrap_or(&stars[0])
    }

    fn place_orbiter(
        &self,
        rng: &mut fastrand::Rng,
        bodies: &[Body],
        star_count: usize,
        first_id: u32,
    ) -> Result<Option<Body>> {
        let config = &self.config;
        let stars = &bodies[..star_count];

        let kind = if rng.f64() < config.planet_fraction {
            BodyKind::Planet
        } else {
            BodyKind::Asteroid
        };
        let mass = log_uniform(rng, config.mass.for_kind(kind));
        let radius = kind.radius_for(mass);

        let placed = (0..config.max_placement_attempts).find_map(|_| {
            let host = &stars[rng.usize(..stars.len())];
            let pos = host.pos + unit_vector(rng.f64() * TAU) * self.orbit_distance(rng);
            is_clear(bodies, pos, radius, config.min_clearance).then_some(pos)
        });
        let Some(pos) = placed else {
            warn!(
                "dropping {} of mass {:.3} after {} placement attempts",
                kind, mass, config.max_placement_attempts
            );
            return Ok(None);
        };

        let primary = Self::dominant_attractor(stars, pos);
        let offset = pos - primary.pos;
        let perturbation = 1.0 + config.eccentricity * (2.0 * rng.f64() - 1.0);
        let speed = circular_speed(config.gravitational_constant, primary.mass, offset.mag());
        let vel = primary.vel + perpendicular(offset) * speed * perturbation;

        let traits = match kind {
            BodyKind::Planet => Traits::Planet {
                atmosphere: rng.bool(),
                water: rng.bool(),
                temperature: 200.0 + rng.f64() * 200.0,
                parent: Some(primary.id),
            },
            _ => Traits::Asteroid {
                composition: match rng.usize(..3) {
                    0 => Composition::Rock,
                    1 => Composition::Ice,
                    _ => Composition::Metal,
                },
            },
        };

        let body = Body::new(Self::next_id(bodies, first_id), kind, pos, vel, mass)?;
        Ok(Some(body.with_traits(traits)))
    }
}
