//! Conserved quantities and summary figures over a body set.

use crate::body::{Body, BodyKind};
use ultraviolet::DVec2;

/// Σ mᵢvᵢ
pub fn total_momentum(bodies: &[Body]) -> DVec2 {
    bodies
        .iter()
        .fold(DVec2::zero(), |acc, body| acc + body.momentum())
}

pub fn total_mass(bodies: &[Body]) -> f64 {
    bodies.iter().map(|b| b.mass).sum()
}

/// Mass-weighted mean position, `None` for an empty set.
pub fn center_of_mass(bodies: &[Body]) -> Option<DVec2> {
    let mass = total_mass(bodies);
    if bodies.is_empty() || mass <= 0.0 {
        return None;
    }
    let weighted = bodies
        .iter()
        .fold(DVec2::zero(), |acc, body| acc + body.pos * body.mass);
    Some(weighted / mass)
}

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Pairwise potential matching the softened force law.
///
/// Beyond `softening` this is the Newtonian `-G m_i m_j / r`. Inside it the
/// force is constant, so the potential continues linearly.
pub fn potential_energy(bodies: &[Body], g: f64, softening: f64) -> f64 {
    let mut energy = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let r = (b.pos - a.pos).mag();
            let gmm = g * a.mass * b.mass;
            energy += if r >= softening {
                -gmm / r
            } else {
                gmm * (r - 2.0 * softening) / (softening * softening)
            };
        }
    }
    energy
}

/// Body counts and totals for an info panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub stars: usize,
    pub planets: usize,
    pub asteroids: usize,
    pub total_mass: f64,
    /// Elapsed simulated time.
    pub time: f64,
    pub time_step: f64,
}

impl Statistics {
    pub fn from_bodies(bodies: &[Body], time: f64, time_step: f64) -> Self {
        let count = |kind: BodyKind| bodies.iter().filter(|b| b.kind == kind).count();
        Self {
            total: bodies.len(),
            stars: count(BodyKind::Star),
            planets: count(BodyKind::Planet),
            asteroids: count(BodyKind::Asteroid),
            total_mass: total_mass(bodies),
            time,
            time_step,
        }
    }
}
