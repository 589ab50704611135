use crate::{
    body::{Body, BodyId},
    config::{CollisionMode, Scheme, UniverseConfig},
    diagnostics,
};

use broccoli::aabb::Rect;
use log::debug;
use ultraviolet::DVec2;

/// One body absorbed by another during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merge {
    pub survivor: BodyId,
    pub absorbed: BodyId,
}

/// What happened during a step besides motion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub merges: Vec<Merge>,
}

/// Direct-summation gravity integrator.
///
/// Every unordered pair attracts with `G * m_i * m_j / max(r, r_min)^2`.
/// The cost is O(n^2) per step, which is fine for tens to hundreds of bodies.
#[derive(Clone, Debug)]
pub struct Integrator {
    /// Gravitational constant.
    pub g: f64,
    /// Minimum separation substituted into the force law.
    pub softening: f64,
    pub scheme: Scheme,
    pub collision: CollisionMode,
    /// Per-body acceleration scratch, reused between steps.
    acc: Vec<DVec2>,
}

impl Integrator {
    pub fn new(config: &UniverseConfig) -> Self {
        Self {
            g: config.gravitational_constant,
            softening: config.softening_length,
            scheme: config.scheme,
            collision: config.collision,
            acc: Vec::new(),
        }
    }

    /// Integrator with explicit constants, symplectic Euler and pass-through collisions.
    pub fn with_constants(g: f64, softening: f64) -> Self {
        Self {
            g,
            softening,
            scheme: Scheme::SymplecticEuler,
            collision: CollisionMode::PassThrough,
            acc: Vec::new(),
        }
    }

    /// Gravitational accelerations of all bodies at their current positions.
    pub fn accelerations(&mut self, bodies: &[Body]) -> &[DVec2] {
        self.attract(bodies);
        &self.acc
    }

    /// Kinetic plus potential energy under this integrator's force law.
    pub fn total_energy(&self, bodies: &[Body]) -> f64 {
        diagnostics::kinetic_energy(bodies)
            + diagnostics::potential_energy(bodies, self.g, self.softening)
    }

    /// Advances every body by `dt`.
    /// A zero, negative or non-finite `dt` leaves the bodies untouched.
    pub fn step(&mut self, bodies: &mut Vec<Body>, dt: f64) -> StepReport {
        if bodies.is_empty() || !(dt.is_finite() && dt > 0.0) {
            return StepReport::default();
        }

        match self.scheme {
            Scheme::SymplecticEuler => {
                self.attract(bodies);
                self.kick(bodies, dt);
                self.drift(bodies, dt);
            }
            Scheme::VelocityVerlet => {
                let half_dt = 0.5 * dt;
                self.attract(bodies);
                self.kick(bodies, half_dt);
                self.drift(bodies, dt);
                self.attract(bodies);
                self.kick(bodies, half_dt);
            }
        }

        match self.collision {
            CollisionMode::PassThrough => StepReport::default(),
            CollisionMode::Merge => StepReport {
                merges: self.collide(bodies),
            },
        }
    }

    /// Fills the acceleration buffer by pairwise summation.
    /// Coincident centres exert no force on each other.
    fn attract(&mut self, bodies: &[Body]) {
        let n = bodies.len();
        self.acc.clear();
        self.acc.resize(n, DVec2::zero());

        for i in 0..n {
            for j in (i + 1)..n {
                let d = bodies[j].pos - bodies[i].pos;
                let r_sq = d.mag_sq();
                if r_sq == 0.0 {
                    continue;
                }

                let r = r_sq.sqrt();
                let clamped = r.max(self.softening);
                // G / max(r, r_min)^2 along the unit vector d / r.
                let f = self.g / (clamped * clamped * r);

                self.acc[i] += d * (f * bodies[j].mass);
                self.acc[j] -= d * (f * bodies[i].mass);
            }
        }
    }

    fn kick(&self, bodies: &mut [Body], dt: f64) {
        for (body, acc) in bodies.iter_mut().zip(&self.acc) {
            body.kick(*acc, dt);
        }
    }

    fn drift(&self, bodies: &mut [Body], dt: f64) {
        for body in bodies.iter_mut() {
            body.drift(dt);
        }
    }

    /// Merges overlapping bodies.
    /// Uses the `broccoli` crate as a broad phase, then checks each candidate pair exactly.
    fn collide(&self, bodies: &mut Vec<Body>) -> Vec<Merge> {
        let mut rects = bodies
            .iter()
            .enumerate()
            .map(|(index, body)| {
                // Pad for the f32 rounding of the broad phase.
                let pad = body.radius * 1e-3 + (body.pos.x.abs() + body.pos.y.abs()) * 1e-6;
                let extent = body.radius + pad;
                let min = body.pos - DVec2::one() * extent;
                let max = body.pos + DVec2::one() * extent;
                (
                    Rect::new(min.x as f32, max.x as f32, min.y as f32, max.y as f32),
                    index,
                )
            })
            .collect::<Vec<_>>();

        let mut candidates = Vec::new();
        let mut broccoli = broccoli::Tree::new(&mut rects);
        broccoli.find_colliding_pairs(|i, j| {
            let i = *i.unpack_inner();
            let j = *j.unpack_inner();
            candidates.push((i.min(j), i.max(j)));
        });

        // Resolve in index order so the outcome does not depend on tree traversal.
        candidates.sort_unstable();
        candidates.dedup();

        let mut absorbed = vec![false; bodies.len()];
        let mut merges = Vec::new();
        for (i, j) in candidates {
            if absorbed[i] || absorbed[j] || !bodies[i].overlaps(&bodies[j]) {
                continue;
            }

            let (keep, lose) = if heavier(&bodies[i], &bodies[j]) {
                (i, j)
            } else {
                (j, i)
            };
            let loser = bodies[lose];
            absorb(&mut bodies[keep], &loser);
            absorbed[lose] = true;

            debug!("{} absorbed {}", bodies[keep].name(), loser.name());
            merges.push(Merge {
                survivor: bodies[keep].id,
                absorbed: loser.id,
            });
        }

        if !merges.is_empty() {
            let mut index = 0;
            bodies.retain(|_| {
                let keep = !absorbed[index];
                index += 1;
                keep
            });
        }
        merges
    }
}

/// Heavier body wins; equal masses go to the older id.
fn heavier(a: &Body, b: &Body) -> bool {
    a.mass > b.mass || (a.mass == b.mass && a.id < b.id)
}

/// Mass- and momentum-conserving absorption of `other` into `body`.
/// The survivor moves to the pair's centre of mass and keeps its kind.
fn absorb(body: &mut Body, other: &Body) {
    let mass = body.mass + other.mass;
    body.pos = (body.pos * body.mass + other.pos * other.mass) / mass;
    body.vel = (body.momentum() + other.momentum()) / mass;
    body.mass = mass;
    body.radius = body.kind.radius_for(mass);
}
