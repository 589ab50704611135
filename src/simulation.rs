use crate::{
    body::{Body, BodyId},
    config::{check_time_step, UniverseConfig},
    diagnostics::Statistics,
    error::Result,
    generator::Generator,
    integrator::{Integrator, StepReport},
};

use log::{debug, info};
use ultraviolet::DVec2;

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Created, no universe generated yet.
    Uninitialized,
    Running,
    Paused,
}

/// Point-in-time copy of the simulation handed to renderers.
///
/// Owns its data, so it can be kept, mutated or sent to another thread
/// without touching the simulation it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub time: f64,
    pub frame: u64,
    pub state: State,
    pub seed: u64,
    /// Number of successful resets so far.
    pub generation: u64,
    pub bodies: Vec<Body>,
}

impl Snapshot {
    pub fn is_paused(&self) -> bool {
        self.state == State::Paused
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn nearest_body(&self, point: DVec2) -> Option<(BodyId, f64)> {
        nearest(&self.bodies, point)
    }
}

fn nearest(bodies: &[Body], point: DVec2) -> Option<(BodyId, f64)> {
    bodies
        .iter()
        .map(|b| (b.id, (b.pos - point).mag()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Owns the universe and its clock.
///
/// All calls must be serialized by the caller; nothing here blocks, reads the
/// wall clock or spawns threads.
pub struct Simulation {
    /// Time step used by [`Simulation::step`].
    dt: f64,
    /// Elapsed simulated time.
    time: f64,
    /// Number of integrator steps since the last reset.
    frame: u64,
    state: State,
    seed: u64,
    generation: u64,
    /// First id of the next generated universe. Ids are never reused.
    next_id: u32,
    /// Collection of all bodies in the simulation.
    bodies: Vec<Body>,
    generator: Generator,
    integrator: Integrator,
    /// Draws seeds for resets that do not name one.
    seed_source: fastrand::Rng,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("dt", &self.dt)
            .field("time", &self.time)
            .field("frame", &self.frame)
            .field("state", &self.state)
            .field("seed", &self.seed)
            .field("generation", &self.generation)
            .field("next_id", &self.next_id)
            .field("bodies", &self.bodies.len())
            .field("integrator", &self.integrator)
            .finish()
    }
}

impl Simulation {
    /// Validates `config` and creates an uninitialized simulation with no bodies.
    pub fn new(config: UniverseConfig) -> Result<Self> {
        let integrator = Integrator::new(&config);
        let dt = config.time_step;
        let seed = config.seed;
        let generator = Generator::new(config)?;

        Ok(Self {
            dt,
            time: 0.0,
            frame: 0,
            state: State::Uninitialized,
            seed,
            generation: 0,
            next_id: 0,
            bodies: Vec::new(),
            generator,
            integrator,
            seed_source: fastrand::Rng::with_seed(seed),
        })
    }

    /// Creates a simulation and generates its first universe from `config.seed`.
    pub fn start(config: UniverseConfig) -> Result<Self> {
        let seed = config.seed;
        let mut sim = Self::new(config)?;
        sim.reset(Some(seed))?;
        Ok(sim)
    }

    /// Replaces the universe with a freshly generated one and starts running.
    /// Without a seed, the next seed is drawn from the simulation's seed source.
    /// On error nothing changes.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<()> {
        let mut source = self.seed_source.clone();
        let seed = seed.unwrap_or_else(|| source.u64(..));
        let bodies = self.generator.generate_from(seed, self.next_id)?;

        self.seed_source = source;
        self.install(bodies, seed);
        Ok(())
    }

    /// Switches to a new configuration and resets.
    /// The seed source restarts from `config.seed`, as in [`Simulation::new`].
    /// An invalid configuration is rejected before anything is replaced.
    pub fn reset_with(&mut self, config: UniverseConfig, seed: Option<u64>) -> Result<()> {
        let integrator = Integrator::new(&config);
        let dt = config.time_step;
        let mut source = fastrand::Rng::with_seed(config.seed);
        let generator = Generator::new(config)?;

        let seed = seed.unwrap_or_else(|| source.u64(..));
        let bodies = generator.generate_from(seed, self.next_id)?;

        self.seed_source = source;
        self.generator = generator;
        self.integrator = integrator;
        self.dt = dt;
        self.install(bodies, seed);
        Ok(())
    }

    fn install(&mut self, bodies: Vec<Body>, seed: u64) {
        if let Some(last) = bodies.last() {
            self.next_id = last.id.0 + 1;
        }
        self.bodies = bodies;
        self.seed = seed;
        self.time = 0.0;
        self.frame = 0;
        self.state = State::Running;
        self.generation += 1;
        info!(
            "generation {}: {} bodies from seed {}",
            self.generation,
            self.bodies.len(),
            seed
        );
    }

    /// Advances the simulation by `dt` if it is running.
    /// Non-positive or non-finite steps are ignored so `time` never decreases.
    pub fn tick(&mut self, dt: f64) -> StepReport {
        if self.state != State::Running {
            return StepReport::default();
        }
        if !(dt.is_finite() && dt > 0.0) {
            debug!("ignoring tick with dt {}", dt);
            return StepReport::default();
        }

        let report = self.integrator.step(&mut self.bodies, dt);
        self.time += dt;
        self.frame += 1;
        report
    }

    /// Advances the simulation by the configured time step.
    pub fn step(&mut self) -> StepReport {
        self.tick(self.dt)
    }

    pub fn pause(&mut self) {
        if self.state == State::Running {
            self.state = State::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == State::Paused {
            self.state = State::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            State::Running => self.state = State::Paused,
            State::Paused => self.state = State::Running,
            State::Uninitialized => {}
        }
    }

    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Changes the time step used by [`Simulation::step`].
    pub fn set_time_step(&mut self, dt: f64) -> Result<()> {
        check_time_step(dt)?;
        self.dt = dt;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            frame: self.frame,
            state: self.state,
            seed: self.seed,
            generation: self.generation,
            bodies: self.bodies.clone(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Closest body to `point` and its distance.
    pub fn nearest_body(&self, point: DVec2) -> Option<(BodyId, f64)> {
        nearest(&self.bodies, point)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_bodies(&self.bodies, self.time, self.dt)
    }

    /// Total mechanical energy under the configured force law.
    pub fn total_energy(&self) -> f64 {
        self.integrator.total_energy(&self.bodies)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == State::Paused
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &UniverseConfig {
        self.generator.config()
    }
}
