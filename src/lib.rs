pub mod body;
pub mod c_api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod integrator;
pub mod simulation;

pub use body::{Body, BodyId, BodyKind, Composition, Traits};
pub use config::{CollisionMode, MassRanges, OrbitDistribution, Range, Scheme, UniverseConfig};
pub use diagnostics::Statistics;
pub use error::{Error, Result};
pub use generator::Generator;
pub use integrator::{Integrator, Merge, StepReport};
pub use simulation::{Simulation, Snapshot, State};
pub use ultraviolet::DVec2;
