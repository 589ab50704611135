use nbody_universe::{
    BodyKind, Generator, MassRanges, OrbitDistribution, Range, Simulation, UniverseConfig,
};

use std::path::PathBuf;

/// Spans up to three decades somewhere between 1e-3 and 1e6.
fn mass_range(rng: &mut fastrand::Rng) -> Range<f64> {
    let min = 10f64.powf(rng.f64() * 6.0 - 3.0);
    Range::new(min, min * 10f64.powf(rng.f64() * 3.0))
}

/// A valid configuration with randomized counts, masses and distances.
fn random_config(rng: &mut fastrand::Rng) -> UniverseConfig {
    let min_orbit = 50.0 + rng.f64() * 50.0;

    UniverseConfig {
        star_count: Range::new(1, rng.usize(1..=3)),
        body_count: Range::new(0, rng.usize(0..=80)),
        mass: MassRanges {
            star: mass_range(rng),
            planet: mass_range(rng),
            asteroid: mass_range(rng),
        },
        orbit_radius: Range::new(min_orbit, min_orbit + rng.f64() * 500.0),
        orbit_distribution: if rng.bool() {
            OrbitDistribution::Uniform
        } else {
            OrbitDistribution::Exponential
        },
        planet_fraction: rng.f64(),
        eccentricity: rng.f64() * 0.3,
        seed: rng.u64(..),
        ..Default::default()
    }
}

#[test]
fn every_generated_body_is_valid_and_separate() {
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
    for _ in 0..60 {
        let config = random_config(&mut rng);
        let clearance = config.min_clearance;
        let bodies = Generator::new(config.clone())
            .unwrap()
            .generate(config.seed)
            .unwrap();

        assert!(bodies.iter().any(|b| b.kind == BodyKind::Star));
        for (i, a) in bodies.iter().enumerate() {
            assert!(a.mass > 0.0 && a.radius > 0.0, "{:?}", a);
            assert!(a.pos.x.is_finite() && a.vel.y.is_finite());
            let range = config.mass.for_kind(a.kind);
            assert!(a.mass >= range.min && a.mass <= range.max);

            for b in &bodies[i + 1..] {
                let gap = (a.pos - b.pos).mag() - a.radius - b.radius;
                assert!(gap >= clearance - 1e-9, "{} and {} overlap", a.name(), b.name());
            }
        }
    }
}

#[test]
fn generation_is_deterministic_across_instances() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..10 {
        let config = random_config(&mut rng);
        let a = Generator::new(config.clone()).unwrap();
        let b = Generator::new(config.clone()).unwrap();
        assert_eq!(a.generate(config.seed).unwrap(), b.generate(config.seed).unwrap());
    }
}

#[test]
fn log_uniform_masses_favor_small_bodies() {
    let config = UniverseConfig {
        star_count: Range::new(1, 1),
        body_count: Range::new(60, 60),
        planet_fraction: 0.0,
        mass: MassRanges {
            asteroid: Range::new(0.001, 1.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let generator = Generator::new(config).unwrap();
    let mut below_midpoint = 0;
    let mut total = 0;
    for seed in 0..10 {
        for body in generator.generate(seed).unwrap() {
            if body.kind == BodyKind::Asteroid {
                total += 1;
                if body.mass < 0.5 {
                    below_midpoint += 1;
                }
            }
        }
    }
    // Log-uniform over three decades puts roughly 90% below the linear midpoint.
    assert!(below_midpoint * 10 > total * 7, "{} of {}", below_midpoint, total);
}

#[test]
fn bundled_scenarios_are_valid() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    let mut found = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "yaml") {
            let text = std::fs::read_to_string(&path).unwrap();
            let config: UniverseConfig = serde_yaml::from_str(&text).unwrap();
            let mut sim = Simulation::start(config).unwrap();
            sim.step();
            assert!(!sim.bodies().is_empty(), "{}", path.display());
            found += 1;
        }
    }
    assert!(found >= 2);
}
