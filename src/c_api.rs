use crate::{
    body::Body,
    config::UniverseConfig,
    simulation::Simulation,
};

/// Flat copy of a body for renderers across the C boundary.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyRecord {
    pub id: u32,
    /// 0 = star, 1 = planet, 2 = asteroid.
    pub kind: u32,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub mass: f64,
    pub radius: f64,
    pub color: [u8; 3],
}

impl From<&Body> for BodyRecord {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id.0,
            kind: body.kind as u32,
            x: body.pos.x,
            y: body.pos.y,
            vx: body.vel.x,
            vy: body.vel.y,
            mass: body.mass,
            radius: body.radius,
            color: body.color(),
        }
    }
}

/// Creates a running simulation with the default configuration, or null if that fails.
#[unsafe(no_mangle)]
pub extern "C" fn Simulation_Create(seed: u64) -> *mut Simulation {
    match Simulation::start(UniverseConfig {
        seed,
        ..Default::default()
    }) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(err) => {
            log::error!("cannot create simulation: {}", err);
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must be null or a pointer returned by `Simulation_Create` that was not destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Tick(handle: *mut Simulation, dt: f64) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.tick(dt);
    }
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Step(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.step();
    }
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Pause(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.pause();
    }
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Resume(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.resume();
    }
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_IsPaused(handle: *const Simulation) -> bool {
    unsafe { handle.as_ref() }.is_some_and(|sim| sim.is_paused())
}

/// Regenerates the universe from `seed`. Returns false if the handle is null or generation failed.
///
/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Reset(handle: *mut Simulation, seed: u64) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.reset(Some(seed)).is_ok())
}

/// Regenerates the universe from the next seed of the simulation's seed source.
///
/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_ResetRandom(handle: *mut Simulation) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.reset(None).is_ok())
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetTime(handle: *const Simulation) -> f64 {
    unsafe { handle.as_ref() }.map_or(0.0, |sim| sim.time())
}

/// # Safety
/// `handle` must be null or a live simulation handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |sim| sim.bodies().len())
}

/// Copies up to `capacity` bodies into `out` and returns how many were written.
///
/// # Safety
/// `handle` must be null or a live simulation handle, and `out` must be null or
/// valid for writes of `capacity` records.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_CopyBodies(
    handle: *const Simulation,
    out: *mut BodyRecord,
    capacity: usize,
) -> usize {
    let Some(sim) = (unsafe { handle.as_ref() }) else {
        return 0;
    };
    if out.is_null() {
        return 0;
    }

    let out = unsafe { std::slice::from_raw_parts_mut(out, capacity) };
    let mut written = 0;
    for (slot, body) in out.iter_mut().zip(sim.bodies()) {
        *slot = BodyRecord::from(body);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_handle() {
        let handle = Simulation_Create(8);
        assert!(!handle.is_null());

        unsafe {
            let count = Simulation_GetBodyCount(handle);
            assert!(count > 1);

            let mut records = vec![BodyRecord::default(); count + 4];
            let written = Simulation_CopyBodies(handle, records.as_mut_ptr(), records.len());
            assert_eq!(written, count);
            assert_eq!(records[0].kind, 0);
            assert_eq!(records[0].color, [255, 255, 0]);

            let mut short = vec![BodyRecord::default(); 1];
            assert_eq!(Simulation_CopyBodies(handle, short.as_mut_ptr(), 1), 1);

            Simulation_Step(handle);
            assert!(Simulation_GetTime(handle) > 0.0);

            Simulation_Pause(handle);
            assert!(Simulation_IsPaused(handle));
            let time = Simulation_GetTime(handle);
            Simulation_Tick(handle, 1.0);
            assert_eq!(Simulation_GetTime(handle), time);
            Simulation_Resume(handle);
            assert!(!Simulation_IsPaused(handle));

            assert!(Simulation_Reset(handle, 8));
            assert_eq!(Simulation_GetTime(handle), 0.0);
            assert!(Simulation_ResetRandom(handle));

            Simulation_Destroy(handle);
        }
    }

    #[test]
    fn null_handles_are_tolerated() {
        let null = std::ptr::null_mut::<Simulation>();
        unsafe {
            Simulation_Tick(null, 1.0);
            Simulation_Pause(null);
            assert!(!Simulation_Reset(null, 1));
            assert_eq!(Simulation_GetBodyCount(null), 0);
            assert_eq!(Simulation_CopyBodies(null, std::ptr::null_mut(), 10), 0);
            Simulation_Destroy(null);
        }
    }
}
