//! # System Scheduler
//!
//! Systems are plain functions invoked once per tick, in registration order.
//!
//! The scheduler is generic over a caller-owned context so that system
//! functions reach their state through an explicit handle instead of a
//! process-wide global. The declared component mask is carried for
//! documentation and tooling only: the scheduler invokes every active
//! system unconditionally and performs no per-entity filtering - each
//! system re-checks components internally.

/// Maximum number of systems that can be registered.
pub const MAX_SYSTEMS: usize = 32;

/// One registered system.
struct SystemEntry<C> {
    /// The update function, called with the shared context and the frame
    /// delta time.
    run: fn(&mut C, f32),
    /// Component mask the system declares it operates on. Informational;
    /// never enforced by the scheduler.
    declared_components: u64,
    /// Inactive systems are skipped.
    active: bool,
}

/// Deterministic, in-order system dispatcher.
///
/// `C` is whatever state the application threads through a tick - typically
/// a struct owning the ECS world and the subsystems driven from it.
///
/// # Example
///
/// ```rust,ignore
/// fn gravity_system(state: &mut GameState, dt: f32) { /* ... */ }
///
/// let mut scheduler: Scheduler<GameState> = Scheduler::new();
/// scheduler.register(gravity_system, 0);
/// scheduler.update(&mut state, dt);
/// ```
pub struct Scheduler<C> {
    systems: Vec<SystemEntry<C>>,
}

impl<C> Scheduler<C> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::with_capacity(MAX_SYSTEMS),
        }
    }

    /// Registers a system function with its declared component mask.
    ///
    /// Systems run in registration order, every tick, with no dependency
    /// graph between them - implementers rely on this ordering. Requests
    /// beyond [`MAX_SYSTEMS`] are logged and ignored.
    pub fn register(&mut self, run: fn(&mut C, f32), declared_components: u64) {
        if self.systems.len() >= MAX_SYSTEMS {
            tracing::warn!(limit = MAX_SYSTEMS, "system cap exceeded");
            return;
        }
        self.systems.push(SystemEntry {
            run,
            declared_components,
            active: true,
        });
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no systems are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// The declared component mask of the system at `index`.
    #[must_use]
    pub fn declared_components(&self, index: usize) -> Option<u64> {
        self.systems.get(index).map(|s| s.declared_components)
    }

    /// Runs one tick: every active system, unconditionally, in order.
    pub fn update(&self, ctx: &mut C, delta_time: f32) {
        for system in &self.systems {
            if system.active {
                (system.run)(ctx, delta_time);
            }
        }
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_one(trace: &mut Vec<u32>, _dt: f32) {
        trace.push(1);
    }

    fn push_two(trace: &mut Vec<u32>, _dt: f32) {
        trace.push(2);
    }

    #[test]
    fn test_systems_run_in_registration_order() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        scheduler.register(push_one, 0b01);
        scheduler.register(push_two, 0b10);

        let mut trace = Vec::new();
        scheduler.update(&mut trace, 1.0 / 60.0);
        scheduler.update(&mut trace, 1.0 / 60.0);

        assert_eq!(trace, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_mask_is_informational_only() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        // A mask nothing could ever satisfy; the system still runs.
        scheduler.register(push_one, u64::MAX);

        let mut trace = Vec::new();
        scheduler.update(&mut trace, 0.016);
        assert_eq!(trace, vec![1]);
        assert_eq!(scheduler.declared_components(0), Some(u64::MAX));
    }

    #[test]
    fn test_registration_cap() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        for _ in 0..MAX_SYSTEMS + 4 {
            scheduler.register(push_one, 0);
        }
        assert_eq!(scheduler.len(), MAX_SYSTEMS);
    }
}
