use tracing::debug;

/// Parallelism configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub workers: usize,
    /// Capacity of each bounded channel between stages.
    pub inflight_units: usize,
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self {
            workers: 1,
            inflight_units: 1,
        }
    }

    /// Both values are raised to at least 1.
    pub fn new(workers: usize, inflight_units: usize) -> Self {
        Self {
            workers: workers.max(1),
            inflight_units: inflight_units.max(1),
        }
    }

    /// Size from the machine: one worker per core minus one, in-flight units
    /// limited to `mem_fraction` of available memory and `hard_cap`.
    pub fn dynamic(max_unit_size: u64, mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get();
        let workers = cores.saturating_sub(1).max(1); // leave one core free

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_bytes = sys.available_memory();

        // Budget = fraction of available memory
        let budget = (avail_bytes as f64 * mem_fraction) as u64;
        let max_units = budget / max_unit_size.max(1);
        let inflight_units = (max_units.min(hard_cap as u64) as usize).max(1);

        debug!(workers, inflight_units, "parallelism profile");
        Self { workers, inflight_units }
    }
}
