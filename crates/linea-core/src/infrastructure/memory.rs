//! Process Memory Sampling
//!
//! The tester records the peak memory footprint it observed during a check
//! so that cache policies can be compared. Sampling is best effort: hosts
//! without a supported probe report zero, which callers must read as
//! "unknown" rather than "no memory used".

/// Memory footprint of the current process, in MiB
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryUsage {
    /// Virtual memory size
    pub virtual_mib: f64,
    /// Resident set size
    pub resident_mib: f64,
}

impl MemoryUsage {
    /// Component-wise maximum
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            virtual_mib: self.virtual_mib.max(other.virtual_mib),
            resident_mib: self.resident_mib.max(other.resident_mib),
        }
    }
}

/// Sample the current process footprint
///
/// Always reports zero for now.
// TODO: read VmSize/VmRSS from /proc/self/status on Linux
#[inline]
pub fn sample_memory_usage() -> MemoryUsage {
    MemoryUsage::default()
}
