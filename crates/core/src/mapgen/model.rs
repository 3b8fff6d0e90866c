//! Public data model for generation diagnostics.

/// Returned alongside an accepted grid. Ephemeral: surfaced to the caller for
/// diagnostics, never persisted by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapMetadata {
    /// Seed the generator's random source was initialized with.
    pub seed: u64,
    /// 1-based count of placement attempts consumed, including the accepted one.
    pub attempts: u32,
}
