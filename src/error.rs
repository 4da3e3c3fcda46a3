use thiserror::Error;

/// Errors returned by table operations.
///
/// A key that is simply absent is not an error: lookups and removals report it
/// as `Ok(None)` or `Ok(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A key or construction parameter was rejected before the table was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No open slot was found within the bounded probe sequence.
    ///
    /// The table is left unchanged. Callers can recover by removing entries
    /// and calling [`rehash`](crate::ProbingMap::rehash).
    #[error("table full: no open slot within {capacity} probes")]
    TableFull {
        /// Capacity of the table, which is also the probe limit.
        capacity: usize,
    },

    /// A slot array could not be allocated.
    #[error("failed to allocate {slots} slots")]
    OutOfMemory {
        /// Number of slots requested.
        slots: usize,
    },
}
