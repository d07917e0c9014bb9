/// An error that occurs upon construction of a [`ForeignString`](crate::ForeignString).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForeignStringError {
    #[error("string contains an interior nul byte at position {position}")]
    InteriorNul { position: usize },
    #[error("failed to allocate {size} bytes of foreign memory")]
    AllocationFailed { size: usize },
}
