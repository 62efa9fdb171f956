use thiserror::Error;

/// Failures raised while building a level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Rejection sampling ran out of attempts before placing everything
    #[error("placed {placed} of {requested} entities before running out of attempts")]
    PlacementIncomplete { placed: usize, requested: usize },
    /// No obstacle-free spawn point exists on the search rings
    #[error("no free spawn position in a {width}x{height} arena")]
    SpawnUnresolvable { width: u32, height: u32 },
}
