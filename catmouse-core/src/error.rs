use thiserror::Error;

use crate::species::Species;

/// Invariant breaches detectable from a [`crate::FeedingSnapshot`].
///
/// The coordinator itself never returns these; contract violations at its
/// boundary panic. They exist so observers and tests can check a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("cats ({cats}) and mice ({mice}) eating at the same time")]
    SpeciesOverlap { cats: usize, mice: usize },

    #[error("{occupied} bowls hold a {species} but {eating} {species}s are counted as eating")]
    OccupancyMismatch {
        species: Species,
        occupied: usize,
        eating: usize,
    },
}
