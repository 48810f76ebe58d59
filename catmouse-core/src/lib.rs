//! # catmouse-core
//!
//! Synchronization core for the cats-and-mice problem: a fixed set of bowls,
//! each used by one eater at a time, and two species that must never eat at
//! the same time anywhere in the system.
//!
//! ### Guarantees:
//! - Species exclusion: cats and mice never eat simultaneously
//! - Bowl exclusivity: one eater per bowl
//! - Same-species eaters at different bowls proceed in parallel
//! - Every release re-evaluates every waiter (broadcast wake)
//!
//! ### Key Submodules:
//! - `coordinator`: `FeedingCoordinator` and the `Meal` guard
//! - `policy`: admission policies (`Greedy`, `Alternating`)
//! - `snapshot`: consistent views of the coordinator state
//! - `hooks`: one-based bowl numbering used by simulation harnesses

pub mod coordinator;
pub mod error;
pub mod hooks;
pub mod policy;
pub mod snapshot;
pub mod species;

pub mod prelude {
    pub use crate::coordinator::*;
    pub use crate::error::*;
    pub use crate::policy::*;
    pub use crate::snapshot::*;
    pub use crate::species::*;
}

pub use coordinator::{FeedingCoordinator, Meal};
pub use error::InvariantViolation;
pub use policy::AdmissionPolicy;
pub use snapshot::FeedingSnapshot;
pub use species::{BowlOccupant, Species};
