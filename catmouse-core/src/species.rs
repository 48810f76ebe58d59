//! Species and bowl occupancy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two mutually antagonistic kinds of eater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Cat,
    Mouse,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Cat, Species::Mouse];

    /// The species that may not eat while this one does.
    #[inline]
    pub fn opponent(self) -> Species {
        match self {
            Species::Cat => Species::Mouse,
            Species::Mouse => Species::Cat,
        }
    }

    /// Slot in per-species counter arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Species::Cat => 0,
            Species::Mouse => 1,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Cat => f.pad("cat"),
            Species::Mouse => f.pad("mouse"),
        }
    }
}

/// What currently sits at a bowl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BowlOccupant {
    #[default]
    Empty,
    Occupied(Species),
}

impl BowlOccupant {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, BowlOccupant::Empty)
    }

    #[inline]
    pub fn species(self) -> Option<Species> {
        match self {
            BowlOccupant::Empty => None,
            BowlOccupant::Occupied(species) => Some(species),
        }
    }
}

impl fmt::Display for BowlOccupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BowlOccupant::Empty => f.write_str("empty"),
            BowlOccupant::Occupied(species) => write!(f, "{species}"),
        }
    }
}
