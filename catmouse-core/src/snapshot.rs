//! Point-in-time copies of the coordinator state.

use crate::error::InvariantViolation;
use crate::species::{BowlOccupant, Species};

/// A consistent copy of the coordinator state, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedingSnapshot {
    pub occupants: Vec<BowlOccupant>,
    pub cats_eating: usize,
    pub mice_eating: usize,
    pub cats_waiting: usize,
    pub mice_waiting: usize,
}

impl FeedingSnapshot {
    pub fn eating(&self, species: Species) -> usize {
        match species {
            Species::Cat => self.cats_eating,
            Species::Mouse => self.mice_eating,
        }
    }

    pub fn waiting(&self, species: Species) -> usize {
        match species {
            Species::Cat => self.cats_waiting,
            Species::Mouse => self.mice_waiting,
        }
    }

    /// No one eating, no one waiting.
    pub fn is_idle(&self) -> bool {
        self.cats_eating == 0
            && self.mice_eating == 0
            && self.cats_waiting == 0
            && self.mice_waiting == 0
    }

    /// Number of bowls currently held by `species`.
    pub fn bowls_held_by(&self, species: Species) -> usize {
        self.occupants
            .iter()
            .filter(|occupant| occupant.species() == Some(species))
            .count()
    }

    /// Checks species exclusion and that bowl occupancy matches the counters.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.cats_eating > 0 && self.mice_eating > 0 {
            return Err(InvariantViolation::SpeciesOverlap {
                cats: self.cats_eating,
                mice: self.mice_eating,
            });
        }

        for species in Species::ALL {
            let occupied = self.bowls_held_by(species);
            let eating = self.eating(species);
            if occupied != eating {
                return Err(InvariantViolation::OccupancyMismatch {
                    species,
                    occupied,
                    eating,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(occupants: Vec<BowlOccupant>, cats: usize, mice: usize) -> FeedingSnapshot {
        FeedingSnapshot {
            occupants,
            cats_eating: cats,
            mice_eating: mice,
            cats_waiting: 0,
            mice_waiting: 0,
        }
    }

    #[test]
    fn accepts_consistent_state() {
        let s = snapshot(
            vec![
                BowlOccupant::Occupied(Species::Cat),
                BowlOccupant::Empty,
                BowlOccupant::Occupied(Species::Cat),
            ],
            2,
            0,
        );
        assert_eq!(s.check_invariants(), Ok(()));
        assert!(!s.is_idle());
    }

    #[test]
    fn detects_species_overlap() {
        let s = snapshot(
            vec![
                BowlOccupant::Occupied(Species::Cat),
                BowlOccupant::Occupied(Species::Mouse),
            ],
            1,
            1,
        );
        assert_eq!(
            s.check_invariants(),
            Err(InvariantViolation::SpeciesOverlap { cats: 1, mice: 1 })
        );
    }

    #[test]
    fn detects_counter_mismatch() {
        let s = snapshot(vec![BowlOccupant::Empty, BowlOccupant::Empty], 0, 1);
        assert_eq!(
            s.check_invariants(),
            Err(InvariantViolation::OccupancyMismatch {
                species: Species::Mouse,
                occupied: 0,
                eating: 1,
            })
        );
    }
}
