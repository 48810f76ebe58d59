//! One-based entry points for simulation harnesses.
//!
//! Harnesses number bowls `1..=bowl_count`. The conversion to the coordinator's
//! 0-based indices happens here and nowhere else.

use crate::coordinator::FeedingCoordinator;
use crate::species::Species;

impl FeedingCoordinator {
    /// Converts a 1-based bowl number to an index.
    ///
    /// # Panics
    /// If `number` is not in `1..=bowl_count`.
    pub fn bowl_index(&self, number: usize) -> usize {
        assert!(
            (1..=self.bowl_count()).contains(&number),
            "bowl number {number} out of range (1..={})",
            self.bowl_count()
        );
        number - 1
    }

    pub fn before_eating(&self, species: Species, bowl_number: usize) {
        self.request_to_eat(self.bowl_index(bowl_number), species);
    }

    pub fn after_eating(&self, species: Species, bowl_number: usize) {
        self.done_eating(self.bowl_index(bowl_number), species);
    }

    pub fn cat_before_eating(&self, bowl_number: usize) {
        self.before_eating(Species::Cat, bowl_number);
    }

    pub fn cat_after_eating(&self, bowl_number: usize) {
        self.after_eating(Species::Cat, bowl_number);
    }

    pub fn mouse_before_eating(&self, bowl_number: usize) {
        self.before_eating(Species::Mouse, bowl_number);
    }

    pub fn mouse_after_eating(&self, bowl_number: usize) {
        self.after_eating(Species::Mouse, bowl_number);
    }
}
