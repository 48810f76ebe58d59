//! ## catmouse-core::coordinator
//! **Feeding coordinator: one lock for the whole invariant, one condition variable**
//!
//! Bowl occupancy and both species counters live behind a single mutex, so
//! the compound predicate "opposing species absent and bowl free" is always
//! evaluated against one consistent state. Waiters sleep on a condition
//! variable bound to that mutex. Every release broadcasts, which covers both
//! wake conditions: a species count reaching zero and a bowl becoming free.
//!
//! Contract violations (bad bowl index, unbalanced release, teardown with
//! eaters inside) are bugs in the caller and panic.

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::policy::AdmissionPolicy;
use crate::snapshot::FeedingSnapshot;
use crate::species::{BowlOccupant, Species};

#[derive(Debug)]
struct FeedingState {
    occupants: Box<[BowlOccupant]>,
    eating: [usize; 2],
    waiting: [usize; 2],
    last_admitted: Option<Species>,
    streak: usize,
}

impl FeedingState {
    fn new(bowl_count: usize) -> Self {
        Self {
            occupants: vec![BowlOccupant::Empty; bowl_count].into_boxed_slice(),
            eating: [0; 2],
            waiting: [0; 2],
            last_admitted: None,
            streak: 0,
        }
    }

    fn admits(&self, bowl: usize, species: Species, policy: AdmissionPolicy) -> bool {
        let opponent = species.opponent();
        if self.eating[opponent.index()] > 0 || !self.occupants[bowl].is_empty() {
            return false;
        }
        if self.last_admitted == Some(species) {
            return !policy.must_yield(self.streak, self.waiting[opponent.index()]);
        }
        true
    }

    fn seat(&mut self, bowl: usize, species: Species) {
        self.occupants[bowl] = BowlOccupant::Occupied(species);
        self.eating[species.index()] += 1;
        if self.last_admitted == Some(species) {
            self.streak += 1;
        } else {
            self.last_admitted = Some(species);
            self.streak = 1;
        }
    }

    fn vacate(&mut self, bowl: usize, species: Species) {
        let occupant = self.occupants[bowl];
        assert!(
            occupant == BowlOccupant::Occupied(species),
            "{species} finished eating at bowl {bowl}, but the bowl is {occupant}"
        );
        self.occupants[bowl] = BowlOccupant::Empty;
        self.eating[species.index()] -= 1;
    }

    fn snapshot(&self) -> FeedingSnapshot {
        FeedingSnapshot {
            occupants: self.occupants.to_vec(),
            cats_eating: self.eating[Species::Cat.index()],
            mice_eating: self.eating[Species::Mouse.index()],
            cats_waiting: self.waiting[Species::Cat.index()],
            mice_waiting: self.waiting[Species::Mouse.index()],
        }
    }

    fn is_idle(&self) -> bool {
        self.eating == [0; 2] && self.waiting == [0; 2]
    }
}

/// Coordinates cats and mice over a fixed set of bowls.
///
/// Share it between eater threads behind an `Arc` (or borrow it from a
/// scoped thread). Bowls are addressed by 0-based index here; see
/// [`crate::hooks`] for the 1-based harness entry points.
#[derive(Debug)]
pub struct FeedingCoordinator {
    bowl_count: usize,
    policy: AdmissionPolicy,
    state: Mutex<FeedingState>,
    changed: Condvar,
}

impl FeedingCoordinator {
    /// Creates a coordinator with `bowl_count` empty bowls and the greedy policy.
    ///
    /// # Panics
    /// If `bowl_count` is zero.
    pub fn new(bowl_count: usize) -> Self {
        Self::with_policy(bowl_count, AdmissionPolicy::default())
    }

    /// Creates a coordinator with an explicit admission policy.
    ///
    /// # Panics
    /// If `bowl_count` is zero.
    pub fn with_policy(bowl_count: usize, policy: AdmissionPolicy) -> Self {
        assert!(bowl_count > 0, "feeding coordinator needs at least one bowl");
        debug!(bowl_count, ?policy, "feeding coordinator initialized");
        Self {
            bowl_count,
            policy,
            state: Mutex::new(FeedingState::new(bowl_count)),
            changed: Condvar::new(),
        }
    }

    pub fn bowl_count(&self) -> usize {
        self.bowl_count
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    /// Blocks until `species` may eat at `bowl`, then occupies it.
    ///
    /// # Panics
    /// If `bowl` is out of range.
    pub fn request_to_eat(&self, bowl: usize, species: Species) {
        self.check_bowl(bowl);
        let mut state = self.state.lock();
        if !state.admits(bowl, species, self.policy) {
            state.waiting[species.index()] += 1;
            trace!(bowl, %species, "waiting");
            while !state.admits(bowl, species, self.policy) {
                self.changed.wait(&mut state);
            }
            state.waiting[species.index()] -= 1;
        }
        state.seat(bowl, species);
        trace!(
            bowl,
            %species,
            eating = state.eating[species.index()],
            "admitted"
        );
    }

    /// Occupies `bowl` if `species` may eat there right now.
    ///
    /// Returns `false` without touching any state otherwise.
    ///
    /// # Panics
    /// If `bowl` is out of range.
    pub fn try_request_to_eat(&self, bowl: usize, species: Species) -> bool {
        self.check_bowl(bowl);
        let mut state = self.state.lock();
        if !state.admits(bowl, species, self.policy) {
            return false;
        }
        state.seat(bowl, species);
        trace!(bowl, %species, "admitted without waiting");
        true
    }

    /// Releases `bowl` and wakes every waiter to re-check its predicate.
    ///
    /// # Panics
    /// If `bowl` is out of range or is not currently held by `species`.
    pub fn done_eating(&self, bowl: usize, species: Species) {
        self.check_bowl(bowl);
        let mut state = self.state.lock();
        state.vacate(bowl, species);
        let remaining = state.eating[species.index()];
        drop(state);

        self.changed.notify_all();
        trace!(bowl, %species, remaining, "released");
    }

    /// Waits for `bowl` and returns a guard that releases it when dropped.
    pub fn dine(&self, bowl: usize, species: Species) -> Meal<'_> {
        self.request_to_eat(bowl, species);
        Meal {
            coordinator: self,
            bowl,
            species,
        }
    }

    pub fn snapshot(&self) -> FeedingSnapshot {
        self.state.lock().snapshot()
    }

    /// Consumes the coordinator.
    ///
    /// # Panics
    /// If any eater is still eating or waiting.
    pub fn teardown(self) {
        self.assert_idle();
        debug!(bowl_count = self.bowl_count, "feeding coordinator torn down");
    }

    fn assert_idle(&self) {
        let state = self.state.lock();
        assert!(
            state.is_idle(),
            "feeding coordinator torn down while in use: {:?}",
            state.snapshot()
        );
    }

    #[inline]
    fn check_bowl(&self, bowl: usize) {
        assert!(
            bowl < self.bowl_count,
            "bowl index {bowl} out of range (0..{})",
            self.bowl_count
        );
    }
}

impl Drop for FeedingCoordinator {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.assert_idle();
        }
    }
}

/// An eater seated at a bowl. Dropping it calls [`FeedingCoordinator::done_eating`].
#[must_use = "dropping a Meal ends it immediately"]
#[derive(Debug)]
pub struct Meal<'a> {
    coordinator: &'a FeedingCoordinator,
    bowl: usize,
    species: Species,
}

impl Meal<'_> {
    pub fn bowl(&self) -> usize {
        self.bowl
    }

    pub fn species(&self) -> Species {
        self.species
    }

    /// Ends the meal explicitly.
    pub fn finish(self) {}
}

impl Drop for Meal<'_> {
    fn drop(&mut self) {
        self.coordinator.done_eating(self.bowl, self.species);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    #[test]
    fn starts_empty() {
        let coordinator = FeedingCoordinator::new(4);
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.occupants, vec![BowlOccupant::Empty; 4]);
        assert!(snapshot.is_idle());
        coordinator.teardown();
    }

    #[test]
    fn round_trip_restores_bowl_and_counter() {
        let coordinator = FeedingCoordinator::new(2);
        coordinator.request_to_eat(1, Species::Mouse);
        let during = coordinator.snapshot();
        assert_eq!(during.occupants[1], BowlOccupant::Occupied(Species::Mouse));
        assert_eq!(during.mice_eating, 1);

        coordinator.done_eating(1, Species::Mouse);
        let after = coordinator.snapshot();
        assert_eq!(after.occupants[1], BowlOccupant::Empty);
        assert_eq!(after.mice_eating, 0);
        coordinator.teardown();
    }

    #[test]
    fn same_species_shares_the_gate() {
        let coordinator = FeedingCoordinator::new(3);
        assert!(coordinator.try_request_to_eat(0, Species::Cat));
        assert!(coordinator.try_request_to_eat(2, Species::Cat));
        assert_eq!(coordinator.snapshot().cats_eating, 2);
        coordinator.done_eating(0, Species::Cat);
        coordinator.done_eating(2, Species::Cat);
    }

    #[test]
    fn opposing_species_is_refused() {
        let coordinator = FeedingCoordinator::new(2);
        assert!(coordinator.try_request_to_eat(0, Species::Cat));
        assert!(!coordinator.try_request_to_eat(1, Species::Mouse));
        assert_eq!(coordinator.snapshot().mice_eating, 0);
        coordinator.done_eating(0, Species::Cat);
        assert!(coordinator.try_request_to_eat(1, Species::Mouse));
        coordinator.done_eating(1, Species::Mouse);
    }

    #[test]
    fn occupied_bowl_is_refused() {
        let coordinator = FeedingCoordinator::new(1);
        assert!(coordinator.try_request_to_eat(0, Species::Cat));
        assert!(!coordinator.try_request_to_eat(0, Species::Cat));
        coordinator.done_eating(0, Species::Cat);
    }

    #[test]
    fn meal_guard_releases_on_drop() {
        let coordinator = FeedingCoordinator::new(1);
        {
            let meal = coordinator.dine(0, Species::Cat);
            assert_eq!(meal.bowl(), 0);
            assert_eq!(meal.species(), Species::Cat);
            assert_eq!(coordinator.snapshot().cats_eating, 1);
        }
        assert!(coordinator.snapshot().is_idle());
        coordinator.dine(0, Species::Mouse).finish();
        coordinator.teardown();
    }

    #[test]
    #[should_panic(expected = "at least one bowl")]
    fn zero_bowls_is_fatal() {
        let _ = FeedingCoordinator::new(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn bowl_out_of_range_is_fatal() {
        let coordinator = FeedingCoordinator::new(2);
        coordinator.request_to_eat(2, Species::Cat);
    }

    #[test]
    #[should_panic(expected = "but the bowl is empty")]
    fn release_without_request_is_fatal() {
        let coordinator = FeedingCoordinator::new(1);
        coordinator.done_eating(0, Species::Mouse);
    }

    #[test]
    #[should_panic(expected = "but the bowl is cat")]
    fn release_by_wrong_species_is_fatal() {
        let coordinator = FeedingCoordinator::new(1);
        coordinator.request_to_eat(0, Species::Cat);
        coordinator.done_eating(0, Species::Mouse);
    }

    #[test]
    #[should_panic(expected = "torn down while in use")]
    fn teardown_with_active_eater_is_fatal() {
        let coordinator = FeedingCoordinator::new(1);
        coordinator.request_to_eat(0, Species::Cat);
        coordinator.teardown();
    }

    #[traced_test]
    #[test]
    fn logs_lifecycle() {
        let coordinator = FeedingCoordinator::new(3);
        coordinator.request_to_eat(0, Species::Cat);
        coordinator.done_eating(0, Species::Cat);
        coordinator.teardown();
        assert!(logs_contain("feeding coordinator initialized"));
        assert!(logs_contain("admitted"));
        assert!(logs_contain("feeding coordinator torn down"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Request(usize, Species),
        Release(usize),
    }

    fn op(bowls: usize) -> impl Strategy<Value = Op> {
        let species = prop_oneof![Just(Species::Cat), Just(Species::Mouse)];
        prop_oneof![
            (0..bowls, species).prop_map(|(bowl, species)| Op::Request(bowl, species)),
            (0..bowls).prop_map(Op::Release),
        ]
    }

    proptest! {
        #[test]
        fn random_operations_keep_invariants(ops in prop::collection::vec(op(4), 1..200)) {
            let coordinator = FeedingCoordinator::new(4);
            for op in ops {
                match op {
                    Op::Request(bowl, species) => {
                        let before = coordinator.snapshot();
                        let admitted = coordinator.try_request_to_eat(bowl, species);
                        let expected = before.occupants[bowl].is_empty()
                            && before.eating(species.opponent()) == 0;
                        prop_assert_eq!(admitted, expected);
                    }
                    Op::Release(bowl) => {
                        let before = coordinator.snapshot();
                        if let Some(species) = before.occupants[bowl].species() {
                            coordinator.done_eating(bowl, species);
                            let after = coordinator.snapshot();
                            prop_assert!(after.occupants[bowl].is_empty());
                            prop_assert_eq!(after.eating(species) + 1, before.eating(species));
                        }
                    }
                }
                prop_assert_eq!(coordinator.snapshot().check_invariants(), Ok(()));
            }

            for bowl in 0..coordinator.bowl_count() {
                if let Some(species) = coordinator.snapshot().occupants[bowl].species() {
                    coordinator.done_eating(bowl, species);
                }
            }
            coordinator.teardown();
        }
    }
}
