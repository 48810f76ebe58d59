//! Simulation harness configuration.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use validator::Validate;

use catmouse_core::Species;

const MAX_CREATURES: usize = 256;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of bowls shared by all creatures.
    #[validate(range(min = 1, max = 1024))]
    pub bowls: usize,

    #[validate(range(max = 256))]
    pub cats: usize,

    #[validate(range(max = 256))]
    pub mice: usize,

    /// Meals each creature eats before it exits.
    #[validate(range(min = 1, max = 100_000))]
    pub iterations: usize,

    #[validate(range(max = 60_000))]
    pub cat_eat_ms: u64,

    #[validate(range(max = 60_000))]
    pub cat_sleep_ms: u64,

    #[validate(range(max = 60_000))]
    pub mouse_eat_ms: u64,

    #[validate(range(max = 60_000))]
    pub mouse_sleep_ms: u64,

    /// Base seed; creature `n` draws bowls from `seed + n`.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bowls: 5,
            cats: 2,
            mice: 2,
            iterations: 4,
            cat_eat_ms: 1,
            cat_sleep_ms: 5,
            mouse_eat_ms: 1,
            mouse_sleep_ms: 5,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn creatures(&self, species: Species) -> usize {
        match species {
            Species::Cat => self.cats,
            Species::Mouse => self.mice,
        }
    }

    pub fn eat_time(&self, species: Species) -> Duration {
        Duration::from_millis(match species {
            Species::Cat => self.cat_eat_ms,
            Species::Mouse => self.mouse_eat_ms,
        })
    }

    pub fn sleep_time(&self, species: Species) -> Duration {
        Duration::from_millis(match species {
            Species::Cat => self.cat_sleep_ms,
            Species::Mouse => self.mouse_sleep_ms,
        })
    }

    /// A random but valid configuration with short timings, for fuzzing.
    pub fn generate_fuzz_config(seed: u64, max_creatures: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let max_creatures = max_creatures.clamp(1, MAX_CREATURES);

        Self {
            bowls: rng.random_range(1..=8),
            cats: rng.random_range(0..=max_creatures),
            mice: rng.random_range(0..=max_creatures),
            iterations: rng.random_range(1..=16),
            cat_eat_ms: rng.random_range(0..=2),
            cat_sleep_ms: rng.random_range(0..=2),
            mouse_eat_ms: rng.random_range(0..=2),
            mouse_sleep_ms: rng.random_range(0..=2),
            seed,
        }
    }
}
