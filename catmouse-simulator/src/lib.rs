// catmouse-simulator/src/lib.rs

/*!
# catmouse Simulator

Drives a [`FeedingCoordinator`] with one OS thread per creature. Every
creature loops: sleep, pick a bowl from its own seeded RNG, ask to eat, eat,
leave. An [`Observer`] keeps an independent table of who is eating where and
flags any meal that breaks species exclusion or bowl exclusivity.

## Key Components:
- **Simulator:** spawns named creature threads, joins them, tears the coordinator down.
- **Observer:** independent exclusion checks and per-bowl meal counts.
- **SimulationReport:** wait statistics and peak concurrency per species.
*/

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, instrument};
use validator::Validate;

use catmouse_config::{CatMouseConfig, ConfigError, SimulationConfig};
use catmouse_core::{AdmissionPolicy, FeedingCoordinator, Species};
use catmouse_telemetry::{EventLogger, MetricsRecorder};

pub mod error;
pub mod observer;
pub mod report;

pub use error::SimulationError;
pub use observer::{Observations, Observer};
pub use report::{SimulationReport, SpeciesReport, WaitStats};

/// One simulated eater.
#[derive(Debug, Clone)]
struct Creature {
    species: Species,
    id: usize,
    bowls: usize,
    iterations: usize,
    eat: Duration,
    sleep: Duration,
    seed: u64,
}

impl Creature {
    fn name(&self) -> String {
        format!("{}-{}", self.species, self.id)
    }

    fn live(
        &self,
        coordinator: &FeedingCoordinator,
        observer: &Observer,
        metrics: Option<&MetricsRecorder>,
    ) -> WaitStats {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut stats = WaitStats::default();

        for _ in 0..self.iterations {
            if !self.sleep.is_zero() {
                thread::sleep(self.sleep);
            }

            let bowl = rng.random_range(0..self.bowls);
            let asked = Instant::now();
            let meal = coordinator.dine(bowl, self.species);
            let waited = asked.elapsed();

            stats.record(waited);
            EventLogger::log_meal(self.species, self.id, bowl, waited);
            if let Some(metrics) = metrics {
                metrics.record_meal(self.species, waited);
            }

            if !observer.start(self.species, self.id, bowl) {
                error!(creature = %self.name(), bowl, "meal started against exclusion");
            }
            if !self.eat.is_zero() {
                thread::sleep(self.eat);
            }
            observer.stop(self.species, self.id, bowl);
            meal.finish();
        }
        stats
    }
}

/// Runs the cats-and-mice simulation described by a [`SimulationConfig`].
pub struct Simulator {
    config: SimulationConfig,
    policy: AdmissionPolicy,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl Simulator {
    /// Creates a simulator after validating `config`.
    pub fn new(config: SimulationConfig, policy: AdmissionPolicy) -> Result<Self, SimulationError> {
        config.validate().map_err(ConfigError::from)?;
        Ok(Self {
            config,
            policy,
            metrics: None,
        })
    }

    pub fn from_config(config: &CatMouseConfig) -> Result<Self, SimulationError> {
        Self::new(config.simulation.clone(), config.coordinator.policy)
    }

    /// Records meals and violations into `metrics` as well as the report.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn roster(&self) -> Vec<Creature> {
        let config = &self.config;
        Species::ALL
            .into_iter()
            .flat_map(|species| (0..config.creatures(species)).map(move |id| (species, id)))
            .enumerate()
            .map(|(position, (species, id))| Creature {
                species,
                id,
                bowls: config.bowls,
                iterations: config.iterations,
                eat: config.eat_time(species),
                sleep: config.sleep_time(species),
                seed: config.seed.wrapping_add(position as u64),
            })
            .collect()
    }

    /// Runs every creature to completion and returns the report.
    #[instrument(skip(self), fields(bowls = self.config.bowls, cats = self.config.cats, mice = self.config.mice))]
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        info!(policy = ?self.policy, seed = self.config.seed, "starting simulation");

        let coordinator = Arc::new(FeedingCoordinator::with_policy(
            self.config.bowls,
            self.policy,
        ));
        let observer = Arc::new(Observer::new(self.config.bowls));
        let (stats_tx, stats_rx) = channel::unbounded();
        let started = Instant::now();

        let mut handles = Vec::new();
        for creature in self.roster() {
            let name = creature.name();
            let coordinator = Arc::clone(&coordinator);
            let observer = Arc::clone(&observer);
            let metrics = self.metrics.clone();
            let stats_tx = stats_tx.clone();

            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn(move || {
                    let stats = creature.live(&coordinator, &observer, metrics.as_deref());
                    debug!(meals = stats.count, "creature finished");
                    let _ = stats_tx.send((creature.species, stats));
                });
            match spawned {
                Ok(handle) => handles.push((name, handle)),
                Err(source) => {
                    error!(creature = %name, %source, "failed to spawn creature");
                    // The ones already running hold the coordinator; let them finish.
                    join_creatures(handles);
                    return Err(SimulationError::Spawn { name, source });
                }
            }
        }
        drop(stats_tx);

        if let Some(name) = join_creatures(handles) {
            return Err(SimulationError::CreaturePanicked(name));
        }
        let elapsed = started.elapsed();

        Arc::into_inner(coordinator)
            .ok_or(SimulationError::CoordinatorShared)?
            .teardown();

        let mut cats = SpeciesReport {
            creatures: self.config.cats,
            ..SpeciesReport::default()
        };
        let mut mice = SpeciesReport {
            creatures: self.config.mice,
            ..SpeciesReport::default()
        };
        for (species, stats) in stats_rx.iter() {
            match species {
                Species::Cat => cats.wait.merge(&stats),
                Species::Mouse => mice.wait.merge(&stats),
            }
        }

        let observations = observer.observations();
        cats.peak_concurrent = observations.peak[Species::Cat.index()];
        mice.peak_concurrent = observations.peak[Species::Mouse.index()];

        if let Some(metrics) = &self.metrics {
            for _ in &observations.violations {
                metrics.inc_violations();
            }
        }
        if let Some(first) = observations.violations.first() {
            return Err(SimulationError::ExclusionViolated {
                count: observations.violations.len(),
                first: first.clone(),
            });
        }

        let report = SimulationReport {
            bowls: self.config.bowls,
            policy: self.policy,
            cats,
            mice,
            meals_per_bowl: observations.meals_per_bowl,
            elapsed,
        };
        info!(
            meals = report.total_meals(),
            elapsed_ms = elapsed.as_millis() as u64,
            "simulation finished"
        );
        Ok(report)
    }
}

/// Joins every creature and returns the first one that panicked.
fn join_creatures(handles: Vec<(String, JoinHandle<()>)>) -> Option<String> {
    let mut panicked = None;
    for (name, handle) in handles {
        if handle.join().is_err() {
            error!(creature = %name, "creature panicked");
            panicked.get_or_insert(name);
        }
    }
    panicked
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn roster_numbers_each_species_from_zero() {
        let simulator = Simulator::new(
            SimulationConfig {
                cats: 2,
                mice: 1,
                ..SimulationConfig::default()
            },
            AdmissionPolicy::Greedy,
        )
        .unwrap();

        let names: Vec<_> = simulator.roster().iter().map(Creature::name).collect();
        assert_eq!(names, vec!["cat-0", "cat-1", "mouse-0"]);

        let seeds: Vec<_> = simulator.roster().iter().map(|c| c.seed).collect();
        assert_eq!(seeds, vec![42, 43, 44]);
    }

    #[test]
    fn test_simulator_runs() {
        let config = SimulationConfig {
            cat_sleep_ms: 0,
            mouse_sleep_ms: 0,
            ..SimulationConfig::default()
        };
        let report = Simulator::new(config, AdmissionPolicy::Greedy)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(report.total_meals(), 16);
    }

    #[test]
    fn join_creatures_waits_for_all_and_names_first_panic() {
        let finished = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let handles = (0..3)
            .map(|id| {
                let finished = Arc::clone(&finished);
                let handle = thread::spawn(move || {
                    if id == 1 {
                        panic!("cat-1 choked");
                    }
                    thread::sleep(Duration::from_millis(10));
                    finished.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                });
                (format!("cat-{id}"), handle)
            })
            .collect();

        assert_eq!(join_creatures(handles), Some("cat-1".to_string()));
        assert_eq!(finished.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn creature_reports_meal_the_observer_rejects() {
        let coordinator = FeedingCoordinator::new(2);
        let observer = Observer::new(2);
        // A mouse the coordinator never heard of.
        assert!(observer.start(Species::Mouse, 0, 1));

        let cat = Creature {
            species: Species::Cat,
            id: 0,
            bowls: 1,
            iterations: 1,
            eat: Duration::ZERO,
            sleep: Duration::ZERO,
            seed: 1,
        };
        let stats = cat.live(&coordinator, &observer, None);

        assert_eq!(stats.count, 1);
        assert_eq!(observer.observations().violations.len(), 1);
        assert!(logs_contain("meal started against exclusion"));
        coordinator.teardown();
    }
}
