//! Run summaries.

use std::fmt;
use std::time::Duration;

use catmouse_core::{AdmissionPolicy, Species};

/// Time spent between asking to eat and being admitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitStats {
    pub count: u64,
    pub total: Duration,
    pub max: Duration,
}

impl WaitStats {
    pub fn record(&mut self, waited: Duration) {
        self.count += 1;
        self.total += waited;
        self.max = self.max.max(waited);
    }

    pub fn merge(&mut self, other: &WaitStats) {
        self.count += other.count;
        self.total += other.total;
        self.max = self.max.max(other.max);
    }

    pub fn mean(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total / count,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesReport {
    pub creatures: usize,
    pub wait: WaitStats,
    /// Most members of this species seen eating at once.
    pub peak_concurrent: usize,
}

impl SpeciesReport {
    pub fn meals(&self) -> u64 {
        self.wait.count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub bowls: usize,
    pub policy: AdmissionPolicy,
    pub cats: SpeciesReport,
    pub mice: SpeciesReport,
    /// Indexed by bowl, 0-based.
    pub meals_per_bowl: Vec<u64>,
    pub elapsed: Duration,
}

impl SimulationReport {
    pub fn species(&self, species: Species) -> &SpeciesReport {
        match species {
            Species::Cat => &self.cats,
            Species::Mouse => &self.mice,
        }
    }

    pub fn total_meals(&self) -> u64 {
        self.cats.meals() + self.mice.meals()
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} bowls, {} cats, {} mice, policy {:?}, {:.3}s",
            self.bowls,
            self.cats.creatures,
            self.mice.creatures,
            self.policy,
            self.elapsed.as_secs_f64()
        )?;
        for species in Species::ALL {
            let report = self.species(species);
            writeln!(
                f,
                "{species:>5}: {} meals, wait total {:.6}s mean {:.6}s max {:.6}s, peak {} at once",
                report.meals(),
                report.wait.total.as_secs_f64(),
                report.wait.mean().as_secs_f64(),
                report.wait.max.as_secs_f64(),
                report.peak_concurrent
            )?;
        }
        for (index, meals) in self.meals_per_bowl.iter().enumerate() {
            writeln!(f, " bowl {}: {meals} meals", index + 1)?;
        }
        Ok(())
    }
}
