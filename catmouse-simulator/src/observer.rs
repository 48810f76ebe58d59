//! Independent bookkeeping of who eats where.
//!
//! The observer never trusts the coordinator: it keeps its own table under its
//! own lock and checks every meal start against it.

use parking_lot::Mutex;

use catmouse_core::Species;
use catmouse_telemetry::EventLogger;

#[derive(Debug)]
struct Table {
    bowls: Vec<Option<(Species, usize)>>,
    eating: [usize; 2],
    peak: [usize; 2],
    meals_per_bowl: Vec<u64>,
    violations: Vec<String>,
}

/// What the observer saw over a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observations {
    pub peak: [usize; 2],
    pub meals_per_bowl: Vec<u64>,
    pub violations: Vec<String>,
}

#[derive(Debug)]
pub struct Observer {
    table: Mutex<Table>,
}

impl Observer {
    pub fn new(bowls: usize) -> Self {
        Self {
            table: Mutex::new(Table {
                bowls: vec![None; bowls],
                eating: [0; 2],
                peak: [0; 2],
                meals_per_bowl: vec![0; bowls],
                violations: Vec::new(),
            }),
        }
    }

    /// Records `creature` starting to eat at `bowl`; returns `false` on a violation.
    pub fn start(&self, species: Species, creature: usize, bowl: usize) -> bool {
        let mut table = self.table.lock();
        let mut clean = true;

        if let Some((other, other_id)) = table.bowls[bowl] {
            let message = format!(
                "{species} {creature} sat at bowl {} while {other} {other_id} was eating there",
                bowl + 1
            );
            EventLogger::log_violation(&message);
            table.violations.push(message);
            clean = false;
        }
        let opponents = table.eating[species.opponent().index()];
        if opponents > 0 {
            let message = format!(
                "{species} {creature} started eating at bowl {} while {opponents} {}(s) were eating",
                bowl + 1,
                species.opponent()
            );
            EventLogger::log_violation(&message);
            table.violations.push(message);
            clean = false;
        }

        table.bowls[bowl] = Some((species, creature));
        table.eating[species.index()] += 1;
        table.meals_per_bowl[bowl] += 1;
        let now = table.eating[species.index()];
        let peak = &mut table.peak[species.index()];
        *peak = (*peak).max(now);
        clean
    }

    pub fn stop(&self, species: Species, creature: usize, bowl: usize) {
        let mut table = self.table.lock();
        if table.bowls[bowl] == Some((species, creature)) {
            table.bowls[bowl] = None;
        }
        table.eating[species.index()] = table.eating[species.index()].saturating_sub(1);
    }

    pub fn observations(&self) -> Observations {
        let table = self.table.lock();
        Observations {
            peak: table.peak,
            meals_per_bowl: table.meals_per_bowl.clone(),
            violations: table.violations.clone(),
        }
    }
}
