//! ## catmouse-core::policy
//! **Admission policies for the species gate**
//!
//! `Greedy` admits an eater as soon as its bowl is free and the opposing
//! species is not eating. `Alternating` adds a turn rule on top: once one
//! species has been admitted `batch` times in a row, new arrivals of that
//! species hold back while the other species has a waiter.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdmissionPolicy {
    #[default]
    Greedy,
    Alternating {
        /// Consecutive same-species admissions allowed while the other species waits.
        batch: NonZeroUsize,
    },
}

impl AdmissionPolicy {
    pub fn alternating(batch: NonZeroUsize) -> Self {
        AdmissionPolicy::Alternating { batch }
    }

    /// Whether a species with `streak` consecutive admissions must yield to
    /// `opponents_waiting` waiters of the other species.
    #[inline]
    pub(crate) fn must_yield(self, streak: usize, opponents_waiting: usize) -> bool {
        match self {
            AdmissionPolicy::Greedy => false,
            AdmissionPolicy::Alternating { batch } => {
                opponents_waiting > 0 && streak >= batch.get()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_never_yields() {
        assert!(!AdmissionPolicy::Greedy.must_yield(usize::MAX, 10));
    }

    #[test]
    fn alternating_yields_only_with_waiters() {
        let policy = AdmissionPolicy::alternating(NonZeroUsize::new(2).unwrap());
        assert!(!policy.must_yield(1, 3));
        assert!(policy.must_yield(2, 3));
        assert!(!policy.must_yield(5, 0));
    }
}
