//! Custom validation functions for configuration.

use std::sync::LazyLock;

use catmouse_core::AdmissionPolicy;
use regex::Regex;
use validator::ValidationError;

const MAX_BATCH: usize = 10_000;

static FILTER_DIRECTIVES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_:=,.\-]+$").ok());

/// Validate that a log filter looks like a `tracing` directive list
/// (`info`, `catmouse_core=trace,warn`).
pub fn validate_log_filter(filter: &str) -> Result<(), ValidationError> {
    let re = FILTER_DIRECTIVES
        .as_ref()
        .ok_or_else(|| ValidationError::new("invalid_regex"))?;
    if re.is_match(filter) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_filter"))
    }
}

/// Validate that an alternating batch stays within a sane bound.
pub fn validate_policy(policy: &AdmissionPolicy) -> Result<(), ValidationError> {
    match policy {
        AdmissionPolicy::Greedy => Ok(()),
        AdmissionPolicy::Alternating { batch } if batch.get() <= MAX_BATCH => Ok(()),
        AdmissionPolicy::Alternating { .. } => Err(ValidationError::new("batch_too_large")),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn accepts_directive_lists() {
        assert!(validate_log_filter("info").is_ok());
        assert!(validate_log_filter("catmouse_core=trace,warn").is_ok());
    }

    #[test]
    fn rejects_malformed_filters() {
        assert!(validate_log_filter("").is_err());
        assert!(validate_log_filter("info debug").is_err());
    }

    #[test]
    fn bounds_alternating_batch() {
        let ok = AdmissionPolicy::alternating(NonZeroUsize::new(8).unwrap());
        let huge = AdmissionPolicy::alternating(NonZeroUsize::new(MAX_BATCH + 1).unwrap());
        assert!(validate_policy(&ok).is_ok());
        assert!(validate_policy(&huge).is_err());
        assert!(validate_policy(&AdmissionPolicy::Greedy).is_ok());
    }
}
