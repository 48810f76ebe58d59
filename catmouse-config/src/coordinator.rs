//! Feeding coordinator configuration.

use catmouse_core::AdmissionPolicy;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Admission policy: `{ kind: greedy }` or `{ kind: alternating, batch: N }`.
    #[serde(default)]
    #[validate(custom(function = validation::validate_policy))]
    pub policy: AdmissionPolicy,
}
