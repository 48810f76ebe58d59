//! ## catmouse-telemetry::metrics
//! **Prometheus registry for simulation runs**
//!
//! - `catmouse_meals_total{species}`
//! - `catmouse_wait_seconds{species}`
//! - `catmouse_violations_total`

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

use catmouse_core::Species;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub meals: IntCounterVec,
    pub wait_seconds: HistogramVec,
    pub violations: IntCounter,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let meals = IntCounterVec::new(
            Opts::new("catmouse_meals_total", "Meals eaten, by species"),
            &["species"],
        )?;
        let wait_seconds = HistogramVec::new(
            HistogramOpts::new(
                "catmouse_wait_seconds",
                "Time between asking to eat and being admitted",
            )
            .buckets(vec![0.000_1, 0.001, 0.01, 0.1, 1.0, 10.0]),
            &["species"],
        )?;
        let violations = IntCounter::new(
            "catmouse_violations_total",
            "Exclusion violations seen by the simulation observer",
        )?;

        registry.register(Box::new(meals.clone()))?;
        registry.register(Box::new(wait_seconds.clone()))?;
        registry.register(Box::new(violations.clone()))?;

        Ok(Self {
            registry,
            meals,
            wait_seconds,
            violations,
        })
    }

    pub fn record_meal(&self, species: Species, waited: Duration) {
        let label = species.to_string();
        self.meals.with_label_values(&[label.as_str()]).inc();
        self.wait_seconds
            .with_label_values(&[label.as_str()])
            .observe(waited.as_secs_f64());
    }

    pub fn inc_violations(&self) {
        self.violations.inc();
    }

    pub fn meals_of(&self, species: Species) -> u64 {
        self.meals
            .with_label_values(&[species.to_string().as_str()])
            .get()
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
