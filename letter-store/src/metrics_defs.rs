//! Metrics definitions for the letter store.

use shared::metrics_defs::{MetricDef, MetricType};

pub const LETTER_INSERTED: MetricDef = MetricDef {
    name: "letter.inserted",
    metric_type: MetricType::Counter,
    description: "Number of letter documents created",
};

pub const LETTER_UPDATED: MetricDef = MetricDef {
    name: "letter.updated",
    metric_type: MetricType::Counter,
    description: "Number of existing letter documents rewritten with merged words",
};

pub const ALL_METRICS: &[MetricDef] = &[LETTER_INSERTED, LETTER_UPDATED];
