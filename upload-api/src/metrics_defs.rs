use shared::metrics_defs::{MetricDef, MetricType};

pub const UPLOAD_DURATION: MetricDef = MetricDef {
    name: "upload.duration",
    metric_type: MetricType::Histogram,
    description: "Upload request duration in seconds",
};

pub const FILES_STORED: MetricDef = MetricDef {
    name: "upload.files.stored",
    metric_type: MetricType::Counter,
    description: "Number of uploaded files written to the object store",
};

pub const FILES_SKIPPED: MetricDef = MetricDef {
    name: "upload.files.skipped",
    metric_type: MetricType::Counter,
    description: "Number of uploaded files dropped before reaching the document store",
};

pub const LETTERS_FAILED: MetricDef = MetricDef {
    name: "upload.letters.failed",
    metric_type: MetricType::Counter,
    description: "Number of letter batches omitted because the document store failed",
};

pub const LETTER_DOCUMENTS: MetricDef = MetricDef {
    name: "upload.letters.documents",
    metric_type: MetricType::Gauge,
    description: "Number of letter documents found by the startup probe",
};

pub const ALL_METRICS: &[MetricDef] = &[
    UPLOAD_DURATION,
    FILES_STORED,
    FILES_SKIPPED,
    LETTERS_FAILED,
    LETTER_DOCUMENTS,
];
