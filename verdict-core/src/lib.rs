mod builder;
mod callback;
mod config;
mod error;
mod http;
mod http_metrics;
mod metrics_context;
mod outcome;
mod status;
mod vu;

pub use builder::{ArgumentShape, build_expected_statuses};
pub use callback::{ClassificationMode, ResponseCallback, VuCallbackState, resolve};
pub use config::VuConfig;
pub use error::{Error, ErrorKind, Result};
pub use http::{
    HttpExchange, HttpHop, HttpRequest, HttpTimings, Transport, TransportError,
    TransportErrorKind,
};
pub use http_metrics::{
    HttpMetric, HttpMetricIds, HttpRequestMeta, RESERVED_TAGS, Sample, SampleGroup, SampleValue,
    build_sample_group,
};
pub use metrics_context::MetricsContext;
pub use outcome::Outcome;
pub use status::{StatusMatcher, StatusRange, default_expected_statuses};
pub use vu::VuContext;
