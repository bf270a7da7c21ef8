use std::sync::Arc;

use crate::MetricsContext;
use crate::status::{StatusMatcher, default_expected_statuses};

#[derive(Debug, Clone)]
pub struct VuConfig {
    pub vu_id: u64,
    pub metrics_ctx: MetricsContext,
    /// Used when neither the request nor the VU overrides the response callback.
    pub default_expected_statuses: Arc<StatusMatcher>,
}

impl Default for VuConfig {
    fn default() -> Self {
        Self {
            vu_id: 1,
            metrics_ctx: MetricsContext::default(),
            default_expected_statuses: default_expected_statuses(),
        }
    }
}

impl VuConfig {
    #[must_use]
    pub fn for_vu(vu_id: u64, metrics_ctx: MetricsContext) -> Self {
        Self {
            vu_id,
            metrics_ctx,
            ..Self::default()
        }
    }
}
