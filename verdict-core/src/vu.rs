use std::sync::Arc;

use verdict_metrics::Registry;

use crate::callback::{ClassificationMode, ResponseCallback, VuCallbackState, resolve};
use crate::config::VuConfig;
use crate::http::HttpExchange;
use crate::http_metrics::{HttpMetricIds, HttpRequestMeta, build_sample_group};
use crate::metrics_context::MetricsContext;
use crate::outcome::Outcome;
use crate::status::StatusMatcher;

/// Everything one VU needs to classify and record its requests.
///
/// Owned by a single VU's script state and never shared, so the response-callback slot
/// and the current group need no synchronization. Only the registry is shared.
#[derive(Debug)]
pub struct VuContext {
    vu_id: u64,
    metrics_ctx: MetricsContext,
    metrics: Arc<Registry>,
    http_metrics: HttpMetricIds,
    default_expected: Arc<StatusMatcher>,
    callback: VuCallbackState,
    group: Option<String>,
}

impl VuContext {
    pub fn new(config: VuConfig, metrics: Arc<Registry>) -> Self {
        let http_metrics = HttpMetricIds::register(&metrics);
        Self {
            vu_id: config.vu_id,
            metrics_ctx: config.metrics_ctx,
            metrics,
            http_metrics,
            default_expected: config.default_expected_statuses,
            callback: VuCallbackState::default(),
            group: None,
        }
    }

    #[must_use]
    pub fn vu_id(&self) -> u64 {
        self.vu_id
    }

    #[must_use]
    pub fn metrics(&self) -> &Arc<Registry> {
        &self.metrics
    }

    #[must_use]
    pub fn metrics_ctx(&self) -> &MetricsContext {
        &self.metrics_ctx
    }

    #[must_use]
    pub fn response_callback(&self) -> &ResponseCallback {
        self.callback.current()
    }

    pub fn set_response_callback(&mut self, callback: ResponseCallback) {
        match &callback {
            ResponseCallback::Matcher(m) => {
                tracing::debug!(vu = self.vu_id, matcher = %m, "response callback installed");
            }
            ResponseCallback::Disabled => {
                tracing::debug!(vu = self.vu_id, "response callback disabled");
            }
            ResponseCallback::UseResolvedDefault => {
                tracing::debug!(vu = self.vu_id, "response callback reset to default");
            }
        }
        self.callback.set(callback);
    }

    pub fn reset_response_callback(&mut self) {
        self.set_response_callback(ResponseCallback::UseResolvedDefault);
    }

    #[must_use]
    pub fn resolve(&self, per_request: &ResponseCallback) -> ClassificationMode {
        resolve(&self.default_expected, &self.callback, per_request)
    }

    #[must_use]
    pub fn current_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Replaces the current group and returns the previous one.
    pub fn set_group(&mut self, group: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.group, group)
    }

    /// Classifies and records every hop of `exchange`. Returns the final hop's outcome.
    pub fn record_http_exchange(
        &self,
        req: &HttpRequestMeta<'_>,
        exchange: &HttpExchange,
        per_request: &ResponseCallback,
    ) -> Option<Outcome> {
        let mode = self.resolve(per_request);
        let req = HttpRequestMeta {
            group: req.group.or(self.group.as_deref()),
            ..*req
        };

        let mut last = None;
        for hop in &exchange.hops {
            let outcome = Outcome::classify(&mode, hop.status);
            tracing::trace!(
                vu = self.vu_id,
                url = %hop.url,
                status = hop.status,
                passed = ?outcome.passed(),
                "classified http hop"
            );

            let group = build_sample_group(&req, hop, outcome, &self.metrics_ctx);
            self.http_metrics.record(&self.metrics, &group);
            last = Some(outcome);
        }
        last
    }
}
