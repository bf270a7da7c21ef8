use std::time::Duration;

use verdict_metrics::{MetricHandle, MetricId, MetricKind, Registry};

use crate::http::HttpHop;
use crate::metrics_context::MetricsContext;
use crate::outcome::Outcome;

/// Tag keys owned by the request pipeline; user and scenario tags cannot set them.
pub const RESERVED_TAGS: &[&str] = &["method", "url", "status", "proto", "passed", "scenario"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum HttpMetric {
    HttpReqs,
    HttpReqFailed,
    HttpReqDuration,
    HttpReqBlocked,
    HttpReqConnecting,
    HttpReqTlsHandshaking,
    HttpReqSending,
    HttpReqWaiting,
    HttpReqReceiving,
}

impl HttpMetric {
    #[must_use]
    pub fn kind(self) -> MetricKind {
        match self {
            Self::HttpReqs => MetricKind::Counter,
            Self::HttpReqFailed => MetricKind::Rate,
            _ => MetricKind::Trend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleValue {
    Count(u64),
    Hit(bool),
    Duration(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub metric: HttpMetric,
    pub value: SampleValue,
}

/// Every sample emitted for one hop; all of them share `tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGroup {
    pub tags: Vec<(String, String)>,
    pub samples: Vec<Sample>,
}

impl SampleGroup {
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    #[must_use]
    pub fn value(&self, metric: HttpMetric) -> Option<SampleValue> {
        self.samples
            .iter()
            .find_map(|s| (s.metric == metric).then_some(s.value))
    }

    pub fn metrics(&self) -> impl Iterator<Item = HttpMetric> + '_ {
        self.samples.iter().map(|s| s.metric)
    }
}

/// Request-level data shared by every hop of one script call.
#[derive(Debug, Clone, Copy)]
pub struct HttpRequestMeta<'a> {
    pub method: &'a str,
    /// Overrides the per-hop url as the `name` tag.
    pub name: Option<&'a str>,
    pub group: Option<&'a str>,
    pub tags: &'a [(String, String)],
}

fn push_if_missing(tags: &mut Vec<(String, String)>, key: &str, value: &str) {
    if !tags.iter().any(|(k, _)| k == key) {
        tags.push((key.to_string(), value.to_string()));
    }
}

/// Decides the samples and tags for one hop given its classification outcome.
#[must_use]
pub fn build_sample_group(
    req: &HttpRequestMeta<'_>,
    hop: &HttpHop,
    outcome: Outcome,
    metrics_ctx: &MetricsContext,
) -> SampleGroup {
    let mut tags: Vec<(String, String)> = Vec::with_capacity(req.tags.len() + 8);
    tags.extend(
        req.tags
            .iter()
            .filter(|(k, _)| !RESERVED_TAGS.contains(&k.as_str()))
            .cloned(),
    );

    push_if_missing(&mut tags, "name", req.name.unwrap_or(&hop.url));
    if let Some(group) = req.group {
        push_if_missing(&mut tags, "group", group);
    }
    tags.push(("method".to_string(), req.method.to_string()));
    tags.push(("url".to_string(), hop.url.clone()));
    tags.push(("status".to_string(), hop.status.to_string()));
    tags.push(("proto".to_string(), hop.proto.clone()));
    if let Some(passed) = outcome.passed_tag() {
        tags.push(("passed".to_string(), passed.to_string()));
    }
    metrics_ctx.merge_base_tags_if_missing(&mut tags, RESERVED_TAGS);

    let t = &hop.timings;
    let mut samples = Vec::with_capacity(9);
    samples.push(Sample {
        metric: HttpMetric::HttpReqs,
        value: SampleValue::Count(1),
    });
    if let Some(failed) = outcome.failed() {
        samples.push(Sample {
            metric: HttpMetric::HttpReqFailed,
            value: SampleValue::Hit(failed),
        });
    }
    for (metric, d) in [
        (HttpMetric::HttpReqDuration, t.duration()),
        (HttpMetric::HttpReqBlocked, t.blocked),
        (HttpMetric::HttpReqConnecting, t.connecting),
        (HttpMetric::HttpReqTlsHandshaking, t.tls_handshaking),
        (HttpMetric::HttpReqSending, t.sending),
        (HttpMetric::HttpReqWaiting, t.waiting),
        (HttpMetric::HttpReqReceiving, t.receiving),
    ] {
        samples.push(Sample {
            metric,
            value: SampleValue::Duration(d),
        });
    }

    SampleGroup { tags, samples }
}

#[derive(Debug, Clone, Copy)]
pub struct HttpMetricIds {
    pub reqs: MetricId,
    pub req_failed: MetricId,
    pub req_duration: MetricId,
    pub req_blocked: MetricId,
    pub req_connecting: MetricId,
    pub req_tls_handshaking: MetricId,
    pub req_sending: MetricId,
    pub req_waiting: MetricId,
    pub req_receiving: MetricId,
}

impl HttpMetricIds {
    pub fn register(metrics: &Registry) -> Self {
        let reg = |m: HttpMetric| {
            let name: &'static str = m.into();
            metrics.register(name, m.kind())
        };
        Self {
            reqs: reg(HttpMetric::HttpReqs),
            req_failed: reg(HttpMetric::HttpReqFailed),
            req_duration: reg(HttpMetric::HttpReqDuration),
            req_blocked: reg(HttpMetric::HttpReqBlocked),
            req_connecting: reg(HttpMetric::HttpReqConnecting),
            req_tls_handshaking: reg(HttpMetric::HttpReqTlsHandshaking),
            req_sending: reg(HttpMetric::HttpReqSending),
            req_waiting: reg(HttpMetric::HttpReqWaiting),
            req_receiving: reg(HttpMetric::HttpReqReceiving),
        }
    }

    #[must_use]
    pub fn id(&self, metric: HttpMetric) -> MetricId {
        match metric {
            HttpMetric::HttpReqs => self.reqs,
            HttpMetric::HttpReqFailed => self.req_failed,
            HttpMetric::HttpReqDuration => self.req_duration,
            HttpMetric::HttpReqBlocked => self.req_blocked,
            HttpMetric::HttpReqConnecting => self.req_connecting,
            HttpMetric::HttpReqTlsHandshaking => self.req_tls_handshaking,
            HttpMetric::HttpReqSending => self.req_sending,
            HttpMetric::HttpReqWaiting => self.req_waiting,
            HttpMetric::HttpReqReceiving => self.req_receiving,
        }
    }

    pub fn record(&self, metrics: &Registry, group: &SampleGroup) {
        let tag_refs: Vec<(&str, &str)> = group
            .tags
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let tags = metrics.resolve_tags(&tag_refs);

        for sample in &group.samples {
            let Some(handle) = metrics.get_handle(self.id(sample.metric), tags.clone()) else {
                continue;
            };
            match (sample.value, &handle) {
                (SampleValue::Count(n), MetricHandle::Counter(_)) => handle.add(n),
                (SampleValue::Hit(hit), MetricHandle::Rate(_)) => handle.add_bool(hit),
                (SampleValue::Duration(d), MetricHandle::Trend(_)) => handle.observe(d),
                _ => {}
            }
        }
    }
}
