use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MetricKind {
    /// Monotonic sum.
    Counter,
    /// Share of `true` observations.
    Rate,
    /// Duration distribution (recorded in microseconds, summarized in milliseconds).
    Trend,
}

#[derive(Debug, Clone)]
pub struct MetricSeriesSummary {
    pub name: String,
    pub kind: MetricKind,
    pub tags: Vec<(String, String)>,
    pub value: MetricValue,
}

impl MetricSeriesSummary {
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Counter(u64),
    Rate {
        total: u64,
        hits: u64,
        rate: Option<f64>,
    },
    Trend(TrendSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummary {
    pub count: u64,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub mean_ms: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p90_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
}

fn new_trend_histogram() -> Histogram<u64> {
    // 1us .. 1h, 3 significant digits.
    match Histogram::<u64>::new_with_bounds(1, 3_600_000_000, 3) {
        Ok(h) => h,
        Err(err) => panic!("failed to create histogram: {err}"),
    }
}

fn summarize_trend(h: &Histogram<u64>) -> TrendSummary {
    let count = h.len();
    let ms = |us: u64| us as f64 / 1000.0;
    let q = |quantile: f64| (count > 0).then(|| ms(h.value_at_quantile(quantile)));

    TrendSummary {
        count,
        min_ms: (count > 0).then(|| ms(h.min())),
        max_ms: (count > 0).then(|| ms(h.max())),
        mean_ms: (count > 0).then(|| h.mean() / 1000.0),
        p50_ms: q(0.50),
        p90_ms: q(0.90),
        p95_ms: q(0.95),
        p99_ms: q(0.99),
    }
}

#[derive(Debug, Default)]
pub struct RateCells {
    total: AtomicU64,
    hits: AtomicU64,
}

#[derive(Debug)]
pub(crate) enum MetricStorage {
    Counter(Arc<AtomicU64>),
    Rate(Arc<RateCells>),
    Trend(Arc<Mutex<Histogram<u64>>>),
}

impl MetricStorage {
    pub(crate) fn new(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Counter => Self::Counter(Arc::new(AtomicU64::new(0))),
            MetricKind::Rate => Self::Rate(Arc::new(RateCells::default())),
            MetricKind::Trend => Self::Trend(Arc::new(Mutex::new(new_trend_histogram()))),
        }
    }

    pub(crate) fn handle(&self) -> MetricHandle {
        match self {
            Self::Counter(c) => MetricHandle::Counter(c.clone()),
            Self::Rate(r) => MetricHandle::Rate(r.clone()),
            Self::Trend(h) => MetricHandle::Trend(h.clone()),
        }
    }

    pub(crate) fn summarize(&self) -> MetricValue {
        match self {
            Self::Counter(c) => MetricValue::Counter(c.load(Ordering::Relaxed)),
            Self::Rate(r) => {
                let total = r.total.load(Ordering::Relaxed);
                let hits = r.hits.load(Ordering::Relaxed);
                let rate = (total > 0).then(|| hits as f64 / total as f64);
                MetricValue::Rate { total, hits, rate }
            }
            Self::Trend(h) => MetricValue::Trend(summarize_trend(&h.lock())),
        }
    }
}

/// Write handle for one series. Calls that do not fit the series kind are ignored.
#[derive(Debug, Clone)]
pub enum MetricHandle {
    Counter(Arc<AtomicU64>),
    Rate(Arc<RateCells>),
    Trend(Arc<Mutex<Histogram<u64>>>),
}

impl MetricHandle {
    #[inline]
    pub fn add(&self, value: u64) {
        if let Self::Counter(c) = self {
            c.fetch_add(value, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn add_bool(&self, hit: bool) {
        if let Self::Rate(r) = self {
            r.total.fetch_add(1, Ordering::Relaxed);
            if hit {
                r.hits.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub fn observe(&self, value: Duration) {
        if let Self::Trend(h) = self {
            let us = u64::try_from(value.as_micros()).unwrap_or(u64::MAX);
            // The histogram floor is 1us; zero-length phases still count.
            h.lock().saturating_record(us.max(1));
        }
    }

    #[must_use]
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::Counter(_) => MetricKind::Counter,
            Self::Rate(_) => MetricKind::Rate,
            Self::Trend(_) => MetricKind::Trend,
        }
    }
}
