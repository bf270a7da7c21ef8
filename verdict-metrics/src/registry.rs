use dashmap::DashMap;
use parking_lot::RwLock;

use crate::key::{Interner, KeyId};
use crate::metrics::{MetricHandle, MetricKind, MetricSeriesSummary, MetricStorage};
use crate::tags::TagSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricId(u32);

#[derive(Debug)]
struct MetricDef {
    name: KeyId,
    kind: MetricKind,
}

/// Process-wide sample sink shared by every VU of a run.
#[derive(Debug, Default)]
pub struct Registry {
    interner: Interner,
    defs: RwLock<Vec<MetricDef>>,
    series: DashMap<(MetricId, TagSet), MetricStorage>,
}

impl Registry {
    /// Registers `name` once; later calls return the first id regardless of `kind`.
    pub fn register(&self, name: &str, kind: MetricKind) -> MetricId {
        let name = self.interner.intern(name);

        let mut defs = self.defs.write();
        if let Some(idx) = defs.iter().position(|d| d.name == name) {
            return MetricId(idx as u32);
        }

        defs.push(MetricDef { name, kind });
        MetricId((defs.len() - 1) as u32)
    }

    pub fn resolve_tags(&self, tags: &[(&str, &str)]) -> TagSet {
        TagSet::from_pairs(
            tags.iter()
                .map(|(k, v)| (self.interner.intern(k), self.interner.intern(v))),
        )
    }

    pub fn get_handle(&self, metric: MetricId, tags: TagSet) -> Option<MetricHandle> {
        let key = (metric, tags);
        if let Some(storage) = self.series.get(&key) {
            return Some(storage.handle());
        }

        let kind = self.defs.read().get(metric.0 as usize)?.kind;
        Some(
            self.series
                .entry(key)
                .or_insert_with(|| MetricStorage::new(kind))
                .handle(),
        )
    }

    fn resolve_str(&self, id: KeyId) -> String {
        self.interner
            .resolve(id)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    pub fn summarize(&self) -> Vec<MetricSeriesSummary> {
        let defs = self.defs.read();
        let mut out = Vec::with_capacity(self.series.len());

        for entry in self.series.iter() {
            let (metric, tags) = entry.key();
            let Some(def) = defs.get(metric.0 as usize) else {
                continue;
            };

            out.push(MetricSeriesSummary {
                name: self.resolve_str(def.name),
                kind: def.kind,
                tags: tags
                    .iter()
                    .map(|(k, v)| (self.resolve_str(k), self.resolve_str(v)))
                    .collect(),
                value: entry.value().summarize(),
            });
        }

        out.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.tags.cmp(&b.tags)));
        out
    }

    /// Series of `name` whose tags include every pair in `tags`.
    pub fn find_series(&self, name: &str, tags: &[(&str, &str)]) -> Vec<MetricSeriesSummary> {
        self.summarize()
            .into_iter()
            .filter(|s| s.name == name && tags.iter().all(|(k, v)| s.tag(k) == Some(*v)))
            .collect()
    }
}
