use crate::key::KeyId;
use smallvec::SmallVec;

/// Interned tag set, sorted by key with at most one value per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagSet {
    // Per-request groups carry ~8 tags; keep them inline.
    pub(crate) tags: SmallVec<[(KeyId, KeyId); 8]>,
}

impl TagSet {
    /// Builds a set from unordered pairs. When a key repeats, the last value wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (KeyId, KeyId)>) -> Self {
        let mut tags: SmallVec<[(KeyId, KeyId); 8]> = SmallVec::new();
        for (k, v) in pairs {
            match tags.binary_search_by(|(ek, _)| ek.cmp(&k)) {
                Ok(idx) => tags[idx].1 = v,
                Err(idx) => tags.insert(idx, (k, v)),
            }
        }
        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyId, KeyId)> + '_ {
        self.tags.iter().copied()
    }

    pub fn get(&self, key: KeyId) -> Option<KeyId> {
        self.tags
            .binary_search_by(|(k, _)| k.cmp(&key))
            .ok()
            .map(|idx| self.tags[idx].1)
    }

    pub fn contains(&self, key: KeyId, value: KeyId) -> bool {
        self.get(key) == Some(value)
    }
}
