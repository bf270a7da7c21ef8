use parking_lot::RwLock;
use std::sync::Arc;

/// Interned string id. Ids are dense and stable for the lifetime of a [`crate::Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u32);

impl From<u32> for KeyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<KeyId> for u32 {
    fn from(v: KeyId) -> Self {
        v.0
    }
}

#[derive(Debug, Default)]
struct Table {
    ids: ahash::AHashMap<Arc<str>, KeyId>,
    strings: Vec<Arc<str>>,
}

#[derive(Debug, Default)]
pub(crate) struct Interner {
    table: RwLock<Table>,
}

impl Interner {
    pub(crate) fn intern(&self, s: &str) -> KeyId {
        if let Some(id) = self.table.read().ids.get(s) {
            return *id;
        }

        let mut table = self.table.write();
        // Another writer may have won the race between the two locks.
        if let Some(id) = table.ids.get(s) {
            return *id;
        }

        // Distinct tag keys and values stay far below u32::MAX for any run.
        let id = KeyId(table.strings.len() as u32);
        let s: Arc<str> = Arc::from(s);
        table.strings.push(s.clone());
        table.ids.insert(s, id);
        id
    }

    pub(crate) fn lookup(&self, s: &str) -> Option<KeyId> {
        self.table.read().ids.get(s).copied()
    }

    pub(crate) fn resolve(&self, id: KeyId) -> Option<Arc<str>> {
        self.table.read().strings.get(id.0 as usize).cloned()
    }
}
