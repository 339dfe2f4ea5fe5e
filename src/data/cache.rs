use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DataResult;

use super::loader::{LoadedTable, Loader};

/// Identity of a load request: the explicit location, or automatic resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    Auto,
    Explicit(String),
}

impl SourceId {
    pub fn from_explicit(explicit: Option<&str>) -> Self {
        match explicit {
            Some(location) => SourceId::Explicit(location.trim().to_string()),
            None => SourceId::Auto,
        }
    }

    pub fn as_explicit(&self) -> Option<&str> {
        match self {
            SourceId::Auto => None,
            SourceId::Explicit(location) => Some(location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: SourceId,
    /// Bump to force a reload of the same source.
    pub version: u32,
}

impl CacheKey {
    pub fn new(source: SourceId, version: u32) -> Self {
        CacheKey { source, version }
    }
}

/// Memoises raw loads so a session reads each source once.
///
/// Entries are only dropped through [`LoadCache::invalidate`],
/// [`LoadCache::clear`], or by asking for a new version.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<CacheKey, Arc<LoadedTable>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `key`, running `load` on a miss.
    /// Failures are not cached.
    pub fn get_or_try_insert_with<F>(&mut self, key: &CacheKey, load: F) -> DataResult<Arc<LoadedTable>>
    where
        F: FnOnce() -> DataResult<LoadedTable>,
    {
        if let Some(hit) = self.entries.get(key) {
            log::debug!("load cache hit for {key:?}");
            return Ok(Arc::clone(hit));
        }
        let loaded = Arc::new(load()?);
        // Older versions of the same source are stale now.
        self.entries
            .retain(|k, _| k.source != key.source || k.version > key.version);
        self.entries.insert(key.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Load through `loader`, memoised under `key`.
    pub fn load(&mut self, loader: &Loader, key: &CacheKey) -> DataResult<Arc<LoadedTable>> {
        self.get_or_try_insert_with(key, || loader.load(key.source.as_explicit()))
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::loader::DataSource;
    use crate::data::model::RawTable;
    use crate::error::DataError;

    fn table(tag: &str) -> LoadedTable {
        LoadedTable {
            source: DataSource::File(tag.into()),
            table: RawTable::new(vec![tag.to_string()], vec![]),
        }
    }

    #[test]
    fn loads_once_per_key() {
        let mut cache = LoadCache::new();
        let calls = Cell::new(0);
        let key = CacheKey::new(SourceId::Auto, 1);

        for _ in 0..3 {
            let loaded = cache
                .get_or_try_insert_with(&key, || {
                    calls.set(calls.get() + 1);
                    Ok(table("a"))
                })
                .unwrap();
            assert_eq!(loaded.table.headers, vec!["a"]);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn new_version_forces_reload() {
        let mut cache = LoadCache::new();
        let v1 = CacheKey::new(SourceId::Auto, 1);
        let v2 = CacheKey::new(SourceId::Auto, 2);

        cache.get_or_try_insert_with(&v1, || Ok(table("old"))).unwrap();
        let fresh = cache.get_or_try_insert_with(&v2, || Ok(table("new"))).unwrap();
        assert_eq!(fresh.table.headers, vec!["new"]);
        assert!(!cache.contains(&v1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn sources_are_cached_independently() {
        let mut cache = LoadCache::new();
        let auto = CacheKey::new(SourceId::Auto, 1);
        let explicit = CacheKey::new(SourceId::from_explicit(Some("x.csv")), 1);

        cache.get_or_try_insert_with(&auto, || Ok(table("auto"))).unwrap();
        cache.get_or_try_insert_with(&explicit, || Ok(table("x"))).unwrap();
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate(&auto));
        assert!(!cache.invalidate(&auto));
        assert!(cache.contains(&explicit));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = LoadCache::new();
        let key = CacheKey::new(SourceId::Auto, 1);
        let err = cache
            .get_or_try_insert_with(&key, || Err(DataError::Schema("boom".into())))
            .unwrap_err();
        assert!(matches!(err, DataError::Schema(_)));
        assert!(cache.is_empty());

        let ok = cache.get_or_try_insert_with(&key, || Ok(table("b"))).unwrap();
        assert_eq!(ok.table.headers, vec!["b"]);
    }

    #[test]
    fn source_id_roundtrip() {
        assert_eq!(SourceId::from_explicit(None), SourceId::Auto);
        let id = SourceId::from_explicit(Some(" data.csv "));
        assert_eq!(id.as_explicit(), Some("data.csv"));
    }
}
