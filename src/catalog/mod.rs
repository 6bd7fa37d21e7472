//! Read-only access to the catalog of already-known releases.
//!
//! The duplicate detector only talks to the [`Catalog`] trait. Payloads come
//! in loosely typed and are validated into [`CatalogEntry`] at this boundary:
//! a field with the wrong shape becomes `None`, an entry without a usable
//! name is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sp_core::{Category, Error, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::dupes::similarity::fold_title;

/// One page request against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub name: String,
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub has_more: bool,
}

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub category: Option<Category>,
    pub size_bytes: Option<u64>,
    pub resolution: Option<String>,
    pub info_hash: Option<String>,
}

/// Catalog search.
pub trait Catalog: Send + Sync {
    /// Return one page of entries whose name matches `query.name`.
    fn search(&self, query: &CatalogQuery) -> Result<CatalogPage>;
}

/// An entry as it arrives, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogEntry {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub size: Value,
    #[serde(default)]
    pub resolution: Value,
    #[serde(default)]
    pub info_hash: Value,
}

impl RawCatalogEntry {
    /// Validate into a [`CatalogEntry`]. `None` when the name is missing or empty.
    pub fn validate(self) -> Option<CatalogEntry> {
        let name = non_empty_string(&self.name)?;
        let info_hash = non_empty_string(&self.info_hash);
        let id = match &self.id {
            Value::Number(n) => Some(n.to_string()),
            other => non_empty_string(other),
        }
        .or_else(|| info_hash.clone())
        .unwrap_or_else(|| name.clone());

        let category = non_empty_string(&self.category).and_then(|c| c.parse().ok());

        let size_bytes = match &self.size {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };

        Some(CatalogEntry {
            id,
            name,
            category,
            size_bytes,
            resolution: non_empty_string(&self.resolution),
            info_hash,
        })
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Catalog backed by a JSON snapshot on disk.
///
/// The file is read on first search. It may be a bare array of entries or an
/// object with a `data` array; entries of the form
/// `{"id": .., "attributes": {..}}` are flattened.
#[derive(Debug)]
pub struct SnapshotCatalog {
    source: Option<PathBuf>,
    entries: OnceLock<std::result::Result<Vec<CatalogEntry>, String>>,
}

impl SnapshotCatalog {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            entries: OnceLock::new(),
        }
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Ok(entries));
        Self {
            source: None,
            entries: cell,
        }
    }

    fn entries(&self) -> Result<&[CatalogEntry]> {
        let loaded = self.entries.get_or_init(|| match &self.source {
            Some(path) => load_snapshot(path),
            None => Ok(Vec::new()),
        });
        match loaded {
            Ok(entries) => Ok(entries),
            Err(message) => Err(Error::catalog(message.clone())),
        }
    }
}

impl Catalog for SnapshotCatalog {
    fn search(&self, query: &CatalogQuery) -> Result<CatalogPage> {
        let wanted: Vec<String> = fold_title(&query.name)
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let hits: Vec<&CatalogEntry> = self
            .entries()?
            .iter()
            .filter(|entry| {
                let folded = fold_title(&entry.name);
                let words: Vec<&str> = folded.split_whitespace().collect();
                wanted.iter().all(|w| words.contains(&w.as_str()))
            })
            .collect();

        let start = query.page.saturating_mul(query.page_size);
        let entries: Vec<CatalogEntry> = hits
            .iter()
            .skip(start)
            .take(query.page_size)
            .map(|e| (*e).clone())
            .collect();
        let has_more = hits.len() > start.saturating_add(query.page_size);

        debug!(
            query = %query.name,
            page = query.page,
            returned = entries.len(),
            total = hits.len(),
            "catalog search"
        );
        Ok(CatalogPage { entries, has_more })
    }
}

fn load_snapshot(path: &Path) -> std::result::Result<Vec<CatalogEntry>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read snapshot {}: {}", path.display(), e))?;
    let entries = parse_snapshot(&content)
        .map_err(|e| format!("failed to parse snapshot {}: {}", path.display(), e))?;
    debug!("Loaded {} catalog entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Parse a snapshot document into validated entries.
pub fn parse_snapshot(json: &str) -> std::result::Result<Vec<CatalogEntry>, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err("expected an array or an object with a `data` array".to_string()),
        },
        _ => return Err("expected an array or an object with a `data` array".to_string()),
    };

    let total = items.len();
    let entries: Vec<CatalogEntry> = items
        .into_iter()
        .map(flatten_attributes)
        .filter_map(|item| serde_json::from_value::<RawCatalogEntry>(item).ok())
        .filter_map(RawCatalogEntry::validate)
        .collect();

    if entries.len() < total {
        warn!(
            dropped = total - entries.len(),
            "catalog entries without a usable name were ignored"
        );
    }
    Ok(entries)
}

fn flatten_attributes(item: Value) -> Value {
    let Value::Object(mut map) = item else {
        return item;
    };
    if let Some(Value::Object(attributes)) = map.remove("attributes") {
        for (key, value) in attributes {
            map.entry(key).or_insert(value);
        }
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn raw(value: Value) -> RawCatalogEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validate_typed_fields() {
        let entry = raw(json!({
            "id": 42,
            "name": "Movie Title 2020",
            "category": "Movie",
            "size": 4294967296u64,
            "resolution": "1080p",
            "info_hash": "abc"
        }))
        .validate()
        .unwrap();
        assert_eq!(entry.id, "42");
        assert_eq!(entry.category, Some(Category::Movie));
        assert_eq!(entry.size_bytes, Some(4294967296));
        assert_eq!(entry.resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn validate_bad_shapes_become_none() {
        let entry = raw(json!({
            "name": "Some Show",
            "category": 2,
            "size": "lots",
            "resolution": ["1080p"]
        }))
        .validate()
        .unwrap();
        assert_eq!(entry.id, "Some Show");
        assert_eq!(entry.category, None);
        assert_eq!(entry.size_bytes, None);
        assert_eq!(entry.resolution, None);
    }

    #[test]
    fn validate_numeric_string_size_and_tv_category() {
        let entry = raw(json!({"name": "Show S01", "category": "TV Show", "size": " 1024 "}))
            .validate()
            .unwrap();
        assert_eq!(entry.category, Some(Category::TvShow));
        assert_eq!(entry.size_bytes, Some(1024));
    }

    #[test]
    fn validate_requires_name() {
        assert!(raw(json!({"id": 1, "name": "  "})).validate().is_none());
        assert!(raw(json!({"id": 1})).validate().is_none());
    }

    #[test]
    fn parse_data_wrapper_with_attributes() {
        let entries = parse_snapshot(
            r#"{"data": [
                {"id": 7, "attributes": {"name": "Movie Title 2020", "category": "Movie", "size": 10}},
                {"id": 8, "attributes": {"category": "Movie"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "7");
        assert_eq!(entries[0].name, "Movie Title 2020");
    }

    #[test]
    fn parse_rejects_wrong_top_level() {
        assert!(parse_snapshot(r#"{"results": []}"#).is_err());
        assert!(parse_snapshot("42").is_err());
        assert!(parse_snapshot("not json").is_err());
    }

    fn entry(name: &str) -> CatalogEntry {
        CatalogEntry {
            id: name.to_string(),
            name: name.to_string(),
            category: Some(Category::Movie),
            size_bytes: Some(1),
            resolution: None,
            info_hash: None,
        }
    }

    #[test]
    fn search_is_case_and_accent_insensitive() {
        let catalog = SnapshotCatalog::from_entries(vec![
            entry("Amélie 2001 1080p"),
            entry("Movie Title 2020"),
        ]);
        let page = catalog
            .search(&CatalogQuery {
                name: "AMELIE".into(),
                page: 0,
                page_size: 10,
            })
            .unwrap();
        assert_eq!(page.entries.len(), 1);
        assert!(!page.has_more);
    }

    #[test]
    fn search_paginates() {
        let catalog = SnapshotCatalog::from_entries(
            (0..5).map(|i| entry(&format!("Movie Title part {i}"))).collect(),
        );
        let query = |page| CatalogQuery {
            name: "movie title".into(),
            page,
            page_size: 2,
        };
        let first = catalog.search(&query(0)).unwrap();
        assert_eq!(first.entries.len(), 2);
        assert!(first.has_more);
        let last = catalog.search(&query(2)).unwrap();
        assert_eq!(last.entries.len(), 1);
        assert!(!last.has_more);
    }

    #[test]
    fn unreadable_snapshot_is_catalog_error() {
        let catalog = SnapshotCatalog::open("/nonexistent/snapshot.json");
        let err = catalog
            .search(&CatalogQuery {
                name: "x".into(),
                page: 0,
                page_size: 1,
            })
            .unwrap_err();
        assert_matches!(err, Error::Catalog(_));
    }

    #[test]
    fn snapshot_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"id": "a", "name": "Show Name S02", "size": 3}]"#).unwrap();

        let catalog = SnapshotCatalog::open(&path);
        let page = catalog
            .search(&CatalogQuery {
                name: "Show Name".into(),
                page: 0,
                page_size: 50,
            })
            .unwrap();
        assert_eq!(page.entries[0].id, "a");
    }
}
