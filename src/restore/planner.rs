// s3restore/src/restore/planner.rs
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::catalog::{VersionCatalog, VersionRecord};

/// What to do with one key to bring it back to its state at the target time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The live object already is the version in effect at the target time.
    Skip,
    /// Overwrite the live object with this version.
    RestoreTo(String),
}

/// A key's resolved decision together with the version that was in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub decision: Decision,
    pub in_effect: VersionRecord,
}

impl PlanEntry {
    pub fn key(&self) -> &str {
        &self.in_effect.key
    }
}

/// Per-key decisions, in the order keys were resolved while scanning the catalog.
///
/// Keys with no version strictly older than the target are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestorePlan {
    entries: Vec<PlanEntry>,
}

impl RestorePlan {
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&Decision> {
        self.entries
            .iter()
            .find(|entry| entry.key() == key)
            .map(|entry| &entry.decision)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that require a copy, as `(key, version_id)`.
    pub fn restorations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match &entry.decision {
            Decision::RestoreTo(version_id) => Some((entry.key(), version_id.as_str())),
            Decision::Skip => None,
        })
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.decision == Decision::Skip)
            .count()
    }
}

/// Resolves, for every key in `catalog`, the version in effect at `target`.
///
/// The in-effect version is the first record of the key, in catalog order,
/// whose modification time is strictly before `target`. Catalog order must be
/// newest first per key; it is not checked here.
pub fn plan(catalog: &VersionCatalog, target: DateTime<Utc>) -> RestorePlan {
    let mut resolved: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for record in catalog.records() {
        if resolved.contains(record.key.as_str()) {
            continue;
        }
        if record.last_modified >= target {
            continue;
        }

        resolved.insert(record.key.as_str());
        let decision = if record.is_latest {
            Decision::Skip
        } else {
            Decision::RestoreTo(record.version_id.clone())
        };
        entries.push(PlanEntry {
            decision,
            in_effect: record.clone(),
        });
    }

    RestorePlan { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn default_versions() -> VersionCatalog {
        VersionCatalog::new(vec![
            record("a", "v3", 333, true),
            record("a", "v2", 222, false),
            record("a", "v1", 111, false),
        ])
    }

    #[test]
    fn test_picks_oldest_version() {
        let plan = plan(&default_versions(), at(150));
        assert_eq!(plan.get("a"), Some(&Decision::RestoreTo("v1".to_string())));
    }

    #[test]
    fn test_picks_middle_version() {
        let plan = plan(&default_versions(), at(250));
        assert_eq!(plan.get("a"), Some(&Decision::RestoreTo("v2".to_string())));
    }

    #[test]
    fn test_skips_when_latest_was_already_in_effect() {
        let plan = plan(&default_versions(), at(1000));
        assert_eq!(plan.get("a"), Some(&Decision::Skip));
        assert_eq!(plan.restorations().count(), 0);
        assert_eq!(plan.skipped(), 1);
    }

    #[test]
    fn test_empty_catalog_gives_empty_plan() {
        let plan = plan(&VersionCatalog::default(), at(1000));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_key_absent_when_target_predates_all_versions() {
        let plan = plan(&default_versions(), at(50));
        assert_eq!(plan.get("a"), None);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_version_at_exact_target_is_not_in_effect() {
        let at_v2 = plan(&default_versions(), at(222));
        assert_eq!(at_v2.get("a"), Some(&Decision::RestoreTo("v1".to_string())));

        let at_v1 = plan(&default_versions(), at(111));
        assert_eq!(at_v1.get("a"), None);
    }

    #[test]
    fn test_subsecond_before_target_is_in_effect() {
        let mut latest = record("a", "v1", 99, true);
        latest.last_modified = DateTime::from_timestamp(99, 999_000_000).unwrap();
        let plan = plan(&VersionCatalog::new(vec![latest]), at(100));
        assert_eq!(plan.get("a"), Some(&Decision::Skip));
    }

    #[test]
    fn test_single_latest_version_older_than_target_is_skipped() {
        let catalog = VersionCatalog::new(vec![record("only", "v1", 10, true)]);
        let plan = plan(&catalog, at(20));
        assert_eq!(plan.get("only"), Some(&Decision::Skip));
    }

    #[test]
    fn test_interleaved_keys_resolve_once_each_in_scan_order() {
        let catalog = VersionCatalog::new(vec![
            record("b", "b3", 300, true),
            record("a", "a3", 333, true),
            record("b", "b2", 200, false),
            record("a", "a2", 222, false),
            record("c", "c1", 400, true),
            record("b", "b1", 100, false),
            record("a", "a1", 111, false),
        ]);

        let plan = plan(&catalog, at(250));

        let keys: Vec<&str> = plan.entries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(plan.get("a"), Some(&Decision::RestoreTo("a2".to_string())));
        assert_eq!(plan.get("b"), Some(&Decision::RestoreTo("b2".to_string())));
        assert_eq!(plan.get("c"), None);

        let restorations: Vec<(&str, &str)> = plan.restorations().collect();
        assert_eq!(restorations, vec![("b", "b2"), ("a", "a2")]);
    }

    #[test]
    fn test_in_effect_record_is_kept_for_skip_and_restore() {
        let catalog = VersionCatalog::new(vec![
            record("a", "a2", 500, true),
            record("a", "a1", 100, false),
            record("b", "b1", 100, true),
        ]);

        let plan = plan(&catalog, at(300));

        assert_eq!(plan.entries()[0].in_effect, record("a", "a1", 100, false));
        assert_eq!(plan.entries()[1].in_effect, record("b", "b1", 100, true));
        assert_eq!(plan.entries()[1].decision, Decision::Skip);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let catalog = default_versions();
        assert_eq!(plan(&catalog, at(250)), plan(&catalog, at(250)));
    }
}
