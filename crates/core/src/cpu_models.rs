//! Catalog of named CPU models offered for `custom` CPU mode.
//!
//! A catalog is built once while the host is inspected and then published as a
//! [`SharedCpuModels`] handle. Published catalogs are read-only; to change
//! one, take a copy with [`CpuModels::from_shared`] and publish the result.

use std::collections::{HashMap, HashSet};
use std::slice;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::types::CpuUsable;

/// A published, read-only CPU model catalog. Cloning the handle shares the
/// catalog without copying it.
pub type SharedCpuModels = Arc<CpuModels>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuModel {
    pub name: String,
    pub usable: CpuUsable,
}

/// Ordered list of CPU models with unique names.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CpuModel>")]
pub struct CpuModels {
    models: Vec<CpuModel>,
    /// Position of each name in `models`.
    index: HashMap<String, usize>,
}

impl CpuModels {
    /// Creates an empty catalog with room for `capacity` models.
    pub fn new(capacity: usize) -> Result<Self> {
        let mut models = Self::default();
        models.reserve(capacity)?;
        tracing::trace!(capacity, "created CPU model catalog");
        Ok(models)
    }

    /// Takes a private, mutable copy of a published catalog.
    pub fn from_shared(shared: &SharedCpuModels) -> Result<Self> {
        shared.copy()
    }

    /// Deep copy: every name is owned independently by the result.
    ///
    /// Only the catalog's own storage is reserved up front and reported as
    /// [`Error::AllocationFailure`]; the name strings are cloned with the
    /// global allocator, which aborts if it runs out of memory.
    pub fn copy(&self) -> Result<Self> {
        let mut copy = Self::new(self.models.len())?;
        for model in &self.models {
            copy.push_new(model.clone());
        }
        Ok(copy)
    }

    /// Copies the models whose names pass both lists, in catalog order.
    ///
    /// An empty `allow` list places no restriction. A name in `deny` is
    /// always dropped. Usability verdicts are carried over unchanged.
    /// Allocation failures are reported as for [`copy`](Self::copy).
    pub fn filter(&self, allow: &[&str], deny: &[&str]) -> Result<Self> {
        let allow: HashSet<&str> = allow.iter().copied().collect();
        let deny: HashSet<&str> = deny.iter().copied().collect();

        let mut filtered = Self::new(self.models.len())?;
        for model in &self.models {
            let name = model.name.as_str();
            if !allow.is_empty() && !allow.contains(name) {
                continue;
            }
            if deny.contains(name) {
                continue;
            }
            filtered.push_new(model.clone());
        }

        tracing::debug!(
            kept = filtered.len(),
            dropped = self.len() - filtered.len(),
            "filtered CPU model catalog"
        );
        Ok(filtered)
    }

    /// Appends a model, taking ownership of `name`.
    ///
    /// Adding a name that is already present succeeds without changing the
    /// catalog.
    pub fn add_steal(&mut self, name: String, usable: CpuUsable) -> Result<()> {
        if self.contains(&name) {
            tracing::trace!(model = %name, "CPU model already in catalog");
            return Ok(());
        }
        self.reserve(1)?;
        self.push_new(CpuModel { name, usable });
        Ok(())
    }

    /// Appends a copy of the first `len` bytes of `name`, or all of it when
    /// `len` is `None`. Lengths past the end of `name` are clamped.
    pub fn add(&mut self, name: &str, len: Option<usize>, usable: CpuUsable) -> Result<()> {
        let name = match len {
            Some(len) => name
                .get(..len.min(name.len()))
                .ok_or_else(|| Error::InvalidModelName {
                    name: name.to_string(),
                    len,
                })?,
            None => name,
        };
        self.add_steal(name.to_string(), usable)
    }

    pub fn get(&self, name: &str) -> Option<&CpuModel> {
        self.index.get(name).map(|&pos| &self.models[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.models.capacity()
    }

    pub fn iter(&self) -> slice::Iter<'_, CpuModel> {
        self.models.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    pub fn into_shared(self) -> SharedCpuModels {
        Arc::new(self)
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let failure = |source| Error::AllocationFailure {
            requested: additional,
            source,
        };
        self.models.try_reserve(additional).map_err(failure)?;
        self.index.try_reserve(additional).map_err(failure)
    }

    /// Pushes a model whose name is known to be absent, with room already
    /// reserved.
    fn push_new(&mut self, model: CpuModel) {
        self.index.insert(model.name.clone(), self.models.len());
        self.models.push(model);
    }
}

/// Copies an optional published catalog. No catalog copies to no catalog.
pub fn copy_models(source: Option<&SharedCpuModels>) -> Result<Option<CpuModels>> {
    source.map(|models| models.copy()).transpose()
}

impl<'a> IntoIterator for &'a CpuModels {
    type Item = &'a CpuModel;
    type IntoIter = slice::Iter<'a, CpuModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for CpuModels {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.models.serialize(serializer)
    }
}

impl TryFrom<Vec<CpuModel>> for CpuModels {
    type Error = Error;

    fn try_from(models: Vec<CpuModel>) -> Result<Self> {
        let mut catalog = Self::new(models.len())?;
        for model in models {
            catalog.add_steal(model.name, model.usable)?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> CpuModels {
        let mut models = CpuModels::new(2).unwrap();
        models.add_steal("qemu64".to_string(), CpuUsable::Yes).unwrap();
        models.add_steal("Haswell".to_string(), CpuUsable::No).unwrap();
        models
    }

    fn entries(models: &CpuModels) -> Vec<(&str, CpuUsable)> {
        models.iter().map(|m| (m.name.as_str(), m.usable)).collect()
    }

    mod new {
        use super::*;

        #[test]
        fn starts_empty_with_reserved_room() {
            let models = CpuModels::new(16).unwrap();
            assert!(models.is_empty());
            assert!(models.capacity() >= 16);
        }

        #[test]
        fn impossible_capacity_reports_allocation_failure() {
            let err = CpuModels::new(usize::MAX).unwrap_err();
            assert!(matches!(err, Error::AllocationFailure { requested: usize::MAX, .. }));
        }
    }

    mod add {
        use super::*;

        #[test]
        fn keeps_insertion_order() {
            assert_eq!(
                entries(&sample()),
                vec![("qemu64", CpuUsable::Yes), ("Haswell", CpuUsable::No)]
            );
        }

        #[test]
        fn add_steal_is_idempotent_on_duplicate_name() {
            let mut models = CpuModels::new(0).unwrap();
            models.add_steal("qemu64".to_string(), CpuUsable::Yes).unwrap();
            models.add_steal("qemu64".to_string(), CpuUsable::Yes).unwrap();
            assert_eq!(entries(&models), vec![("qemu64", CpuUsable::Yes)]);
        }

        #[test]
        fn duplicate_does_not_overwrite_usability() {
            let mut models = sample();
            models.add("Haswell", None, CpuUsable::Yes).unwrap();
            assert_eq!(models.len(), 2);
            assert_eq!(models.get("Haswell").unwrap().usable, CpuUsable::No);
        }

        #[test]
        fn add_copies_prefix() {
            let mut models = CpuModels::new(1).unwrap();
            models.add("Skylake-Client-IBRS", Some(14), CpuUsable::Unknown).unwrap();
            assert_eq!(models.names().collect::<Vec<_>>(), vec!["Skylake-Client"]);
        }

        #[test]
        fn add_clamps_length_past_end() {
            let mut models = CpuModels::new(1).unwrap();
            models.add("EPYC", Some(100), CpuUsable::Yes).unwrap();
            assert!(models.contains("EPYC"));
        }

        #[test]
        fn add_rejects_split_character() {
            let mut models = CpuModels::new(1).unwrap();
            let err = models.add("Ärm", Some(1), CpuUsable::Yes).unwrap_err();
            assert!(matches!(err, Error::InvalidModelName { len: 1, .. }));
            assert!(models.is_empty());
        }

        #[test]
        fn large_catalog_keeps_lookup_and_order() {
            let mut models = CpuModels::new(0).unwrap();
            for i in 0..20_000 {
                models.add_steal(format!("model{i}"), CpuUsable::Yes).unwrap();
            }
            for i in (0..20_000).step_by(7) {
                models.add(&format!("model{i}"), None, CpuUsable::No).unwrap();
            }
            assert_eq!(models.len(), 20_000);
            for (pos, model) in models.iter().enumerate() {
                assert_eq!(model.name, format!("model{pos}"));
                assert_eq!(models.get(&model.name), Some(model));
                assert_eq!(model.usable, CpuUsable::Yes);
            }
        }

        #[test]
        fn growth_past_hint() {
            let mut models = CpuModels::new(1).unwrap();
            for i in 0..100 {
                models.add(&format!("model{i}"), None, CpuUsable::Unknown).unwrap();
            }
            assert_eq!(models.len(), 100);
            assert_eq!(models.names().last(), Some("model99"));
        }
    }

    mod copy {
        use super::*;

        #[test]
        fn deep_copy_matches_source() {
            let models = sample();
            let copy = models.copy().unwrap();
            assert_eq!(copy, models);
        }

        #[test]
        fn copy_owns_storage_and_names() {
            let models = sample();
            let mut copy = models.copy().unwrap();
            assert!(copy.capacity() >= models.len());
            copy.add_steal("Skylake-Client".to_string(), CpuUsable::Yes).unwrap();
            assert_eq!(models.len(), 2);
            assert!(!models.contains("Skylake-Client"));
            assert_eq!(copy.get("qemu64"), models.get("qemu64"));
        }

        #[test]
        fn copy_of_absent_is_absent() {
            assert!(copy_models(None).unwrap().is_none());
        }

        #[test]
        fn copy_of_empty_is_empty_not_absent() {
            let shared = CpuModels::new(0).unwrap().into_shared();
            let copy = copy_models(Some(&shared)).unwrap();
            assert!(copy.unwrap().is_empty());
        }

        #[test]
        fn shared_handle_clone_does_not_copy() {
            let shared = sample().into_shared();
            let other = Arc::clone(&shared);
            assert!(Arc::ptr_eq(&shared, &other));
        }

        #[test]
        fn mutating_private_copy_leaves_published_catalog_alone() {
            let shared = sample().into_shared();
            let mut private = CpuModels::from_shared(&shared).unwrap();
            private.add("Broadwell", None, CpuUsable::Yes).unwrap();
            assert_eq!(private.len(), 3);
            assert_eq!(shared.len(), 2);
        }
    }

    mod filter {
        use super::*;

        #[test]
        fn allow_list_restricts() {
            let filtered = sample().filter(&["qemu64"], &[]).unwrap();
            assert_eq!(entries(&filtered), vec![("qemu64", CpuUsable::Yes)]);
        }

        #[test]
        fn deny_list_excludes() {
            let filtered = sample().filter(&[], &["qemu64"]).unwrap();
            assert_eq!(entries(&filtered), vec![("Haswell", CpuUsable::No)]);
        }

        #[test]
        fn deny_wins_over_allow() {
            let filtered = sample().filter(&["qemu64", "Haswell"], &["Haswell"]).unwrap();
            assert_eq!(filtered.names().collect::<Vec<_>>(), vec!["qemu64"]);
        }

        #[test]
        fn unknown_allowed_names_are_ignored() {
            let filtered = sample().filter(&["Cascadelake"], &[]).unwrap();
            assert!(filtered.is_empty());
        }

        #[test]
        fn filtered_lookup_matches_new_positions() {
            let mut models = sample();
            models.add("Broadwell", None, CpuUsable::Yes).unwrap();
            let filtered = models.filter(&[], &["qemu64", "qemu64"]).unwrap();
            assert_eq!(filtered.names().collect::<Vec<_>>(), vec!["Haswell", "Broadwell"]);
            assert_eq!(filtered.get("Broadwell").unwrap().usable, CpuUsable::Yes);
            assert!(filtered.get("qemu64").is_none());

            let copy = filtered.copy().unwrap();
            assert_eq!(copy.get("Haswell").unwrap().usable, CpuUsable::No);
            assert_eq!(copy, filtered);
        }

        #[test]
        fn full_allow_list_equals_copy() {
            let models = sample();
            let names: Vec<&str> = models.names().collect();
            let filtered = models.filter(&names, &[]).unwrap();
            assert_eq!(filtered.copy().unwrap(), models.copy().unwrap());
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn serializes_as_list() {
            let json = serde_json::to_string(&sample()).unwrap();
            assert_eq!(
                json,
                r#"[{"name":"qemu64","usable":"yes"},{"name":"Haswell","usable":"no"}]"#
            );
        }

        #[test]
        fn deserialize_collapses_duplicates() {
            let json = r#"[{"name":"qemu64","usable":"yes"},{"name":"qemu64","usable":"no"}]"#;
            let models: CpuModels = serde_json::from_str(json).unwrap();
            assert_eq!(entries(&models), vec![("qemu64", CpuUsable::Yes)]);
        }
    }

    fn usable() -> impl Strategy<Value = CpuUsable> {
        prop_oneof![
            Just(CpuUsable::Unknown),
            Just(CpuUsable::Yes),
            Just(CpuUsable::No),
        ]
    }

    proptest! {
        #[test]
        fn filter_never_grows(
            input in proptest::collection::vec(("[a-z]{1,4}", usable()), 0..20),
            allow in proptest::collection::vec("[a-z]{1,4}", 0..5),
            deny in proptest::collection::vec("[a-z]{1,4}", 0..5),
        ) {
            let mut models = CpuModels::new(input.len()).unwrap();
            for (name, usable) in input {
                models.add_steal(name, usable).unwrap();
            }
            let allow: Vec<&str> = allow.iter().map(String::as_str).collect();
            let deny: Vec<&str> = deny.iter().map(String::as_str).collect();
            let filtered = models.filter(&allow, &deny).unwrap();
            prop_assert!(filtered.len() <= models.len());
            for model in &filtered {
                prop_assert!(!deny.contains(&model.name.as_str()));
                prop_assert_eq!(models.get(&model.name), Some(model));
            }
        }

        #[test]
        fn names_stay_unique(names in proptest::collection::vec("[a-c]{1,2}", 0..30)) {
            let mut models = CpuModels::new(0).unwrap();
            for name in &names {
                models.add(name, None, CpuUsable::Unknown).unwrap();
            }
            let mut seen: Vec<&str> = models.names().collect();
            let total = seen.len();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), total);
        }
    }
}
