use super::similarity::{header_similarity, jaccard};
use crate::error::{Error, Result};
use crate::schema::FileSchema;
use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use tracing::{info, trace};

/// Groups keyed by name, in creation order.
pub type Groups = IndexMap<String, Group>;

/// A named set of files sharing a similar header structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Headers of the first member, kept as the group's display anchor.
    pub canonical_headers: Vec<String>,
    pub members: Vec<FileSchema>,
    pub similarity_threshold: f64,
}

impl Group {
    pub fn new(name: impl Into<String>, seed: FileSchema, similarity_threshold: f64) -> Self {
        Self {
            name: name.into(),
            canonical_headers: seed.headers.clone(),
            members: vec![seed],
            similarity_threshold,
        }
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.members.iter().map(|m| m.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.members.iter().any(|m| m.path == path)
    }

    /// Append a member unless one with the same path is already present.
    pub(crate) fn add_member(&mut self, schema: FileSchema) -> bool {
        if self.contains_path(&schema.path) {
            return false;
        }
        self.members.push(schema);
        true
    }
}

pub fn group_name(ordinal: usize) -> String {
    format!("group_{}", ordinal)
}

pub fn check_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

/// Similarity of two files' header sets.
pub fn compute_similarity(a: &FileSchema, b: &FileSchema) -> f64 {
    jaccard(&a.header_set(), &b.header_set())
}

/// Partition schemas into classes of identical header sets.
///
/// Groups are named `group_1`, `group_2`, ... in the order their class is
/// first seen. A path seen earlier in the input is skipped.
pub fn group_by_exact_match(schemas: &[FileSchema]) -> Groups {
    let mut groups = Groups::new();
    let mut class_to_group: AHashMap<Vec<&str>, String> = AHashMap::new();
    let mut seen_paths: AHashSet<&str> = AHashSet::new();

    for schema in schemas {
        if !seen_paths.insert(schema.path.as_str()) {
            trace!("Skipping repeated path {}", schema.path);
            continue;
        }

        let mut key: Vec<&str> = schema.headers.iter().map(String::as_str).collect();
        key.sort_unstable();
        key.dedup();

        match class_to_group.get(&key) {
            Some(name) => {
                trace!("{} joins {}", schema.path, name);
                if let Some(group) = groups.get_mut(name) {
                    group.add_member(schema.clone());
                }
            }
            None => {
                let name = group_name(groups.len() + 1);
                trace!("{} starts {}", schema.path, name);
                groups.insert(name.clone(), Group::new(name.clone(), schema.clone(), 1.0));
                class_to_group.insert(key, name);
            }
        }
    }

    info!(
        "Exact-match grouping: {} files in {} groups",
        seen_paths.len(),
        groups.len()
    );
    groups
}

/// Greedy single-pass clustering.
///
/// Each schema, in input order, joins the first group (in creation order)
/// whose canonical headers are at least `threshold` similar to its own, or
/// else starts a new group. Assignments are never revisited.
pub fn group_by_similarity(schemas: &[FileSchema], threshold: f64) -> Result<Groups> {
    check_threshold(threshold)?;

    let mut groups = Groups::new();
    let mut seen_paths: AHashSet<&str> = AHashSet::new();

    for schema in schemas {
        if !seen_paths.insert(schema.path.as_str()) {
            trace!("Skipping repeated path {}", schema.path);
            continue;
        }

        let target = groups.values_mut().find(|group| {
            header_similarity(group.canonical_headers.as_slice(), schema.headers.as_slice())
                >= threshold
        });

        match target {
            Some(group) => {
                trace!("{} joins {}", schema.path, group.name);
                group.add_member(schema.clone());
            }
            None => {
                let name = group_name(groups.len() + 1);
                trace!("{} starts {}", schema.path, name);
                groups.insert(name.clone(), Group::new(name, schema.clone(), threshold));
            }
        }
    }

    info!(
        "Similarity grouping (threshold={:.2}): {} files in {} groups",
        threshold,
        seen_paths.len(),
        groups.len()
    );
    Ok(groups)
}
