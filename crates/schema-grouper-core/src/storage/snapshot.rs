use super::models::{FileRecord, GroupRecord, SnapshotDocument};
use crate::analysis::grouping::{Group, Groups};
use crate::error::{Error, Result};
use crate::schema::{FieldType, FileSchema};
use ahash::AHashSet;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl From<&FileSchema> for FileRecord {
    fn from(schema: &FileSchema) -> Self {
        FileRecord {
            path: schema.path.clone(),
            headers: schema.headers.clone(),
            sample_rows: schema.sample_rows.clone(),
            field_types: schema
                .field_types
                .iter()
                .map(|(name, ty)| (name.clone(), ty.as_str().to_string()))
                .collect(),
            delimiter: schema.delimiter.to_string(),
        }
    }
}

impl From<&Group> for GroupRecord {
    fn from(group: &Group) -> Self {
        GroupRecord {
            canonical_headers: group.canonical_headers.clone(),
            similarity_threshold: group.similarity_threshold,
            files: group.members.iter().map(FileRecord::from).collect(),
        }
    }
}

impl FileRecord {
    fn into_schema(self, sample_limit: Option<usize>) -> Result<FileSchema> {
        let mut chars = self.delimiter.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(Error::CorruptSnapshot(format!(
                    "file '{}': delimiter must be a single character, got {:?}",
                    self.path, self.delimiter
                )))
            }
        };

        if let Some(limit) = sample_limit {
            if self.sample_rows.len() > limit {
                return Err(Error::CorruptSnapshot(format!(
                    "file '{}': {} sample rows exceed the sample size of {}",
                    self.path,
                    self.sample_rows.len(),
                    limit
                )));
            }
        }

        let header_set: AHashSet<&str> = self.headers.iter().map(String::as_str).collect();
        let key_set: AHashSet<&str> = self.field_types.keys().map(String::as_str).collect();
        if header_set != key_set {
            return Err(Error::CorruptSnapshot(format!(
                "file '{}': field types do not match headers",
                self.path
            )));
        }

        let mut field_types = IndexMap::with_capacity(self.field_types.len());
        for (header, type_name) in self.field_types {
            let ty: FieldType = type_name.parse().map_err(|reason| {
                Error::CorruptSnapshot(format!(
                    "file '{}', field '{}': {}",
                    self.path, header, reason
                ))
            })?;
            field_types.insert(header, ty);
        }

        Ok(FileSchema {
            path: self.path,
            headers: self.headers,
            sample_rows: self.sample_rows,
            field_types,
            delimiter,
        })
    }
}

impl GroupRecord {
    fn into_group(self, name: String, sample_limit: Option<usize>) -> Result<Group> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::CorruptSnapshot(format!(
                "group '{}': similarity threshold {} outside [0, 1]",
                name, self.similarity_threshold
            )));
        }

        let members = self
            .files
            .into_iter()
            .map(|file| file.into_schema(sample_limit))
            .collect::<Result<Vec<_>>>()?;

        Ok(Group {
            name,
            canonical_headers: self.canonical_headers,
            members,
            similarity_threshold: self.similarity_threshold,
        })
    }
}

/// Largest sample held by any member, or 0 when there are none.
fn largest_sample(groups: &Groups) -> usize {
    groups
        .values()
        .flat_map(|g| g.members.iter())
        .map(|m| m.sample_rows.len())
        .max()
        .unwrap_or(0)
}

/// Build the on-disk document. A recorded sample size is raised to the
/// largest member sample so the document always passes its own load check.
pub fn to_document(groups: &Groups, sample_rows: Option<usize>) -> SnapshotDocument {
    let sample_rows = sample_rows.map(|n| n.max(largest_sample(groups)));
    SnapshotDocument {
        groups: groups
            .iter()
            .map(|(name, group)| (name.clone(), GroupRecord::from(group)))
            .collect(),
        sample_rows,
    }
}

pub fn from_document(document: SnapshotDocument) -> Result<Groups> {
    let sample_limit = document.sample_rows;
    let mut groups = Groups::with_capacity(document.groups.len());
    for (name, record) in document.groups {
        let group = record.into_group(name.clone(), sample_limit)?;
        groups.insert(name, group);
    }
    Ok(groups)
}

/// Serialize groups into a pretty-printed JSON snapshot.
pub fn save(groups: &Groups, sample_rows: Option<usize>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document(groups, sample_rows))?)
}

/// Parse and validate a JSON snapshot.
pub fn load(snapshot: &str) -> Result<Groups> {
    let document: SnapshotDocument =
        serde_json::from_str(snapshot).map_err(|e| Error::CorruptSnapshot(e.to_string()))?;
    from_document(document)
}

pub fn save_to_path(path: &Path, groups: &Groups, sample_rows: Option<usize>) -> Result<()> {
    let json = save(groups, sample_rows)?;
    fs::write(path, json)?;
    info!("Saved {} groups to {}", groups.len(), path.display());
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Groups> {
    let json = fs::read_to_string(path)?;
    let groups = load(&json)?;
    debug!("Loaded {} groups from {}", groups.len(), path.display());
    Ok(groups)
}
