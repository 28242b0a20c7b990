use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// On-disk form of a grouping pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub groups: IndexMap<String, GroupRecord>,
    /// Sample size the member schemas were extracted with, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rows: Option<usize>,
}

/// A group as persisted; its name is the key in [`SnapshotDocument::groups`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub canonical_headers: Vec<String>,
    pub similarity_threshold: f64,
    pub files: Vec<FileRecord>,
}

/// A member file schema as persisted. Field types and the delimiter stay as
/// raw strings here and are validated when converted back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    pub field_types: IndexMap<String, String>,
    pub delimiter: String,
}
