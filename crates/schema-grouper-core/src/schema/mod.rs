pub mod extract;
pub mod infer;

use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use extract::{detect_delimiter, extract, extract_from_path, DELIMITER_CANDIDATES};
pub use infer::infer;

/// Semantic type of one column, inferred from its sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Empty,
    Mixed,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Empty,
        FieldType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Empty => "empty",
            FieldType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}

/// Structural signature of one tabular file: header row, a bounded sample
/// of data rows and the per-column types inferred from that sample.
///
/// `field_types` holds exactly the distinct header names, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSchema {
    pub path: String,
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    pub field_types: IndexMap<String, FieldType>,
    pub delimiter: char,
}

impl FileSchema {
    /// Build a schema from already-read rows, inferring the column types.
    pub fn new(
        path: impl Into<String>,
        headers: Vec<String>,
        sample_rows: Vec<Vec<String>>,
        delimiter: char,
    ) -> Self {
        let field_types = infer::infer_field_types(&headers, &sample_rows);
        Self {
            path: path.into(),
            headers,
            sample_rows,
            field_types,
            delimiter,
        }
    }

    /// Schema with headers only; every field is `Empty`.
    pub fn from_headers<S: Into<String>>(path: impl Into<String>, headers: Vec<S>) -> Self {
        let headers = headers.into_iter().map(Into::into).collect();
        Self::new(path, headers, Vec::new(), ',')
    }

    /// Header names as a set. Comparison is exact: case and order are kept as read.
    pub fn header_set(&self) -> AHashSet<&str> {
        self.headers.iter().map(String::as_str).collect()
    }

    pub fn field_type(&self, header: &str) -> Option<FieldType> {
        self.field_types.get(header).copied()
    }
}
