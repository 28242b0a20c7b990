use super::FieldType;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BOOL_PATTERN: Regex = Regex::new(r"(?i)^(true|false|yes|no|1|0)$").unwrap();
    static ref INT_PATTERN: Regex = Regex::new(r"^[+-]?\d+$").unwrap();
    static ref FLOAT_PATTERN: Regex =
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap();
    static ref DATE_PATTERN: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref DATETIME_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
}

/// Typed classes, highest priority first.
const TYPED_CLASSES: [FieldType; 5] = [
    FieldType::Boolean,
    FieldType::Integer,
    FieldType::Float,
    FieldType::Date,
    FieldType::DateTime,
];

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn matches_class(class: FieldType, value: &str) -> bool {
    match class {
        FieldType::Boolean => BOOL_PATTERN.is_match(value),
        FieldType::Integer => INT_PATTERN.is_match(value),
        FieldType::Float => FLOAT_PATTERN.is_match(value),
        FieldType::Date => DATE_PATTERN.is_match(value),
        FieldType::DateTime => DATETIME_PATTERN.is_match(value),
        _ => false,
    }
}

/// Infer the type of a column from its sample values.
///
/// Blank values are skipped. The result is the first typed class (boolean,
/// integer, float, date, datetime) that accepts every remaining value, so
/// `1`/`0` next to other integers stay `integer` and integers next to
/// decimals widen to `float`. A column where no value is typed is `string`;
/// anything else is `mixed`.
pub fn infer<S: AsRef<str>>(values: &[S]) -> FieldType {
    let present: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !is_blank(v))
        .collect();

    if present.is_empty() {
        return FieldType::Empty;
    }

    if let Some(class) = TYPED_CLASSES
        .iter()
        .copied()
        .find(|class| present.iter().all(|v| matches_class(*class, v)))
    {
        return class;
    }

    let any_typed = present
        .iter()
        .any(|v| TYPED_CLASSES.iter().any(|class| matches_class(*class, v)));

    if any_typed {
        FieldType::Mixed
    } else {
        FieldType::String
    }
}

/// Infer a type per header over the matching column of `sample_rows`.
///
/// Short rows contribute an empty value for their missing trailing fields and
/// extra trailing fields are ignored. A duplicated header is typed from its
/// first column.
pub fn infer_field_types(
    headers: &[String],
    sample_rows: &[Vec<String>],
) -> IndexMap<String, FieldType> {
    let mut field_types = IndexMap::with_capacity(headers.len());

    for (idx, header) in headers.iter().enumerate() {
        if field_types.contains_key(header) {
            continue;
        }
        let column: Vec<&str> = sample_rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect();
        field_types.insert(header.clone(), infer(&column));
    }

    field_types
}
