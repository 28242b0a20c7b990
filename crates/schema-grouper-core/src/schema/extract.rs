use super::FileSchema;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use tracing::debug;

/// Candidate field separators, in tie-break priority order.
pub const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

const UTF8_BOM: char = '\u{feff}';

fn count_fields(line: &str, delimiter: char) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.len(),
        _ => 0,
    }
}

/// Pick the separator that splits the header into the most columns while
/// agreeing with the first data row's column count. Ties go to the earlier
/// candidate; when no candidate splits the header at all, comma is used.
pub fn detect_delimiter(header_line: &str, first_row: Option<&str>) -> char {
    let mut best = (DELIMITER_CANDIDATES[0], 0usize);

    for candidate in DELIMITER_CANDIDATES {
        let header_fields = count_fields(header_line, candidate);
        let consistent = first_row
            .map(|row| count_fields(row, candidate) == header_fields)
            .unwrap_or(true);
        let score = if header_fields > 1 && consistent {
            header_fields
        } else {
            0
        };
        if score > best.1 {
            best = (candidate, score);
        }
    }

    best.0
}

/// Read one raw line, mapping decode failures onto a schema error.
fn read_raw_line<R: BufRead>(reader: &mut R, path: &str) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| Error::schema(path, format!("unreadable source: {}", e)))?;
    Ok(line)
}

fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Extract a [`FileSchema`] from the head of `source`.
///
/// Only the header row and at most `sample_size` data rows are consumed; the
/// rest of the source is never read.
pub fn extract<R: Read>(path: &str, source: R, sample_size: usize) -> Result<FileSchema> {
    if sample_size == 0 {
        return Err(Error::InvalidConfig(
            "sample size must be a positive integer".to_string(),
        ));
    }

    let mut buffered = BufReader::new(source);

    let mut header_line = read_raw_line(&mut buffered, path)?;
    if header_line.starts_with(UTF8_BOM) {
        header_line.drain(..UTF8_BOM.len_utf8());
    }
    if trim_line_ending(&header_line).trim().is_empty() {
        return Err(Error::schema(path, "empty file: no header row"));
    }

    let first_line = read_raw_line(&mut buffered, path)?;
    let first_row = Some(trim_line_ending(&first_line)).filter(|row| !row.trim().is_empty());
    let delimiter = detect_delimiter(trim_line_ending(&header_line), first_row);

    let head = Cursor::new(format!("{}{}", header_line, first_line).into_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(head.chain(buffered));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::schema(path, format!("malformed header row: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut sample_rows = Vec::with_capacity(sample_size);
    for record in reader.records().take(sample_size) {
        let record = record.map_err(|e| Error::schema(path, format!("malformed row: {}", e)))?;
        sample_rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(
        "Extracted schema for {}: {} headers, {} sample rows, delimiter {:?}",
        path,
        headers.len(),
        sample_rows.len(),
        delimiter
    );

    Ok(FileSchema::new(path, headers, sample_rows, delimiter))
}

/// Open `path` and extract its schema. The file is closed before returning.
pub fn extract_from_path(path: &Path, sample_size: usize) -> Result<FileSchema> {
    let display = path.to_string_lossy().into_owned();
    let file = File::open(path)
        .map_err(|e| Error::schema(display.clone(), format!("cannot open: {}", e)))?;
    extract(&display, file, sample_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_detect_comma() {
        assert_eq!(detect_delimiter("a,b,c", Some("1,2,3")), ',');
    }

    #[test]
    fn test_detect_semicolon_tab_pipe() {
        assert_eq!(detect_delimiter("a;b;c", Some("1;2;3")), ';');
        assert_eq!(detect_delimiter("a\tb\tc", Some("1\t2\t3")), '\t');
        assert_eq!(detect_delimiter("a|b|c", Some("1|2|3")), '|');
    }

    #[test]
    fn test_detect_prefers_consistent_count() {
        // Comma would win the tie on the header alone but disagrees with the row.
        assert_eq!(detect_delimiter("a,b;c", Some("1;2")), ';');
    }

    #[test]
    fn test_detect_prefers_more_columns() {
        assert_eq!(detect_delimiter("a;b,c;d", Some("1;2,3;4")), ';');
    }

    #[test]
    fn test_detect_tie_goes_to_priority_order() {
        assert_eq!(detect_delimiter("a,b;c", Some("1,2;3")), ',');
    }

    #[test]
    fn test_detect_single_column_falls_back_to_comma() {
        assert_eq!(detect_delimiter("only", Some("value")), ',');
        assert_eq!(detect_delimiter("only", None), ',');
    }

    #[test]
    fn test_extract_reads_header_and_samples() {
        let data = "id,name,score\n1,alice,3.5\n2,bob,4\n3,carol,5.25\n";
        let schema = extract("mem.csv", data.as_bytes(), 2).unwrap();
        assert_eq!(schema.headers, vec!["id", "name", "score"]);
        assert_eq!(schema.sample_rows.len(), 2);
        assert_eq!(schema.delimiter, ',');
        assert_eq!(schema.field_type("id"), Some(FieldType::Integer));
        assert_eq!(schema.field_type("name"), Some(FieldType::String));
        assert_eq!(schema.field_type("score"), Some(FieldType::Float));
    }

    #[test]
    fn test_extract_header_only() {
        let schema = extract("mem.csv", "a;b;c\n".as_bytes(), 5).unwrap();
        assert_eq!(schema.headers, vec!["a", "b", "c"]);
        assert_eq!(schema.delimiter, ';');
        assert!(schema.sample_rows.is_empty());
        assert!(schema.field_types.values().all(|t| *t == FieldType::Empty));
    }

    #[test]
    fn test_extract_strips_bom_and_crlf() {
        let data = "\u{feff}x,y\r\n1,2\r\n";
        let schema = extract("bom.csv", data.as_bytes(), 5).unwrap();
        assert_eq!(schema.headers, vec!["x", "y"]);
        assert_eq!(schema.sample_rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_extract_empty_source_is_schema_error() {
        let err = extract("empty.csv", "".as_bytes(), 5).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
        let err = extract("blank.csv", "\n\n".as_bytes(), 5).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn test_extract_zero_sample_size_rejected() {
        let err = extract("a.csv", "a,b\n".as_bytes(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
