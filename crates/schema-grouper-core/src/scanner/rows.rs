use crate::analysis::grouping::Group;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fs::File;
use std::vec::IntoIter;

/// One data row keyed by its file's header names.
pub type Row = IndexMap<String, String>;

struct OpenFile {
    path: String,
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<File>,
}

/// Iterator over every data row of every member file of a group, in member
/// order. Each file is opened with its recorded delimiter and dropped before
/// the next one is opened.
pub struct GroupRows {
    pending: IntoIter<(String, char)>,
    current: Option<OpenFile>,
}

impl GroupRows {
    pub fn new(group: &Group) -> Self {
        let pending: Vec<(String, char)> = group
            .members
            .iter()
            .map(|m| (m.path.clone(), m.delimiter))
            .collect();
        Self {
            pending: pending.into_iter(),
            current: None,
        }
    }

    fn open(path: String, delimiter: char) -> Result<OpenFile> {
        let file = File::open(&path)
            .map_err(|e| Error::schema(path.clone(), format!("cannot open: {}", e)))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter as u8)
            .from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| Error::schema(path.clone(), format!("malformed header row: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();
        Ok(OpenFile {
            path,
            headers,
            records: reader.into_records(),
        })
    }
}

impl Iterator for GroupRows {
    type Item = Result<(String, Row)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(open) = self.current.as_mut() {
                match open.records.next() {
                    Some(Ok(record)) => {
                        let row = open
                            .headers
                            .iter()
                            .cloned()
                            .zip(record.iter().map(str::to_string))
                            .collect();
                        return Some(Ok((open.path.clone(), row)));
                    }
                    Some(Err(e)) => return Some(Err(Error::Csv(e))),
                    None => self.current = None,
                }
            }

            let (path, delimiter) = self.pending.next()?;
            match Self::open(path, delimiter) {
                Ok(open) => self.current = Some(open),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
