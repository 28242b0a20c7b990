use crate::analysis::grouping::{self, Group, Groups};
use crate::config::AppConfig;
use crate::error::{BoxError, Error, Result};
use crate::progress::ProgressReporter;
use crate::scanner::{self, GroupRows};
use crate::schema::{self, FileSchema};
use crate::storage::{snapshot, GroupStore, ProcessOutcome};
use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const SUMMARY_HEADER_LIMIT: usize = 5;

/// One grouping session: the schemas discovered so far and the group
/// registry built from them. Sessions are independent of each other.
#[derive(Debug)]
pub struct GroupingSession {
    config: AppConfig,
    files: Vec<FileSchema>,
    file_index: AHashMap<String, usize>,
    store: GroupStore,
}

/// A file that could not be turned into a schema during a scan.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug)]
pub struct ScanReport {
    pub discovered: usize,
    pub schemas: Vec<FileSchema>,
    pub failures: Vec<ScanFailure>,
    pub duration: Duration,
}

impl GroupingSession {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            files: Vec::new(),
            file_index: AHashMap::new(),
            store: GroupStore::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Forget every file, group, processor and processed name.
    pub fn reset(&mut self) {
        self.files.clear();
        self.file_index.clear();
        self.store.clear();
    }

    /// Scan `dir` using the configured pattern, recursion and sample size.
    ///
    /// Files that fail extraction are logged and reported but do not stop the
    /// scan. Extracted schemas join the session's file index; a path scanned
    /// again replaces its earlier schema.
    pub fn scan_directory(
        &mut self,
        dir: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<ScanReport> {
        let start = Instant::now();
        let candidates = scanner::discover_files(dir, self.config.recursive, &self.config.pattern)?;
        info!("Scanning {} candidate files in {}", candidates.len(), dir.display());
        reporter.on_scan_start(candidates.len());

        let mut schemas = Vec::new();
        let mut failures = Vec::new();

        for path in candidates.iter() {
            match schema::extract_from_path(path, self.config.sample_rows) {
                Ok(schema) => {
                    reporter.on_file_extracted(schemas.len() + 1, &schema.path);
                    self.add_schema(schema.clone());
                    schemas.push(schema);
                }
                Err(error) => {
                    warn!("Could not parse {}: {}", path.display(), error);
                    reporter.on_file_failed(&path.to_string_lossy(), &error.to_string());
                    failures.push(ScanFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        let duration = start.elapsed();
        reporter.on_scan_complete(schemas.len(), failures.len(), duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s: {} extracted, {} failed",
            duration.as_secs_f64(),
            schemas.len(),
            failures.len()
        );

        Ok(ScanReport {
            discovered: candidates.len(),
            schemas,
            failures,
            duration,
        })
    }

    /// Add a schema built elsewhere. A schema with a known path replaces the
    /// earlier one in place.
    pub fn add_schema(&mut self, schema: FileSchema) {
        match self.file_index.get(&schema.path) {
            Some(&idx) => self.files[idx] = schema,
            None => {
                self.file_index.insert(schema.path.clone(), self.files.len());
                self.files.push(schema);
            }
        }
    }

    pub fn files(&self) -> &[FileSchema] {
        &self.files
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GroupStore {
        &mut self.store
    }

    pub fn groups(&self) -> &Groups {
        self.store.groups()
    }

    pub fn group_by_exact_match(&mut self, reporter: &dyn ProgressReporter) -> &Groups {
        let groups = grouping::group_by_exact_match(&self.files);
        reporter.on_grouping_complete(groups.len());
        self.store.replace(groups);
        self.store.groups()
    }

    pub fn group_by_similarity(
        &mut self,
        threshold: f64,
        reporter: &dyn ProgressReporter,
    ) -> Result<&Groups> {
        let groups = grouping::group_by_similarity(&self.files, threshold)?;
        reporter.on_grouping_complete(groups.len());
        self.store.replace(groups);
        Ok(self.store.groups())
    }

    pub fn compute_similarity(&self, a: &FileSchema, b: &FileSchema) -> f64 {
        grouping::compute_similarity(a, b)
    }

    pub fn get_group(&self, name: &str) -> Option<&Group> {
        self.store.get_group(name)
    }

    pub fn get_files_in_group(&self, name: &str) -> Option<Vec<String>> {
        self.store.get_files_in_group(name)
    }

    pub fn register_processor<F>(&mut self, name: impl Into<String>, processor: F)
    where
        F: FnMut(&[String]) -> std::result::Result<(), BoxError> + 'static,
    {
        self.store.register_processor(name, processor);
    }

    pub fn process_group(&mut self, name: &str) -> Result<ProcessOutcome> {
        self.store.process_group(name)
    }

    pub fn iter_group_rows(&self, name: &str) -> Result<GroupRows> {
        self.store
            .get_group(name)
            .map(GroupRows::new)
            .ok_or_else(|| Error::UnknownGroup(name.to_string()))
    }

    /// Write the groups to `path`. The recorded sample size covers every
    /// member, including schemas loaded or added with larger samples.
    pub fn save_groupings(&self, path: &Path) -> Result<()> {
        snapshot::save_to_path(path, self.store.groups(), Some(self.config.sample_rows))
    }

    /// Replace the current groups with a saved snapshot and rebuild the file
    /// index from the group members.
    pub fn load_groupings(&mut self, path: &Path) -> Result<&Groups> {
        let groups = snapshot::load_from_path(path)?;

        self.files.clear();
        self.file_index.clear();
        for member in groups.values().flat_map(|g| g.members.iter()) {
            self.add_schema(member.clone());
        }

        self.store.replace(groups);
        Ok(self.store.groups())
    }

    pub fn summary(&self) -> String {
        let groups = self.store.groups();
        let mut lines = vec![
            "Schema Grouper Summary".to_string(),
            "======================".to_string(),
            format!("Total files: {}", self.files.len()),
            format!("Total groups: {}", groups.len()),
        ];

        for (name, group) in groups {
            lines.push(String::new());
            lines.push(format!("Group: {}", name));
            lines.push(format!("  Files: {}", group.len()));
            lines.push(format!(
                "  Similarity threshold: {:.0}%",
                group.similarity_threshold * 100.0
            ));
            let shown: Vec<&str> = group
                .canonical_headers
                .iter()
                .take(SUMMARY_HEADER_LIMIT)
                .map(String::as_str)
                .collect();
            lines.push(format!("  Headers: {}", shown.join(", ")));
            if group.canonical_headers.len() > SUMMARY_HEADER_LIMIT {
                lines.push(format!(
                    "    ... and {} more",
                    group.canonical_headers.len() - SUMMARY_HEADER_LIMIT
                ));
            }
        }

        lines.join("\n")
    }
}
