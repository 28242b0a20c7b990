use super::snapshot;
use crate::analysis::grouping::{Group, Groups};
use crate::error::{BoxError, Error, Result};
use ahash::{AHashMap, AHashSet};
use std::fmt;
use tracing::{debug, info};

/// Callback run over the ordered member paths of one group.
pub type Processor = Box<dyn FnMut(&[String]) -> std::result::Result<(), BoxError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Processed,
    /// The group already ran in this session; the processor was not called.
    AlreadyProcessed,
}

/// Registry of named groups for one grouping session, with the processors
/// registered against them and the names already processed.
///
/// Not synchronized: callers sharing a store across threads must serialize
/// access themselves.
#[derive(Default)]
pub struct GroupStore {
    groups: Groups,
    processed: AHashSet<String>,
    processors: AHashMap<String, Processor>,
}

impl fmt::Debug for GroupStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<&String> = self.processors.keys().collect();
        registered.sort();
        f.debug_struct("GroupStore")
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("processed", &self.processed)
            .field("processors", &registered)
            .finish()
    }
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get_group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Member paths in insertion order, or `None` if the group does not exist.
    pub fn get_files_in_group(&self, name: &str) -> Option<Vec<String>> {
        self.groups.get(name).map(Group::file_paths)
    }

    /// Install the result of a new grouping pass. Processed names are
    /// forgotten; registered processors are kept.
    pub fn replace(&mut self, groups: Groups) {
        debug!("Replacing {} groups with {}", self.groups.len(), groups.len());
        self.groups = groups;
        self.processed.clear();
    }

    /// Drop groups, processed names and processors.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.processed.clear();
        self.processors.clear();
    }

    /// Register `processor` for `name`, replacing any earlier one. The group
    /// does not have to exist yet.
    pub fn register_processor<F>(&mut self, name: impl Into<String>, processor: F)
    where
        F: FnMut(&[String]) -> std::result::Result<(), BoxError> + 'static,
    {
        let name = name.into();
        debug!("Registering processor for group {}", name);
        self.processors.insert(name, Box::new(processor));
    }

    pub fn has_processor(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    pub fn is_processed(&self, name: &str) -> bool {
        self.processed.contains(name)
    }

    pub fn reset_processed(&mut self) {
        self.processed.clear();
    }

    /// Run the processor registered for `name` over the group's member paths.
    ///
    /// Runs at most once per session: a successful run marks the group as
    /// processed and later calls return [`ProcessOutcome::AlreadyProcessed`].
    /// A processor failure is wrapped in [`Error::Processor`] with the group
    /// name; the processor's own error is its `source` and can be recovered
    /// with `downcast_ref`. The group stays unprocessed.
    pub fn process_group(&mut self, name: &str) -> Result<ProcessOutcome> {
        let group = self
            .groups
            .get(name)
            .ok_or_else(|| Error::UnknownGroup(name.to_string()))?;
        let processor = self
            .processors
            .get_mut(name)
            .ok_or_else(|| Error::NoProcessorRegistered(name.to_string()))?;

        if self.processed.contains(name) {
            debug!("Group {} already processed in this session", name);
            return Ok(ProcessOutcome::AlreadyProcessed);
        }

        let paths = group.file_paths();
        info!("Processing group {} ({} files)", name, paths.len());
        processor(paths.as_slice()).map_err(|source| Error::Processor {
            group: name.to_string(),
            source,
        })?;

        self.processed.insert(name.to_string());
        Ok(ProcessOutcome::Processed)
    }

    /// Process every group that has a registered processor, in group order.
    /// Stops at the first failure. Returns how many groups ran.
    pub fn process_all(&mut self) -> Result<usize> {
        let names: Vec<String> = self
            .groups
            .keys()
            .filter(|name| self.processors.contains_key(*name))
            .cloned()
            .collect();

        let mut ran = 0;
        for name in names {
            if self.process_group(&name)? == ProcessOutcome::Processed {
                ran += 1;
            }
        }
        Ok(ran)
    }

    /// Serialize the current groups.
    pub fn save(&self, sample_rows: Option<usize>) -> Result<String> {
        snapshot::save(&self.groups, sample_rows)
    }

    /// Replace the current groups with those in `snapshot`.
    pub fn load(&mut self, snapshot: &str) -> Result<&Groups> {
        let groups = snapshot::load(snapshot)?;
        self.replace(groups);
        Ok(&self.groups)
    }
}
