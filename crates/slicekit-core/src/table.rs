use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::codec;
use crate::error::Result;
use crate::model::{Slice, TableStats};
use crate::source;

/// Read-only registry of named slices.
///
/// Built once at load time, then shared immutably (`&SliceTable` or
/// `Arc<SliceTable>`) by every drawing call for the process lifetime.
/// There is no mutation API; lookups need no locking because no writer
/// exists after construction. Duplicate names in a source are resolved
/// last-write-wins.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct SliceTable {
    slices: BTreeMap<String, Slice>,
}

impl SliceTable {
    /// Builds a table from `(name, record)` pairs. Later pairs overwrite
    /// earlier ones with the same name.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, Slice)>,
    {
        Self {
            slices: records.into_iter().collect(),
        }
    }

    /// Decodes a table from the compact binary format.
    #[instrument(skip_all)]
    pub fn from_compact(bytes: &[u8]) -> Result<Self> {
        let table = codec::decode_table(bytes)?;
        debug!(entries = table.len(), "decoded compact slice table");
        Ok(table)
    }

    /// Parses a table from the descriptive JSON sheet format.
    #[instrument(skip_all)]
    pub fn from_source_str(json: &str) -> Result<Self> {
        let table = source::parse_sheet(json)?;
        debug!(entries = table.len(), "loaded slice sheet");
        Ok(table)
    }

    /// Reads and decodes a compact table file.
    pub fn from_compact_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_compact(&bytes)
    }

    /// Reads and parses a sheet JSON file.
    pub fn from_source_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_source_str(&json)
    }

    /// Encodes this table into the compact binary format.
    pub fn to_compact(&self) -> Result<Vec<u8>> {
        codec::encode_table(self)
    }

    pub fn get(&self, name: &str) -> Option<&Slice> {
        self.slices.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Slice)> {
        self.slices.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    /// Computes per-field min/max statistics for this table.
    pub fn stats(&self) -> TableStats {
        TableStats::from_slices(self.slices.values())
    }
}
