//! Container records built from a listing

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

use crate::listing::{ColumnSpec, Listing};
use crate::Result;

/// Name of the synthetic running flag in serialized records
pub const RUNNING_FIELD: &str = "RUNNING";

/// One row of the "all containers" listing
///
/// Holds exactly one value per column of the listing header plus the
/// running flag. The first column is the identifier used to match rows of
/// the running-only listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    columns: Arc<ColumnSpec>,
    values: Vec<String>,
    running: bool,
}

impl ContainerRecord {
    /// Slice a data row according to `columns`; the record starts stopped
    #[must_use]
    pub fn from_row(columns: Arc<ColumnSpec>, row: &str) -> Self {
        let values = columns.split_row(row);
        Self {
            columns,
            values,
            running: false,
        }
    }

    /// Value of the identifier (first) column
    #[must_use]
    pub fn id(&self) -> &str {
        &self.values[0]
    }

    /// Value of a field by name (`CONTAINER_ID`, `IMAGE`, ...)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .position(name)
            .map(|index| self.values[index].as_str())
    }

    /// Whether the container appeared in the running-only listing
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Flag the container as running
    pub fn mark_running(&mut self) {
        self.running = true;
    }

    /// `(name, value)` pairs in column order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .names()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Columns this record was sliced with
    #[must_use]
    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }
}

impl Serialize for ContainerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(RUNNING_FIELD, &self.running)?;
        map.end()
    }
}

/// Records in the order their rows appeared in the "all" listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerCollection {
    records: Vec<ContainerRecord>,
}

impl ContainerCollection {
    /// Create an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build records from the "all containers" listing
    ///
    /// # Errors
    /// Returns [`Error::Parse`](crate::Error::Parse) if the header cannot be
    /// parsed.
    pub fn from_listing(listing: &Listing<'_>) -> Result<Self> {
        let columns = Arc::new(listing.columns()?);
        let records = listing
            .rows
            .iter()
            .map(|row| ContainerRecord::from_row(Arc::clone(&columns), row))
            .collect();

        Ok(Self { records })
    }

    /// Flag records that appear in the running-only listing
    ///
    /// Each running row is cut to the identifier width of its own header and
    /// matched exactly against record identifiers. Only the first matching
    /// record is flagged. Returns the number of running rows that matched.
    ///
    /// # Errors
    /// Returns [`Error::Parse`](crate::Error::Parse) if the running header
    /// does not contain the second column of the "all" listing.
    pub fn apply_running(&mut self, running: &Listing<'_>) -> Result<usize> {
        let Some(columns) = self.records.first().map(|r| Arc::clone(&r.columns)) else {
            return Ok(0);
        };

        let width = running.identifier_width(&columns)?;
        let mut matched = 0;

        for row in &running.rows {
            let id = Listing::leading_identifier(row, width);
            match self.records.iter_mut().find(|record| record.id() == id) {
                Some(record) => {
                    record.mark_running();
                    matched += 1;
                }
                None => tracing::debug!(container_id = %id, "Running container not in listing"),
            }
        }

        Ok(matched)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in listing order
    pub fn iter(&self) -> std::slice::Iter<'_, ContainerRecord> {
        self.records.iter()
    }

    /// First record with the given identifier
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ContainerRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Records flagged as running
    pub fn running(&self) -> impl Iterator<Item = &ContainerRecord> {
        self.records.iter().filter(|record| record.is_running())
    }

    /// Identifiers of records flagged as running, in listing order
    #[must_use]
    pub fn running_ids(&self) -> Vec<String> {
        self.running().map(|record| record.id().to_string()).collect()
    }
}

impl From<Vec<ContainerRecord>> for ContainerCollection {
    fn from(records: Vec<ContainerRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for ContainerCollection {
    type Item = ContainerRecord;
    type IntoIter = std::vec::IntoIter<ContainerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContainerCollection {
    type Item = &'a ContainerRecord;
    type IntoIter = std::slice::Iter<'a, ContainerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for ContainerCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &str = "\
ID       IMAGE    NAMES
aaa111   nginx    web
bbb222   redis    cache
ccc333   nginx    worker
";

    fn collection() -> ContainerCollection {
        ContainerCollection::from_listing(&Listing::split(ALL).unwrap()).unwrap()
    }

    #[test]
    fn test_records_start_stopped() {
        let containers = collection();
        assert_eq!(containers.len(), 3);
        assert!(containers.iter().all(|r| !r.is_running()));
        assert_eq!(containers.find("bbb222").unwrap().get("NAMES"), Some("cache"));
        assert_eq!(containers.find("bbb222").unwrap().get("RUNNING"), None);
    }

    #[test]
    fn test_apply_running_with_different_layout() {
        let mut containers = collection();
        let running = "ID     IMAGE   NAMES\nccc333 nginx   worker\naaa111 nginx   web\n";
        let matched = containers
            .apply_running(&Listing::split(running).unwrap())
            .unwrap();

        assert_eq!(matched, 2);
        assert_eq!(containers.running_ids(), ["aaa111", "ccc333"]);
    }

    #[test]
    fn test_apply_running_ignores_unknown() {
        let mut containers = collection();
        let running = "ID       IMAGE    NAMES\nzzz999   nginx    ghost\n";
        let matched = containers
            .apply_running(&Listing::split(running).unwrap())
            .unwrap();

        assert_eq!(matched, 0);
        assert!(containers.running_ids().is_empty());
    }

    #[test]
    fn test_apply_running_requires_exact_match() {
        let mut containers = collection();
        let running = "ID        IMAGE    NAMES\naaa1111   nginx    web\n";
        containers
            .apply_running(&Listing::split(running).unwrap())
            .unwrap();
        assert!(!containers.find("aaa111").unwrap().is_running());
    }

    #[test]
    fn test_duplicate_identifier_flags_first_only() {
        let all = "ID       NAMES\ndup      one\ndup      two\n";
        let mut containers =
            ContainerCollection::from_listing(&Listing::split(all).unwrap()).unwrap();
        containers
            .apply_running(&Listing::split("ID       NAMES\ndup      one\n").unwrap())
            .unwrap();

        let flags: Vec<bool> = containers.iter().map(ContainerRecord::is_running).collect();
        assert_eq!(flags, [true, false]);
    }

    #[test]
    fn test_apply_running_on_empty_collection() {
        let mut containers = ContainerCollection::new();
        let running = Listing::split("ID    NAMES\na1    web\n").unwrap();
        assert_eq!(containers.apply_running(&running).unwrap(), 0);
    }

    #[test]
    fn test_record_serialization() {
        let mut containers = collection();
        containers
            .apply_running(&Listing::split("ID       IMAGE\naaa111   nginx\n").unwrap())
            .unwrap();

        let json = serde_json::to_string(containers.find("aaa111").unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"ID":"aaa111","IMAGE":"nginx","NAMES":"web","RUNNING":true}"#
        );

        let value = serde_json::to_value(&containers).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[1]["RUNNING"], false);
    }
}
