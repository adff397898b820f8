//! Author and work skeletons recovered from an index file.

use crate::anomaly::IndexAnomaly;
use oxicite_citation::{LevelLabels, WorkCatalog};
use std::collections::BTreeMap;

/// One work of an author, as listed in the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkSkeleton {
    /// Author number (`"0006"`).
    pub author_number: String,
    /// Work number (`"001"`).
    pub work_number: String,
    /// Work name.
    pub name: String,
    /// First block of the work in the text file.
    pub start_block: u16,
    /// Level labels, depth → label.
    pub levels: LevelLabels,
    /// Number of section records.
    pub sections: usize,
}

impl WorkSkeleton {
    /// Work number as an integer, matching the text file's work counter.
    pub fn number(&self) -> Option<u16> {
        self.work_number.trim().parse().ok()
    }

    /// Label of a level.
    pub fn label(&self, depth: u8) -> Option<&str> {
        self.levels.get(&depth).map(String::as_str)
    }
}

/// One author and its works.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorSkeleton {
    /// Author number (`"0006"`).
    pub number: String,
    /// Author name.
    pub name: String,
    /// First block of the author in the text file.
    pub start_block: u16,
    /// Works in index order.
    pub works: Vec<WorkSkeleton>,
    /// Anomalies recovered during the walk.
    pub anomalies: Vec<IndexAnomaly>,
}

impl AuthorSkeleton {
    /// Find a work by its number string.
    pub fn work(&self, work_number: &str) -> Option<&WorkSkeleton> {
        self.works.iter().find(|w| w.work_number == work_number)
    }

    /// Find a work by its numeric value.
    pub fn work_by_number(&self, number: u16) -> Option<&WorkSkeleton> {
        self.works.iter().find(|w| w.number() == Some(number))
    }

    /// Check whether the walk ended early.
    pub fn is_partial(&self) -> bool {
        self.anomalies.iter().any(IndexAnomaly::is_fatal)
    }
}

impl WorkCatalog for AuthorSkeleton {
    fn labels(&self, work: u16) -> Option<&LevelLabels> {
        self.work_by_number(work).map(|w| &w.levels)
    }

    fn work_name(&self, work: u16) -> Option<&str> {
        self.work_by_number(work)
            .map(|w| w.name.as_str())
            .filter(|name| !name.is_empty())
    }

    fn all_labels(&self) -> BTreeMap<u16, LevelLabels> {
        self.works
            .iter()
            .filter_map(|w| Some((w.number()?, w.levels.clone())))
            .collect()
    }
}
