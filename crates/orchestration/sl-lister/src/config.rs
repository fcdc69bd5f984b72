//! Configuration types for the listing processor.

use serde::{Deserialize, Serialize};

use crate::filter::ExclusionSet;

/// Configuration for a listing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Emit one record per retained file after the directory records
    pub include_files: bool,

    /// Extensions dropped from the file records
    pub exclusions: ExclusionSet,
}

impl ListingConfig {
    /// Create a new listing configuration with defaults (directories only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable file records.
    pub fn with_include_files(mut self, include_files: bool) -> Self {
        self.include_files = include_files;
        self
    }

    /// Set the excluded extensions.
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }
}
