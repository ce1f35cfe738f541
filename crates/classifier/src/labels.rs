//! Breed label index loaded from the classifier's class-mapping file.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::ClassifierError;

/// Label returned when the classifier cannot produce a real breed name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Maps classifier output positions to breed names.
///
/// The mapping file stores `breed name -> output index` pairs; the map is
/// inverted at load time so lookups go from an output position to a name.
/// The index is immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct LabelIndex {
    names: HashMap<usize, String>,
}

impl LabelIndex {
    /// Loads the label index from a JSON object of `name -> index` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object
    /// of string keys and integer values.
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path)?;
        let by_name: HashMap<String, usize> = serde_json::from_str(&raw)?;

        debug!(classes = by_name.len(), labels = %path.display(), "loaded label index");

        Ok(Self::from_name_map(by_name))
    }

    /// Builds the index from an in-memory `name -> index` map.
    #[must_use]
    pub fn from_name_map(by_name: HashMap<String, usize>) -> Self {
        let names = by_name
            .into_iter()
            .map(|(name, index)| (index, name))
            .collect();

        Self { names }
    }

    /// Returns the breed name at an output position, or the Unknown sentinel
    /// for a position the mapping does not cover.
    #[must_use]
    pub fn name_for(&self, index: usize) -> &str {
        self.names.get(&index).map_or(UNKNOWN_LABEL, String::as_str)
    }

    /// Number of known breeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
