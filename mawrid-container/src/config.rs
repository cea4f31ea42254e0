//! Container settings.
//!
//! Settings are plain data so hosts can load them alongside the rest of
//! their configuration:
//!
//! ```
//! use mawrid_container::config::ContainerSettings;
//!
//! let settings = ContainerSettings::default().with_max_suggestions(5);
//! assert_eq!(settings.max_suggestions, 5);
//! ```

use serde::Deserialize;

/// Tunables for a [`Container`](crate::container::Container).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// How many "did you mean" candidates a not-found error carries.
    /// Zero disables the lookup.
    pub max_suggestions: usize,
}

impl ContainerSettings {
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self { max_suggestions: 3 }
    }
}
