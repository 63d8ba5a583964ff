//! Translation settings.
//!
//! Plain data with serde defaults so that any subset of the sections can be
//! given in a TOML file. Discovering and merging files is the caller's job.
//!
//! ```toml
//! [output]
//! indent_width = 2
//!
//! [translate]
//! dropped_imports = ["Foundation", "Swift", "UIKit", "Combine"]
//!
//! [tree]
//! horizontal_limit = 0   # no truncation
//! ```

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub output: OutputConfig,
    pub translate: TranslateOptions,
    pub tree: TreeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Swift modules whose imports have no Kotlin counterpart.
    pub dropped_imports: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            dropped_imports: ["Foundation", "Swift", "UIKit"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl TranslateOptions {
    pub fn drops_import(&self, module: &str) -> bool {
        self.dropped_imports.iter().any(|m| m == module)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum characters per rendered line; 0 disables truncation.
    pub horizontal_limit: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            horizontal_limit: 100,
        }
    }
}

impl TreeConfig {
    pub fn limit(&self) -> Option<usize> {
        (self.horizontal_limit > 0).then_some(self.horizontal_limit)
    }
}
