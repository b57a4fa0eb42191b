//! Query options.
//!
//! Hosts usually receive these as JSON (tsserver-style camelCase keys), so
//! every struct here deserializes with defaults for missing fields.

use serde::{Deserialize, Serialize};

/// What a reference search is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FindReferencesUse {
    #[default]
    References,
    /// Every returned location will be edited: aliases are respected,
    /// `default` keywords and `.default` accesses are skipped.
    Rename,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindReferencesOptions {
    #[serde(rename = "use")]
    pub use_kind: FindReferencesUse,
    pub find_in_strings: bool,
    pub find_in_comments: bool,
    /// Rename keeps aliases intact by emitting `old as new` style edits
    /// instead of renaming through them.
    pub provide_prefix_and_suffix_text_for_rename: bool,
    /// Keep only implementation sites.
    pub implementations: bool,
}

impl FindReferencesOptions {
    pub fn references() -> Self {
        Self::default()
    }

    pub fn implementations() -> Self {
        FindReferencesOptions {
            implementations: true,
            ..Self::default()
        }
    }

    pub fn is_rename(&self) -> bool {
        self.use_kind == FindReferencesUse::Rename
    }

    pub fn is_rename_with_prefix_and_suffix(&self) -> bool {
        self.is_rename() && self.provide_prefix_and_suffix_text_for_rename
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameOptions {
    pub find_in_strings: bool,
    pub find_in_comments: bool,
    pub provide_prefix_and_suffix_text_for_rename: bool,
}

impl RenameOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&RenameOptions> for FindReferencesOptions {
    fn from(options: &RenameOptions) -> Self {
        FindReferencesOptions {
            use_kind: FindReferencesUse::Rename,
            find_in_strings: options.find_in_strings,
            find_in_comments: options.find_in_comments,
            provide_prefix_and_suffix_text_for_rename: options
                .provide_prefix_and_suffix_text_for_rename,
            implementations: false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod options_tests;
