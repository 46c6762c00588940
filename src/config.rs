//! Configuration for the field-index merging iterator
//!
//! Hosts hand iterators their settings as string options; `Config::from_options`
//! turns those into a typed config with sensible defaults.

use std::collections::{BTreeSet, HashMap};

/// Option key holding the comma-separated field names to skip
pub const FIELDS_TO_SKIP: &str = "FIELDS_TO_SKIP";

/// Fields skipped when the host supplies no `FIELDS_TO_SKIP` option
pub const DEFAULT_FIELDS_TO_SKIP: &str = "LOAD_DATE,RAW_FILE,TERM_COUNT";

/// Main configuration for a merging iterator instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Field names excluded from assembled documents and from verification
    pub fields_to_skip: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fields_to_skip: parse_field_list(DEFAULT_FIELDS_TO_SKIP),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a config from host-supplied string options.
    ///
    /// Unknown keys are ignored so hosts can share one option map between
    /// stacked iterators.
    pub fn from_options(options: &HashMap<String, String>) -> Self {
        match options.get(FIELDS_TO_SKIP) {
            Some(list) => Self {
                fields_to_skip: parse_field_list(list),
            },
            None => Self::default(),
        }
    }

    /// Whether `field_name` is excluded from assembly and verification
    pub fn skips(&self, field_name: &str) -> bool {
        self.fields_to_skip.contains(field_name)
    }
}

/// Split a comma-separated field list, trimming names and dropping empties
pub fn parse_field_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Replace the skip-set with the given field names
    pub fn fields_to_skip<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fields_to_skip = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add one field name to the skip-set
    pub fn skip_field(mut self, field: impl Into<String>) -> Self {
        self.config.fields_to_skip.insert(field.into());
        self
    }

    /// Verify every field, skipping none
    pub fn no_skipped_fields(mut self) -> Self {
        self.config.fields_to_skip.clear();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
