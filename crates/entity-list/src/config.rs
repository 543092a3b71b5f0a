//! Plugin configuration.
//!
//! [`PluginConfig`] can be built in code or loaded from YAML. Every field has
//! a default, so an empty document is a valid configuration:
//!
//! ```rust
//! use entity_list::{ItemErrorPolicy, PluginConfig};
//!
//! let config = PluginConfig::from_yaml(r#"
//! default_title: Devices
//! on_item_error: placeholder
//! extra_styles:
//!   - css/site.css
//! "#).unwrap();
//!
//! assert_eq!(config.default_title, "Devices");
//! assert_eq!(config.on_item_error, ItemErrorPolicy::Placeholder);
//! assert_eq!(config.extra_styles, vec!["css/site.css"]);
//! assert!(config.extra_scripts.is_empty());
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Title used when a render call supplies an empty one.
pub const DEFAULT_TITLE: &str = "Entity List";

/// What happens when one item's renderer fails during template execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorPolicy {
    /// Fail the whole list render.
    #[default]
    Abort,
    /// Log the failure and emit an error placeholder for that item.
    Placeholder,
}

/// Configuration for [`EntityListPlugin`](crate::EntityListPlugin).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Title used when a render call supplies an empty one.
    pub default_title: String,
    /// Failure handling for individual item renders.
    pub on_item_error: ItemErrorPolicy,
    /// Stylesheets added after the template's own, before any renderer's.
    pub extra_styles: Vec<String>,
    /// Scripts added after the template's own, before any renderer's.
    pub extra_scripts: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            on_item_error: ItemErrorPolicy::Abort,
            extra_styles: Vec::new(),
            extra_scripts: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// Parses a YAML document. Missing fields take their defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Sets the fallback title.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Sets the item failure policy.
    pub fn with_item_error_policy(mut self, policy: ItemErrorPolicy) -> Self {
        self.on_item_error = policy;
        self
    }

    /// Resolves the title for one call.
    pub fn title_or_default(&self, title: String) -> String {
        if title.is_empty() {
            self.default_title.clone()
        } else {
            title
        }
    }
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML or does not match the schema.
    #[error("invalid plugin configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
