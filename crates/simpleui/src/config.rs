//! Configuration for groups, item views and tooltips.
//!
//! Every field has a default, so a configuration file only needs to name
//! the values it changes:
//!
//! ```
//! use simpleui::config::{ClickAction, UiConfig};
//!
//! let config = UiConfig::from_toml_str(
//!     r#"
//!     [group]
//!     max_count = 8
//!     click_action = "remove"
//!
//!     [tooltip]
//!     show_delay_ms = 250
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.group.max_count, Some(8));
//! assert_eq!(config.group.click_action, ClickAction::Remove);
//! assert!(config.item.selectable);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use simpleui_core::Error;

/// What a primary click on an item does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    /// Emit the click, selecting first when `select_on_click` is set.
    #[default]
    Click,
    /// Select the item.
    Select,
    /// Ask for the item to be removed.
    Remove,
    /// Do nothing.
    None,
}

/// Group view settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Upper bound on the number of item views. `None` means unlimited.
    pub max_count: Option<usize>,
    /// Insert new views as the first child of the content node.
    pub new_on_top: bool,
    /// Whether [`ClickAction::Click`] selects the clicked item.
    pub select_on_click: bool,
    /// Action performed when an item is clicked.
    pub click_action: ClickAction,
    /// Refresh when the backing source list reports a change.
    pub subscribe_to_source: bool,
    /// Template kind used for values without a kind of their own.
    pub template: String,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_count: None,
            new_on_top: false,
            select_on_click: true,
            click_action: ClickAction::Select,
            subscribe_to_source: false,
            template: "item".to_string(),
        }
    }
}

/// Item view settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Whether the view can be selected at all.
    pub selectable: bool,
    /// Show the view when a value is bound.
    pub show_if_present: bool,
    /// Hide the view when no value is bound.
    pub hide_if_absent: bool,
    /// Action performed by a primary-button press on the view.
    pub click_action: ClickAction,
    /// Whether [`ClickAction::Click`] selects the view before clicking.
    pub select_on_click: bool,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            selectable: true,
            show_if_present: false,
            hide_if_absent: false,
            click_action: ClickAction::Click,
            select_on_click: true,
        }
    }
}

/// Tooltip settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Hover time before a tooltip appears.
    pub show_delay_ms: u64,
    /// Horizontal content offset from the pointer.
    pub offset_x: f32,
    /// Vertical content offset from the pointer.
    pub offset_y: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 100,
            offset_x: 0.0,
            offset_y: 30.0,
        }
    }
}

impl TooltipConfig {
    /// The hover delay as a [`Duration`].
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub group: GroupConfig,
    pub item: ItemConfig,
    pub tooltip: TooltipConfig,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this configuration.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but are inconsistent.
    #[error(transparent)]
    Invalid(#[from] Error),
}

impl UiConfig {
    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded ui config");
        Ok(config)
    }

    /// Checks values that parse but cannot work.
    pub fn validate(&self) -> Result<(), Error> {
        if self.group.template.trim().is_empty() {
            return Err(Error::invalid_config("group.template must not be empty"));
        }
        if !self.tooltip.offset_x.is_finite() || !self.tooltip.offset_y.is_finite() {
            return Err(Error::invalid_config("tooltip offsets must be finite"));
        }
        Ok(())
    }
}
