//! YAML configuration for the parcel card.
//!
//! Dashboard hosts store card options as YAML, so that is the format loaded
//! here. Everything except `entity` has a default.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! type: custom:hki-postnl-card
//! entity: sensor.postnl_delivery
//! distribution_entity: sensor.postnl_distribution
//! title: "PostNL"
//! days_back: 14
//! show_delivered: true
//! show_sent: true
//! show_animation: true
//! header_color: "#602f9c"
//! header_text_color: "#ffffff"
//! placeholder_background: "transparent"
//! placeholder_image: /local/postnl/placeholder.png
//! layout_order: [header, animation, tabs, list]
//! cutoff_sent: false
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shipments::{ConfigError, DEFAULT_DAYS_BACK, FilterConfig};
use thiserror::Error;

/// Errors that can occur when loading a card configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error(transparent)]
    Filter(#[from] ConfigError),

    #[error("validation error: {0}")]
    Validation(String),
}

pub const DEFAULT_TITLE: &str = "PostNL";
pub const DEFAULT_HEADER_COLOR: &str = "#602f9c";
pub const DEFAULT_HEADER_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_PLACEHOLDER_BACKGROUND: &str = "transparent";

/// Blocks of the card, in the order a renderer stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSection {
    Header,
    Animation,
    Tabs,
    List,
}

impl CardSection {
    pub const DEFAULT_ORDER: [CardSection; 4] = [
        CardSection::Header,
        CardSection::Tabs,
        CardSection::Animation,
        CardSection::List,
    ];
}

/// Card options as written in the dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Host card type tag (`custom:...`). Carried through, never interpreted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    /// Entity holding received parcels. Required.
    #[serde(default)]
    pub entity: String,

    /// Entity holding sent parcels; empty disables the sent feed.
    #[serde(default)]
    pub distribution_entity: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_days_back")]
    pub days_back: u32,

    #[serde(default = "true_value")]
    pub show_delivered: bool,

    #[serde(default = "true_value")]
    pub show_sent: bool,

    #[serde(default = "true_value")]
    pub show_animation: bool,

    /// Custom logo; empty uses the built-in one.
    #[serde(default)]
    pub logo_path: String,

    /// Custom delivery van image; empty uses the built-in one.
    #[serde(default)]
    pub van_path: String,

    #[serde(default = "default_header_color")]
    pub header_color: String,

    #[serde(default = "default_header_text_color")]
    pub header_text_color: String,

    #[serde(default = "default_placeholder_background")]
    pub placeholder_background: String,

    /// Image shown in the animation area while no parcel is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_image: Option<String>,

    #[serde(default = "default_layout_order")]
    pub layout_order: Vec<CardSection>,

    /// Apply the `days_back` window to the sent feed too.
    #[serde(default)]
    pub cutoff_sent: bool,
}

impl CardConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CardConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration offered for a freshly added card.
    pub fn stub() -> Self {
        Self {
            entity: "sensor.postnl".to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.entity.trim().is_empty() {
            return Err(ConfigLoadError::MissingField("entity".to_string()));
        }

        self.filter().validate()?;

        let mut seen = HashSet::new();
        if let Some(dup) = self.layout_order.iter().find(|section| !seen.insert(**section)) {
            return Err(ConfigLoadError::Validation(format!(
                "layout_order lists {dup:?} more than once"
            )));
        }

        Ok(())
    }

    /// The received-parcels entity id, surrounding whitespace removed.
    pub fn entity_id(&self) -> &str {
        self.entity.trim()
    }

    /// The sent-feed entity, `None` when not configured.
    pub fn distribution_entity(&self) -> Option<&str> {
        let entity = self.distribution_entity.trim();
        (!entity.is_empty()).then_some(entity)
    }

    /// Options that drive record filtering.
    pub fn filter(&self) -> FilterConfig {
        FilterConfig {
            days_back: self.days_back,
            cutoff_sent: self.cutoff_sent,
        }
    }
}

impl Default for CardConfig {
    /// Defaults for every option; `entity` is left empty and must be set
    /// before the config validates.
    fn default() -> Self {
        Self {
            card_type: None,
            entity: String::new(),
            distribution_entity: String::new(),
            title: default_title(),
            days_back: default_days_back(),
            show_delivered: true,
            show_sent: true,
            show_animation: true,
            logo_path: String::new(),
            van_path: String::new(),
            header_color: default_header_color(),
            header_text_color: default_header_text_color(),
            placeholder_background: default_placeholder_background(),
            placeholder_image: None,
            layout_order: default_layout_order(),
            cutoff_sent: false,
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}
fn default_days_back() -> u32 {
    DEFAULT_DAYS_BACK
}
fn true_value() -> bool {
    true
}
fn default_header_color() -> String {
    DEFAULT_HEADER_COLOR.to_string()
}
fn default_header_text_color() -> String {
    DEFAULT_HEADER_TEXT_COLOR.to_string()
}
fn default_placeholder_background() -> String {
    DEFAULT_PLACEHOLDER_BACKGROUND.to_string()
}
fn default_layout_order() -> Vec<CardSection> {
    CardSection::DEFAULT_ORDER.to_vec()
}
