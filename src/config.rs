//! Process-wide defaults.
//!
//! Every call to `to_sql` starts from a copy of these defaults. They can be
//! replaced in code with [`set_defaults`] or loaded from a TOML file:
//!
//! ```toml
//! connective = "OR"
//! placeholder = "dollar"
//! placeholder_offset = 1
//! tag_name = "filter"
//! ```

use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::placeholder::Placeholder;
use crate::query::Connective;

/// Default tag key, as in `#[tag(filter = "...")]`.
pub const DEFAULT_TAG_NAME: &str = "filter";

/// Defaults copied into every call's options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub connective: Connective,
    pub placeholder: Placeholder,
    /// First number used by the numbered placeholder dialects.
    pub placeholder_offset: usize,
    pub tag_name: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            connective: Connective::And,
            placeholder: Placeholder::Anonymous,
            placeholder_offset: 1,
            tag_name: DEFAULT_TAG_NAME.to_string(),
        }
    }
}

impl Defaults {
    /// Parse defaults from TOML text. Missing keys keep their default.
    pub fn from_toml(content: &str) -> FilterResult<Self> {
        toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))
    }

    /// Load defaults from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> FilterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let defaults = Self::from_toml(&content)
            .map_err(|e| FilterError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded defaults");
        Ok(defaults)
    }

    /// `<config dir>/queryfilter/config.toml`, when the platform has a config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("queryfilter").join("config.toml"))
    }

    /// Load the user config file if it exists.
    pub fn discover() -> FilterResult<Option<Self>> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load(path).map(Some),
            _ => Ok(None),
        }
    }
}

fn cell() -> &'static RwLock<Defaults> {
    static DEFAULTS: OnceLock<RwLock<Defaults>> = OnceLock::new();
    DEFAULTS.get_or_init(|| RwLock::new(Defaults::default()))
}

/// A copy of the current process-wide defaults.
pub fn defaults() -> Defaults {
    cell().read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replace the process-wide defaults. Calls already in flight keep their copy.
pub fn set_defaults(defaults: Defaults) {
    *cell().write().unwrap_or_else(PoisonError::into_inner) = defaults;
}
