use crate::catalog::{FieldCatalog, FieldSpec};
use crate::filter::RangeOp;
use crate::filter::clause::DEFAULT_KEYWORD_SUFFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub normalizer: NormalizerRules,
    pub range: RangeRules,
    pub query: QueryRules,
    /// Fields offered by the filter bar
    pub catalog: Vec<FieldSpec>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            normalizer: NormalizerRules::default(),
            range: RangeRules::default(),
            query: QueryRules::default(),
            catalog: Vec::new(),
        }
    }
}

impl CompilerConfig {
    pub fn field_catalog(&self) -> FieldCatalog {
        FieldCatalog::new(self.catalog.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerRules {
    /// Fields ending with this are matched exactly and never coerced to numbers
    pub keyword_suffix: String,
}

impl Default for NormalizerRules {
    fn default() -> Self {
        Self {
            keyword_suffix: DEFAULT_KEYWORD_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeRules {
    pub default_min_operator: RangeOp,
    pub default_max_operator: RangeOp,
}

impl Default for RangeRules {
    fn default() -> Self {
        Self {
            default_min_operator: RangeOp::Gt,
            default_max_operator: RangeOp::Lt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRules {
    pub case_insensitive: bool,
}

impl Default for QueryRules {
    fn default() -> Self {
        Self {
            case_insensitive: true,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<CompilerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn parse_config(raw: &str) -> Result<CompilerConfig, toml::de::Error> {
    toml::from_str::<CompilerConfig>(raw)
}

pub fn default_config() -> &'static CompilerConfig {
    static DEFAULT_CONFIG: LazyLock<CompilerConfig> = LazyLock::new(CompilerConfig::default);
    &DEFAULT_CONFIG
}
