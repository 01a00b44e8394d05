use crate::adapters::table_writer::TableFormat;
use crate::config::access_code::AuthConfig;
use crate::domain::model::{Dataset, DEFAULT_BASE_URL};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_OUTPUT_PATH: &str = "./TravelerInfo";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelerInfoConfig {
    pub source: SourceConfig,
    pub auth: AuthConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compress: bool,
    pub datasets: Option<Vec<String>>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_formats: vec!["csv".to_string()],
            compress: true,
            datasets: None,
        }
    }
}

fn env_placeholder_re() -> &'static Regex {
    static ENV_PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    ENV_PLACEHOLDER_RE
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env placeholder regex"))
}

impl TravelerInfoConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses `content`, replacing `${VAR}` placeholders through `env_lookup`.
    pub fn from_toml_str_with<E>(content: &str, env_lookup: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_env_vars(content, env_lookup);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Datasets to process: the configured list, or every dataset when none is set.
    pub fn datasets(&self) -> Result<Vec<Dataset>> {
        match &self.load.datasets {
            Some(names) if !names.is_empty() => names.iter().map(|n| n.parse()).collect(),
            _ => Ok(Dataset::ALL.to_vec()),
        }
    }

    pub fn table_formats(&self) -> Result<Vec<TableFormat>> {
        self.load.output_formats.iter().map(|f| f.parse()).collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_positive_number("source.timeout_seconds", self.source.timeout_seconds, 1)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string("auth.env_var", &self.auth.env_var)?;
        validation::validate_choices(
            "load.output_formats",
            &self.load.output_formats,
            TableFormat::NAMES,
        )?;
        self.datasets()?;
        Ok(())
    }
}

// Unknown variables are left untouched so the caller can tell they were never set.
fn substitute_env_vars<E>(content: &str, env_lookup: E) -> String
where
    E: Fn(&str) -> Option<String>,
{
    env_placeholder_re()
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env_lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        })
        .into_owned()
}

impl ConfigProvider for TravelerInfoConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn resolve_access_code(&self) -> Result<String> {
        self.auth.resolve()
    }
}

impl Validate for TravelerInfoConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
