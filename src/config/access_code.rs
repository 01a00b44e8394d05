use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ACCESS_CODE_ENV_VAR: &str = "WSDOT_TRAFFIC_API_CODE";
pub const ACCESS_CODE_FILE: &str = "accesscode.txt";

/// Where the WSDOT access code may come from, in priority order:
/// explicit value, environment variable, access code file.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub access_code: Option<String>,
    pub env_var: String,
    pub access_code_file: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_code: None,
            env_var: ACCESS_CODE_ENV_VAR.to_string(),
            access_code_file: PathBuf::from(ACCESS_CODE_FILE),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_code", &self.access_code.as_ref().map(|_| "<redacted>"))
            .field("env_var", &self.env_var)
            .field("access_code_file", &self.access_code_file)
            .finish()
    }
}

impl AuthConfig {
    pub fn resolve(&self) -> Result<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolves the access code using `env_lookup` in place of the process environment.
    pub fn resolve_with<E>(&self, env_lookup: E) -> Result<String>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(code) = self.access_code.as_deref().and_then(usable) {
            tracing::debug!("Using access code from configuration");
            return Ok(code);
        }

        if let Some(code) = env_lookup(&self.env_var).as_deref().and_then(usable) {
            tracing::debug!("Using access code from {}", self.env_var);
            return Ok(code);
        }

        if let Some(code) = read_code_file(&self.access_code_file)? {
            tracing::debug!(
                "Using access code from {}",
                self.access_code_file.display()
            );
            return Ok(code);
        }

        Err(EtlError::AuthenticationMissing {
            env_var: self.env_var.clone(),
        })
    }
}

fn usable(code: &str) -> Option<String> {
    let code = code.trim();
    // An unresolved ${VAR} left behind by config substitution
    if code.is_empty() || (code.starts_with("${") && code.ends_with('}')) {
        None
    } else {
        Some(code.to_string())
    }
}

fn read_code_file(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(usable(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EtlError::IoError(e)),
    }
}
