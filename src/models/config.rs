//! Client configuration for the Meridian SDK.
//!
//! All I^R (resolvable ignorance) is parameterized here.
//! The user resolves these unknowns at construction time, from a TOML file
//! or from environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a [`MeridianClient`](crate::MeridianClient).
///
/// K_i: The API is organization-scoped; every request path hangs off
/// `{api_url}/v1/organizations/{org_id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Meridian API (e.g. "https://api.withmeridian.com")
    pub api_url: String,

    /// Organization identifier
    pub org_id: String,

    /// API key (can also be set via the `api_key_env` env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible completions endpoint for router execution.
    /// Defaults to `{api_url}/v1/openai` when unset.
    #[serde(default)]
    pub gateway_url: Option<String>,

    /// Request timeout in seconds for CRUD calls
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Request timeout in seconds for judge evaluations and router runs,
    /// which block on server-side LLM calls
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "MERIDIAN_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_evaluation_timeout() -> u64 {
    100
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the
    /// organization coordinates.
    pub fn new(api_url: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            org_id: org_id.into(),
            api_key: None,
            api_key_env: default_api_key_env(),
            gateway_url: None,
            timeout_secs: default_timeout(),
            evaluation_timeout_secs: default_evaluation_timeout(),
        }
    }

    /// Set an explicit API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// B_i(file exists) → Result
    /// B_i(file is valid TOML) → Result
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Resolve the API key from config or environment.
    ///
    /// B_i(api key available) → Result
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        // First check explicit api_key in config
        if let Some(key) = &self.api_key {
            return Ok(expand_env_vars(key));
        }

        // Then check environment variable
        std::env::var(&self.api_key_env).map_err(|_| ConfigError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })
    }

    /// Organization-scoped base path all resource requests hang off.
    pub fn organization_base_path(&self) -> String {
        format!(
            "{}/v1/organizations/{}/",
            self.api_url.trim_end_matches('/'),
            self.org_id
        )
    }

    /// Effective completions endpoint for router execution.
    pub fn effective_gateway_url(&self) -> String {
        match &self.gateway_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/v1/openai", self.api_url.trim_end_matches('/')),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

    for cap in re.captures_iter(s) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

/// Configuration errors.
///
/// Epistemic origin:
/// - B_i falsified: File not found, parse error
/// - I^B materialized: Missing required values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Missing API key: set {env_var} env var or api_key in config")]
    MissingApiKey { env_var: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_url = "https://api.example.test"
org_id = "org-1"
"#
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_url, "https://api.example.test");
        assert_eq!(config.org_id, "org-1");
        assert_eq!(config.api_key_env, "MERIDIAN_API_KEY");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.evaluation_timeout_secs, 100);
        assert!(config.gateway_url.is_none());
    }

    #[test]
    fn test_base_paths() {
        let config = ClientConfig::new("https://api.example.test/", "org-1");
        assert_eq!(
            config.organization_base_path(),
            "https://api.example.test/v1/organizations/org-1/"
        );
        assert_eq!(
            config.effective_gateway_url(),
            "https://api.example.test/v1/openai"
        );

        let config = ClientConfig {
            gateway_url: Some("https://gateway.example.test/v1/".to_string()),
            ..config
        };
        assert_eq!(
            config.effective_gateway_url(),
            "https://gateway.example.test/v1"
        );
    }

    #[test]
    fn test_resolve_api_key_prefers_explicit() {
        let config = ClientConfig::new("https://api.example.test", "org-1").with_api_key("sk-test");
        assert_eq!(config.resolve_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let mut config = ClientConfig::new("https://api.example.test", "org-1");
        config.api_key_env = "MERIDIAN_TEST_KEY_THAT_IS_NOT_SET".to_string();
        let err = config.resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("MERIDIAN_TEST_KEY_THAT_IS_NOT_SET"));
    }

    #[test]
    fn test_expand_env_vars_leaves_unknown() {
        assert_eq!(
            expand_env_vars("Bearer ${MERIDIAN_UNSET_PLACEHOLDER}"),
            "Bearer ${MERIDIAN_UNSET_PLACEHOLDER}"
        );
    }
}
