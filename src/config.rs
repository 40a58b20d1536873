use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::prompt::{DEFAULT_SYSTEM_MESSAGE, DEFAULT_USER_MESSAGE};

/// Deployment used when `AZURE_OPENAI_DEPLOYMENT` is not set.
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
/// Subject image checked when `PURECHECK_IMAGE` is not set.
pub const DEFAULT_IMAGE_PATH: &str = "dirty_images/img1.JPEG";
/// Reference image of a clean surface.
pub const DEFAULT_CLEAN_EXAMPLE: &str = "images/img1.JPEG";
/// Reference image of a dirty surface.
pub const DEFAULT_DIRTY_EXAMPLE: &str = "images/img13.JPEG";

/// Connection settings for an Azure OpenAI deployment.
#[derive(Clone)]
pub struct AzureConfig {
    /// Base URL of the deployment (e.g., "https://my-resource.openai.azure.com/openai/deployments/gpt-4o")
    pub endpoint: String,
    /// Value sent in the `api-key` header
    pub api_key: String,
    /// Value sent as the `api-version` query parameter
    pub api_version: String,
    /// Deployment/model name sent as `model` in the request body
    pub deployment: String,
}

impl AzureConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
        }
    }

    /// Set the deployment name.
    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }
}

// Keeps the key out of logs and panic messages.
impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}

/// Per-request options for the chat-completions call.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOptions {
    /// Maximum tokens to generate (default: 2000)
    pub max_tokens: u32,
    /// Request timeout (default: 120s, `None` waits indefinitely)
    pub timeout: Option<Duration>,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Everything one cleanliness check needs.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub azure: AzureConfig,
    /// Image being judged
    pub image_path: PathBuf,
    /// Exemplar shown to the model as "clean"
    pub clean_example: PathBuf,
    /// Exemplar shown to the model as "dirty"
    pub dirty_example: PathBuf,
    pub system_message: String,
    pub user_message: String,
    pub options: InferenceOptions,
}

impl CheckConfig {
    /// Create a config with the default image paths and instructions.
    pub fn new(azure: AzureConfig) -> Self {
        Self {
            azure,
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            clean_example: PathBuf::from(DEFAULT_CLEAN_EXAMPLE),
            dirty_example: PathBuf::from(DEFAULT_DIRTY_EXAMPLE),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            user_message: DEFAULT_USER_MESSAGE.to_string(),
            options: InferenceOptions::default(),
        }
    }

    /// Set the image to check.
    pub fn image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = path.into();
        self
    }

    /// Set both exemplar images.
    pub fn examples(mut self, clean: impl Into<PathBuf>, dirty: impl Into<PathBuf>) -> Self {
        self.clean_example = clean.into();
        self.dirty_example = dirty.into();
        self
    }

    /// Override the system and user instructions.
    pub fn messages(mut self, system: impl Into<String>, user: impl Into<String>) -> Self {
        self.system_message = system.into();
        self.user_message = user.into();
        self
    }

    /// Set the inference options.
    pub fn options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the config from process environment variables.
    ///
    /// Required: `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`,
    /// `AZURE_API_VERSION_GPT4`. Optional overrides:
    /// `AZURE_OPENAI_DEPLOYMENT`, `PURECHECK_IMAGE`,
    /// `PURECHECK_CLEAN_EXAMPLE`, `PURECHECK_DIRTY_EXAMPLE`,
    /// `PURECHECK_MAX_TOKENS`, `PURECHECK_TIMEOUT_SECS` (0 disables).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let mut azure = AzureConfig::new(
            require("AZURE_OPENAI_ENDPOINT")?,
            require("AZURE_OPENAI_API_KEY")?,
            require("AZURE_API_VERSION_GPT4")?,
        );
        if let Some(deployment) = get("AZURE_OPENAI_DEPLOYMENT") {
            azure = azure.deployment(deployment);
        }

        let mut config = Self::new(azure);
        if let Some(path) = get("PURECHECK_IMAGE") {
            config.image_path = PathBuf::from(path);
        }
        if let Some(path) = get("PURECHECK_CLEAN_EXAMPLE") {
            config.clean_example = PathBuf::from(path);
        }
        if let Some(path) = get("PURECHECK_DIRTY_EXAMPLE") {
            config.dirty_example = PathBuf::from(path);
        }
        if let Some(value) = get("PURECHECK_MAX_TOKENS") {
            config.options.max_tokens = parse_number("PURECHECK_MAX_TOKENS", &value)?;
        }
        if let Some(value) = get("PURECHECK_TIMEOUT_SECS") {
            let secs: u64 = parse_number("PURECHECK_TIMEOUT_SECS", &value)?;
            config.options.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
        ("AZURE_OPENAI_API_KEY", "secret"),
        ("AZURE_API_VERSION_GPT4", "2024-02-15-preview"),
    ];

    #[test]
    fn from_lookup_applies_defaults() {
        let config = CheckConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.azure.deployment, "gpt-4o");
        assert_eq!(config.image_path, PathBuf::from("dirty_images/img1.JPEG"));
        assert_eq!(config.clean_example, PathBuf::from("images/img1.JPEG"));
        assert_eq!(config.dirty_example, PathBuf::from("images/img13.JPEG"));
        assert_eq!(config.options, InferenceOptions::default());
        assert_eq!(config.options.max_tokens, 2000);
    }

    #[test]
    fn from_lookup_missing_required() {
        let err = CheckConfig::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AZURE_API_VERSION_GPT4")));
    }

    #[test]
    fn from_lookup_blank_counts_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[1] = ("AZURE_OPENAI_API_KEY", "  ");
        let err = CheckConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AZURE_OPENAI_API_KEY")));
    }

    #[test]
    fn from_lookup_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("AZURE_OPENAI_DEPLOYMENT", "gpt-4o-mini"),
            ("PURECHECK_IMAGE", "shots/part.png"),
            ("PURECHECK_MAX_TOKENS", "512"),
            ("PURECHECK_TIMEOUT_SECS", "0"),
        ]);
        let config = CheckConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.azure.deployment, "gpt-4o-mini");
        assert_eq!(config.image_path, PathBuf::from("shots/part.png"));
        assert_eq!(config.options.max_tokens, 512);
        assert_eq!(config.options.timeout, None);
    }

    #[test]
    fn from_lookup_rejects_bad_number() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PURECHECK_MAX_TOKENS", "lots"));
        let err = CheckConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "PURECHECK_MAX_TOKENS", .. }
        ));
    }

    #[test]
    fn debug_redacts_api_key() {
        let azure = AzureConfig::new("https://x", "super-secret", "v1");
        let rendered = format!("{:?}", azure);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
