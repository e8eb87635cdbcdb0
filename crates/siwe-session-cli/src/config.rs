/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed provider and session configuration
[POS]:    Configuration layer - CLI setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use siwe_session::{ProviderConfig, SessionConfig};

/// Top-level configuration for the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Provider endpoints and account
    pub provider: ProviderConfig,
    /// Overrides the 4 hour default session length
    #[serde(default)]
    pub session_duration_ms: Option<u64>,
    /// Overrides the default sign-in statement
    #[serde(default)]
    pub statement: Option<String>,
    /// Environment variable holding the hex private key
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

fn default_private_key_env() -> String {
    "SIWE_PRIVATE_KEY".to_string()
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("parse config yaml")?;
        Ok(config)
    }

    /// Session settings derived from the provider plus local overrides
    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config =
            SessionConfig::from_provider(&self.provider).context("build session config")?;
        if let Some(duration) = self.session_duration_ms {
            config = config.with_session_duration_ms(duration);
        }
        if let Some(statement) = &self.statement {
            config = config.with_statement(statement.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use siwe_session::Network;

    #[test]
    fn test_load_minimal_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "provider:\n  base_url: https://fiat-connect-api.com\n  network: alfajores\n  account_address: \"0x0d8e461687b7d06f86ec348e0c270b0f279855f0\"\n"
        )
        .unwrap();

        let config = CliConfig::from_file(file.path()).unwrap();
        assert_eq!(config.provider.network, Network::Alfajores);
        assert_eq!(config.private_key_env, "SIWE_PRIVATE_KEY");

        let session = config.session_config().unwrap();
        assert_eq!(session.chain_id, 44787);
        assert_eq!(session.session_duration_ms, 14_400_000);
        assert_eq!(session.login_url.as_str(), "https://fiat-connect-api.com/auth/login");
    }

    #[test]
    fn test_overrides_apply() {
        let yaml = r#"
provider:
  base_url: https://provider.example
  network: mainnet
  account_address: "0x0d8e461687b7d06f86ec348e0c270b0f279855f0"
  api_key: secret
  timeout_ms: 1500
session_duration_ms: 60000
statement: Sign in to provider
private_key_env: PROVIDER_KEY
"#;
        let config: CliConfig = serde_yaml::from_str(yaml).unwrap();
        let session = config.session_config().unwrap();

        assert_eq!(session.chain_id, 42220);
        assert_eq!(session.session_duration_ms, 60_000);
        assert_eq!(session.statement, "Sign in to provider");
        assert_eq!(session.headers.get("authorization").unwrap(), "Bearer secret");
        assert_eq!(config.private_key_env, "PROVIDER_KEY");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CliConfig::from_file("/nonexistent/siwe.yaml").unwrap_err();
        assert!(err.to_string().contains("read config"));
    }
}
