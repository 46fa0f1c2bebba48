use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{AggregateOptions, TierPolicy};

const DEFAULT_CONFIG_FILE: &str = "procurement";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub comparison: ComparisonConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 服务端默认比价策略，单次请求可覆盖
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub policy: TierPolicy,
    pub options: AggregateOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// 加载配置: 内置默认值 -> procurement.toml (APP_CONFIG_FILE 可改路径) -> APP_ 环境变量
    pub fn load() -> Result<Self> {
        let file = std::env::var("APP_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_with_file(&file)
    }

    /// 指定配置文件加载，文件不存在时只用默认值和环境变量
    pub fn load_with_file(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // 兼容旧的 SERVER_HOST / SERVER_PORT
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.comparison.policy.normalize_currency_codes();
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipTier;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_with_file("/nonexistent/procurement-settings").unwrap();
        assert_eq!(config.comparison.policy, TierPolicy::default());
        assert_eq!(config.comparison.options, AggregateOptions::default());
    }

    #[test]
    fn file_overrides_policy_and_normalizes_currency_codes() {
        let path = write_temp(
            "quote-comparison-config",
            r#"
[comparison.policy]
membership_tier = "premium"
max_vendors_per_group = 4
base_currency = "tl"

[comparison.policy.exchange_rates]
TL = "1"
USD = "35.10"

[comparison.options]
strict = true
"#,
        );

        let config = AppConfig::load_with_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        let policy = &config.comparison.policy;
        assert_eq!(policy.membership_tier, MembershipTier::Premium);
        assert_eq!(policy.max_vendors_per_group, 4);
        assert_eq!(policy.max_vendors_standard, 3);
        assert_eq!(policy.base_currency, "TL");
        assert_eq!(policy.exchange_rates.len(), 2);
        assert_eq!(policy.rate("USD"), Some(&BigDecimal::from_str("35.10").unwrap()));
        assert!(config.comparison.options.strict);
        assert!(!config.comparison.options.require_items);
    }
}
