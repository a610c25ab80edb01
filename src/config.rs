//! 接力引擎配置管理
//!
//! 配置在进程启动时装载一次，之后作为不可变结构注入
//! [`RelayEngine`](crate::engine::RelayEngine)，引擎运行期间不再读取
//! 任何文件或环境变量。支持配置文件、环境变量覆盖和默认值。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};

/// 配置常量
pub mod constants {
    /// 默认翻译后端地址
    pub const DEFAULT_API_URL: &str = "https://mymemory.translated.net/api/ajaxfetch";
    /// 单跳 HTTP 超时（秒）
    pub const DEFAULT_HOP_TIMEOUT_SECS: u64 = 5;
    /// 单跳最大尝试次数
    pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
    /// 解码失败后的重试等待（毫秒）
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
    /// 打乱链的中间跳数
    pub const DEFAULT_SCRAMBLE_CHAIN_LENGTH: usize = 5;
    /// 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "en";
    /// 默认打乱语言池
    pub const DEFAULT_SCRAMBLE_LANGUAGES: &[&str] =
        &["de", "fr", "ja", "zh", "ru", "ar", "fi", "hu"];

    /// 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "relay.toml",
        ".relay.toml",
        "/etc/translation-relay/relay.toml",
    ];
}

/// 一条出口身份：一个独立的出站网络路径
///
/// 每个 worker 恰好绑定一条出口身份，用不同代理分散对同一后端的
/// 并发尝试。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgressEndpoint {
    /// 代理地址，`host:port` 或完整 URL
    pub proxy: String,
}

impl EgressEndpoint {
    /// 规整为 reqwest 可用的代理 URL，裸 `host:port` 补上 http 前缀
    pub fn proxy_url(&self) -> String {
        if self.proxy.contains("://") {
            self.proxy.clone()
        } else {
            format!("http://{}", self.proxy)
        }
    }
}

/// 翻译后端（provider）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// 后端 API 地址
    pub api_url: String,
    /// 单跳 HTTP 超时（秒）
    pub hop_timeout_secs: u64,
    /// 单跳最大尝试次数
    pub max_attempts: usize,
    /// 解码失败后的重试等待（毫秒）
    pub retry_delay_ms: u64,
}

impl ProviderConfig {
    pub fn hop_timeout(&self) -> Duration {
        Duration::from_secs(self.hop_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            hop_timeout_secs: constants::DEFAULT_HOP_TIMEOUT_SECS,
            max_attempts: constants::DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// 出口池配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EgressConfig {
    /// 代理地址列表，每条对应一个并发 worker
    pub proxies: Vec<String>,
}

impl EgressConfig {
    /// 展开为出口身份列表
    pub fn endpoints(&self) -> Vec<EgressEndpoint> {
        self.proxies
            .iter()
            .map(|proxy| EgressEndpoint {
                proxy: proxy.clone(),
            })
            .collect()
    }
}

/// 打乱链配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrambleConfig {
    /// 可供抽取的中间语言池
    pub languages: Vec<String>,
    /// 每条打乱链抽取的中间跳数
    pub chain_length: usize,
    /// 链尾的目标语言
    pub default_target: String,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            languages: constants::DEFAULT_SCRAMBLE_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            chain_length: constants::DEFAULT_SCRAMBLE_CHAIN_LENGTH,
            default_target: constants::DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

/// 接力引擎总配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    pub provider: ProviderConfig,
    pub egress: EgressConfig,
    pub scramble: ScrambleConfig,
}

impl RelayConfig {
    /// 从指定文件装载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> RelayResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RelayError::Config(format!(
                "无法读取配置文件 {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let mut config: RelayConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 按固定搜索路径装载配置，找不到任何文件时退回默认值
    pub fn load() -> RelayResult<Self> {
        for path in constants::CONFIG_PATHS {
            if Path::new(path).exists() {
                tracing::info!("从 {} 装载配置", path);
                return Self::from_file(path);
            }
        }
        tracing::info!("未找到配置文件，使用默认配置");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_url) = std::env::var("RELAY_API_URL") {
            if !api_url.trim().is_empty() {
                tracing::info!("环境变量覆盖 API URL: {}", api_url);
                self.provider.api_url = api_url;
            }
        }
        if let Ok(proxies) = std::env::var("RELAY_PROXIES") {
            let proxies: Vec<String> = proxies
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if !proxies.is_empty() {
                self.egress.proxies = proxies;
            }
        }
        if let Ok(target) = std::env::var("RELAY_TARGET_LANG") {
            if !target.trim().is_empty() {
                self.scramble.default_target = target;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> RelayResult<()> {
        if self.egress.proxies.is_empty() {
            return Err(RelayError::Config(
                "出口池为空：至少需要一条代理地址".to_string(),
            ));
        }

        if self.provider.max_attempts == 0 {
            return Err(RelayError::Config("单跳尝试次数不能为0".to_string()));
        }

        if self.provider.hop_timeout_secs == 0 {
            return Err(RelayError::Config("单跳超时不能为0".to_string()));
        }

        if self.scramble.chain_length == 0 {
            return Err(RelayError::Config("打乱链跳数不能为0".to_string()));
        }

        if self.scramble.chain_length > self.scramble.languages.len() {
            return Err(RelayError::Config(format!(
                "打乱链跳数 {} 超过语言池大小 {}",
                self.scramble.chain_length,
                self.scramble.languages.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with_proxy() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.egress.proxies = vec!["127.0.0.1:3128".to_string()];
        config
    }

    #[test]
    fn default_config_requires_proxies() {
        // 默认配置出口池为空，验证必须失败
        assert!(RelayConfig::default().validate().is_err());
        assert!(config_with_proxy().validate().is_ok());
    }

    #[test]
    fn rejects_oversized_scramble_chain() {
        let mut config = config_with_proxy();
        config.scramble.chain_length = config.scramble.languages.len() + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn proxy_url_gets_scheme_prefix() {
        let plain = EgressEndpoint {
            proxy: "10.0.0.1:8080".to_string(),
        };
        assert_eq!(plain.proxy_url(), "http://10.0.0.1:8080");

        let full = EgressEndpoint {
            proxy: "http://10.0.0.1:8080".to_string(),
        };
        assert_eq!(full.proxy_url(), "http://10.0.0.1:8080");
    }

    #[test]
    fn loads_partial_toml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"
[provider]
hop_timeout_secs = 9

[egress]
proxies = ["127.0.0.1:3128", "10.0.0.2:3128"]
"#
        )
        .expect("write config");

        let config = RelayConfig::from_file(file.path()).expect("config should load");
        assert_eq!(config.provider.hop_timeout_secs, 9);
        // 未写出的字段落回默认值
        assert_eq!(config.provider.max_attempts, constants::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.egress.endpoints().len(), 2);
    }
}
