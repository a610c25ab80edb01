//! # Translation Relay
//!
//! 把文本沿语言跳转链反复送入机器翻译后端的并发接力引擎。后端不
//! 可靠，所以每次调用会在多条出口路径（代理）上各派一个 worker
//! 同时竞速：第一个零失败走完整条链的 worker 立即胜出；谁都没做到
//! 时按确定性规则挑最好的部分结果。
//!
//! ## 模块组织
//!
//! - `engine` - 核心引擎：跳转链、worker、竞速协调器
//! - `provider` - 翻译后端客户端与有界重试
//! - `normalize` - 每跳前后的文本清洗
//! - `chain` - 随机打乱链构建
//! - `config` - 配置装载与验证
//! - `error` - 统一错误类型
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use translation_relay::{HopChain, RelayConfig, RelayEngine};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RelayConfig::load()?;
//! let engine = RelayEngine::from_config(&config)?;
//! let chain = HopChain::parse("auto,fr,en")?;
//! let outcome = engine.translate("hello world", &chain).await?;
//! println!("{}", outcome.final_text);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod provider;

// Re-export commonly used items for convenience
pub use chain::scramble_chain;
pub use config::{EgressConfig, EgressEndpoint, ProviderConfig, RelayConfig, ScrambleConfig};
pub use engine::{
    HopChain, HopResult, NoProgress, ProgressSink, RaceOutcome, RelayEngine, Trace,
};
pub use error::{HopError, HopErrorClass, RelayError, RelayResult};
pub use normalize::normalize;
pub use provider::{HopTranslator, MyMemoryClient};
