//! 接力引擎统一错误处理
//!
//! 错误分为两层：
//!
//! - [`HopError`] — 单跳翻译失败。全部在 worker 内部被吸收为轨迹中的
//!   失败条目，永远不会越过 worker 传播给调用方。
//! - [`RelayError`] — 引擎层错误，调用方唯一可见的失败面。只有当整个
//!   worker 池没有产出任何可用结果时才会出现 [`RelayError::AllWorkersFailed`]。

use thiserror::Error;

/// 单跳错误的处理类别
///
/// worker 对三类错误一视同仁（跳过该跳继续走链），分类只用于
/// 日志与测试断言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HopErrorClass {
    /// 暂时性失败（网络、解码、配额），换个时间或出口重试可能成功
    Retryable,
    /// 永久性失败（语言对无效），同一跳上重试必然再次失败
    Unrecoverable,
    /// 后端调用"成功"但返回了空内容，结果不可用
    Empty,
}

/// 单跳翻译错误
///
/// 由 provider 客户端产生，worker 模式匹配后一律降级为轨迹中的
/// 失败条目。注意：`InvalidLanguagePair` 虽然是永久性错误，worker
/// 也不对它做特殊处理——这是沿用原有行为，见 `engine::worker` 的说明。
#[derive(Error, Debug, Clone)]
pub enum HopError {
    /// 网络请求失败（连接、超时）
    #[error("网络请求失败: {0}")]
    Network(String),

    /// 响应无法解码为合法的 JSON 结构
    #[error("响应解码失败: {0}")]
    Decode(String),

    /// 后端配额耗尽
    #[error("翻译配额已耗尽 (状态码 {0})")]
    QuotaExceeded(i64),

    /// 后端返回了其它异常状态码
    #[error("后端返回异常状态码 {0}")]
    BadStatus(i64),

    /// 请求格式错误：目标语言不被后端接受
    #[error("无效的语言对 {from} -> {to}")]
    InvalidLanguagePair { from: String, to: String },

    /// 后端返回了空翻译
    #[error("后端返回了空翻译")]
    EmptyResult,
}

impl HopError {
    /// 获取错误的处理类别
    pub fn class(&self) -> HopErrorClass {
        match self {
            HopError::Network(_) => HopErrorClass::Retryable,
            HopError::Decode(_) => HopErrorClass::Retryable,
            HopError::QuotaExceeded(_) => HopErrorClass::Retryable,
            HopError::BadStatus(_) => HopErrorClass::Retryable,
            HopError::InvalidLanguagePair { .. } => HopErrorClass::Unrecoverable,
            HopError::EmptyResult => HopErrorClass::Empty,
        }
    }

    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        self.class() == HopErrorClass::Retryable
    }
}

/// 引擎层错误
#[derive(Error, Debug)]
pub enum RelayError {
    /// 所有 worker 都已结束，且没有任何一个在最后一跳上落到成功结果
    #[error("所有 worker 均告失败，没有得到任何可用的翻译结果")]
    AllWorkersFailed,

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 跳转链不满足结构要求
    #[error("跳转链无效: {0}")]
    InvalidChain(String),

    /// HTTP 客户端构建失败（代理地址非法等）
    #[error("HTTP 客户端构建失败: {0}")]
    HttpClient(String),
}

impl From<toml::de::Error> for RelayError {
    fn from(error: toml::de::Error) -> Self {
        RelayError::Config(format!("TOML 解析错误: {}", error))
    }
}

/// 错误结果类型别名
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(HopError::Network("conn refused".into()).is_retryable());
        assert!(HopError::Decode("bad json".into()).is_retryable());
        assert!(HopError::QuotaExceeded(429).is_retryable());
        assert!(HopError::BadStatus(503).is_retryable());
        assert!(!HopError::EmptyResult.is_retryable());
        assert!(!HopError::InvalidLanguagePair {
            from: "auto".into(),
            to: "xx".into()
        }
        .is_retryable());
    }

    #[test]
    fn class_partition() {
        assert_eq!(
            HopError::InvalidLanguagePair {
                from: "en".into(),
                to: "zz".into()
            }
            .class(),
            HopErrorClass::Unrecoverable
        );
        assert_eq!(HopError::EmptyResult.class(), HopErrorClass::Empty);
        assert_eq!(
            HopError::QuotaExceeded(429).class(),
            HopErrorClass::Retryable
        );
    }

    #[test]
    fn display_messages_are_not_empty() {
        let errors = [
            RelayError::AllWorkersFailed.to_string(),
            RelayError::Config("x".into()).to_string(),
            RelayError::InvalidChain("x".into()).to_string(),
            RelayError::HttpClient("x".into()).to_string(),
        ];
        for msg in errors {
            assert!(!msg.is_empty());
        }
    }
}
