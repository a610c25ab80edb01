//! 翻译后端客户端
//!
//! [`HopTranslator`] 是引擎与具体后端之间的接缝：worker 只依赖这个
//! trait，生产环境注入 [`MyMemoryClient`]，测试里注入脚本化的模拟
//! 实现。每个客户端实例绑定一条出口身份，拥有自己的 HTTP 会话。

pub mod mymemory;

use async_trait::async_trait;

use crate::error::HopError;

// 重新导出主要类型
pub use mymemory::MyMemoryClient;

/// 单跳翻译接口
///
/// 实现负责自己的有界重试与失败分类；调用方拿到的 [`HopError`]
/// 已经是最终结论，不应再重试同一跳。
#[async_trait]
pub trait HopTranslator: Send + Sync {
    /// 把 `text` 从 `from` 翻译到 `to`，完成一跳
    async fn translate_hop(&self, text: &str, from: &str, to: &str) -> Result<String, HopError>;
}
