//! 接力引擎核心
//!
//! 一次 `translate` 调用的参与者：
//!
//! - [`HopChain`] — 有序的语言跳转链，首元素是源语言；
//! - [`Worker`](worker) — 沿整条链走一遍的并发任务，每个 worker 绑定
//!   一条出口身份；
//! - [`RelayEngine`](coordinator::RelayEngine) — 竞速协调器，消费
//!   worker 事件流，要么在第一条零失败轨迹上提前返回，要么在全部
//!   结束后按确定性规则挑一个最好的部分结果。
//!
//! 所有对象都只活在单次调用内，调用之间不共享任何状态。

pub mod coordinator;
pub(crate) mod worker;

// 重新导出主要类型
pub use coordinator::RelayEngine;

use crate::error::{RelayError, RelayResult};

/// 语言跳转链
///
/// 长度至少为 2：元素 0 是输入文本的源语言，其后每个元素是一跳的
/// 目标语言。相邻元素不得相同——这一点由构造方保证，引擎不做检查。
/// 链一旦建好便不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopChain(Vec<String>);

impl HopChain {
    /// 构建跳转链，长度不足 2 时拒绝
    pub fn new(languages: Vec<String>) -> RelayResult<Self> {
        if languages.len() < 2 {
            return Err(RelayError::InvalidChain(format!(
                "至少需要源语言和一个目标语言，得到 {} 个",
                languages.len()
            )));
        }
        Ok(Self(languages))
    }

    /// 从逗号分隔的语言串解析，如 `"auto,de,fr,en"`
    pub fn parse(input: &str) -> RelayResult<Self> {
        let languages: Vec<String> = input
            .split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self::new(languages)
    }

    /// 链上全部语言，含源语言
    pub fn languages(&self) -> &[String] {
        &self.0
    }

    /// 链长度（语言个数，= 跳数 + 1）
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 实际要执行的跳数
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }
}

/// 一跳的结果
///
/// `text` 为 `None` 表示该跳失败。worker 失败后不推进自己的状态，
/// 下一跳仍从最近一次成功的文本出发（跳过失败跳继续）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopResult {
    /// 该跳产出的归一化文本，失败时缺席
    pub text: Option<String>,
    /// 该跳的目标语言
    pub lang: String,
}

impl HopResult {
    pub fn success(text: String, lang: String) -> Self {
        Self {
            text: Some(text),
            lang,
        }
    }

    pub fn failed(lang: String) -> Self {
        Self { text: None, lang }
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// 一个 worker 走完整条链留下的轨迹
///
/// 长度恒等于链长度：第 0 条是合成条目（归一化后的输入文本 + 源
/// 语言），其后每跳一条，无论成败。
pub type Trace = Vec<HopResult>;

/// 竞速的最终结果
///
/// 由协调器构建一次，之后不再修改。
#[derive(Debug, Clone)]
pub struct RaceOutcome {
    /// 最终文本
    pub final_text: String,
    /// 胜出 worker 的完整轨迹
    pub trace: Trace,
}

/// 进度回调
///
/// 协调器每消费一个跳转事件调用一次，可用来驱动"正在输入…"之类的
/// 指示。实现必须廉价且不得阻塞：调用发生在协调器的事件循环里。
pub trait ProgressSink: Send + Sync {
    /// 某个 worker 完成了一跳（无论成败）
    fn hop_completed(&self, worker: usize, lang: &str, success: bool);
}

/// 默认的空进度回调
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn hop_completed(&self, _worker: usize, _lang: &str, _success: bool) {}
}
