//! Worker：沿整条跳转链走一遍
//!
//! 每个 worker 绑定一条出口身份，独立走完跳转链，每跳结束（无论
//! 成败）向共享事件通道发一条 [`HopResult`]。失败的跳不推进文本与
//! 源语言，下一跳从最近一次成功的状态出发——单跳翻车不拖垮整条链。
//!
//! 注意：永久性错误（如无效语言对）也走同样的吸收路径。同一跳上它
//! 必然复现，吸收等于白白烧掉这一跳，但这是沿用已久的行为，改掉它
//! 会让部分结果的形状发生变化，这里保持原样。
//!
//! 取消是协作式的：只在跳转边界检查，进行中的网络调用总会先完成
//! 或超时。被取消的 worker 静默退出，不补发任何事件。

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::engine::{HopChain, HopResult};
use crate::normalize::normalize;
use crate::provider::HopTranslator;

/// 发往协调器的事件，按 worker 序号区分来源
#[derive(Debug, Clone)]
pub(crate) struct WorkerEvent {
    pub worker: usize,
    pub hop: HopResult,
}

/// 单个 worker 任务
///
/// 状态（当前文本、当前源语言）完全私有，只通过事件对外发声。
pub(crate) struct Worker {
    pub id: usize,
    pub backend: Arc<dyn HopTranslator>,
    pub events: mpsc::UnboundedSender<WorkerEvent>,
    pub cancel: CancellationToken,
}

impl Worker {
    /// 走完整条链后退出；事件数至多为链的跳数
    pub async fn run(self, input: String, chain: Arc<HopChain>) {
        let languages = chain.languages();
        let mut source = languages[0].clone();
        let mut text = normalize(&input);

        for target in &languages[1..] {
            if self.cancel.is_cancelled() {
                tracing::debug!(worker = self.id, "收到取消信号，在跳转边界退出");
                return;
            }

            match self
                .backend
                .translate_hop(&normalize(&text), &source, target)
                .await
            {
                Ok(translated) => {
                    let translated = normalize(&translated);
                    let event = WorkerEvent {
                        worker: self.id,
                        hop: HopResult::success(translated.clone(), target.clone()),
                    };
                    // 通道关闭说明协调器已经返回，结果不再被需要
                    if self.events.send(event).is_err() {
                        return;
                    }
                    text = translated;
                    source = target.clone();
                }
                Err(err) => {
                    tracing::debug!(
                        worker = self.id,
                        class = ?err.class(),
                        "跳转 {} -> {} 失败，跳过继续: {}",
                        source,
                        target,
                        err
                    );
                    let event = WorkerEvent {
                        worker: self.id,
                        hop: HopResult::failed(target.clone()),
                    };
                    if self.events.send(event).is_err() {
                        return;
                    }
                }
            }
        }
    }
}
