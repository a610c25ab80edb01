//! 竞速协调器
//!
//! [`RelayEngine`] 是引擎的入口。一次 [`translate`](RelayEngine::translate)
//! 调用会为每条出口身份派一个 worker，全部同时开跑，然后消费共享
//! 事件流：
//!
//! 1. 某个 worker 的轨迹凑满链长且零失败 → 取消其余 worker，立即
//!    返回它的结果。这是唯一的提前返回路径。
//! 2. 所有 worker 都结束而没有人做到零失败 → 在"最后一跳成功"的
//!    轨迹里选成功跳数最多的；平分时序号小的 worker 胜出（出口池
//!    里排得靠前的那条）。
//! 3. 连一条"最后一跳成功"的轨迹都没有 → [`RelayError::AllWorkersFailed`]。
//!
//! 协调器只读事件，从不触碰 worker 的内部状态；事件以 worker 序号
//! 区分来源，对任意交错都成立。协调器层没有超时，超时全部在
//! provider 客户端的单跳调用里。

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::engine::worker::{Worker, WorkerEvent};
use crate::engine::{HopChain, HopResult, NoProgress, ProgressSink, RaceOutcome, Trace};
use crate::error::{RelayError, RelayResult};
use crate::normalize::normalize;
use crate::provider::{HopTranslator, MyMemoryClient};

/// 翻译接力引擎
///
/// 持有每条出口身份对应的后端客户端。配置在构建时注入，此后不可
/// 变；引擎本身无状态，可跨调用复用，也可在多个任务间共享。
pub struct RelayEngine {
    backends: Vec<Arc<dyn HopTranslator>>,
    progress: Arc<dyn ProgressSink>,
}

impl RelayEngine {
    /// 按配置构建引擎，每条代理出口各建一个 MyMemory 客户端
    pub fn from_config(config: &RelayConfig) -> RelayResult<Self> {
        config.validate()?;
        let mut backends: Vec<Arc<dyn HopTranslator>> = Vec::new();
        for endpoint in config.egress.endpoints() {
            let client = MyMemoryClient::new(&endpoint, &config.provider)?;
            backends.push(Arc::new(client));
        }
        Ok(Self {
            backends,
            progress: Arc::new(NoProgress),
        })
    }

    /// 用现成的后端实例构建引擎，测试与嵌入场景用
    pub fn with_backends(backends: Vec<Arc<dyn HopTranslator>>) -> RelayResult<Self> {
        if backends.is_empty() {
            return Err(RelayError::Config(
                "出口池为空：至少需要一个后端".to_string(),
            ));
        }
        Ok(Self {
            backends,
            progress: Arc::new(NoProgress),
        })
    }

    /// 挂上进度回调
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// 把文本沿跳转链翻译一遍
    ///
    /// 返回最终文本与胜出 worker 的完整轨迹。只有整个池子没有任何
    /// 可用结果时才返回错误。
    pub async fn translate(&self, text: &str, chain: &HopChain) -> RelayResult<RaceOutcome> {
        let chain = Arc::new(chain.clone());
        let full_len = chain.len();
        let (tx, mut rx) = mpsc::unbounded_channel::<WorkerEvent>();
        let cancel = CancellationToken::new();

        // 每条轨迹先放合成的第 0 条：归一化输入 + 源语言
        let normalized_input = normalize(text);
        let mut traces: Vec<Trace> = (0..self.backends.len())
            .map(|_| {
                vec![HopResult::success(
                    normalized_input.clone(),
                    chain.languages()[0].clone(),
                )]
            })
            .collect();

        tracing::debug!(
            workers = self.backends.len(),
            hops = chain.hop_count(),
            "开始竞速翻译"
        );

        for (id, backend) in self.backends.iter().enumerate() {
            let worker = Worker {
                id,
                backend: Arc::clone(backend),
                events: tx.clone(),
                cancel: cancel.clone(),
            };
            tokio::spawn(worker.run(text.to_string(), Arc::clone(&chain)));
        }
        // 只留 worker 手里的发送端，全部退出后事件流自然关闭
        drop(tx);

        let mut active = self.backends.len();
        while active > 0 {
            let Some(event) = rx.recv().await else {
                break;
            };
            self.progress
                .hop_completed(event.worker, &event.hop.lang, event.hop.is_success());
            traces[event.worker].push(event.hop);

            if traces[event.worker].len() == full_len {
                // 这个 worker 走完了整条链
                active -= 1;
                let trace = &traces[event.worker];
                if trace.iter().all(HopResult::is_success) {
                    // 零失败轨迹：取消其余 worker，立即返回
                    cancel.cancel();
                    tracing::info!(worker = event.worker, "零失败走完跳转链，提前返回");
                    let final_text = trace
                        .last()
                        .and_then(|hop| hop.text.clone())
                        .unwrap_or_default();
                    return Ok(RaceOutcome {
                        final_text,
                        trace: trace.clone(),
                    });
                }
            }
        }

        self.select_fallback(traces, full_len)
    }

    /// 兜底评分：没有零失败轨迹时挑最好的部分结果
    ///
    /// 只考虑最后一跳成功的完整轨迹——最后一跳失败意味着最终文本
    /// 停在中间语言上，不可用。得分是成功条目数；按 worker 序号
    /// 升序扫描并用严格大于比较，平分时自然落在序号小的 worker 上。
    fn select_fallback(&self, traces: Vec<Trace>, full_len: usize) -> RelayResult<RaceOutcome> {
        let mut best: Option<(usize, usize)> = None;
        for (id, trace) in traces.iter().enumerate() {
            if trace.len() != full_len {
                continue;
            }
            let landed = trace.last().map(HopResult::is_success).unwrap_or(false);
            if !landed {
                continue;
            }
            let score = trace.iter().filter(|hop| hop.is_success()).count();
            let better = match best {
                None => true,
                Some((best_score, _)) => score > best_score,
            };
            if better {
                best = Some((score, id));
            }
        }

        match best {
            Some((score, id)) => {
                tracing::warn!(
                    worker = id,
                    score,
                    total = full_len,
                    "没有零失败的轨迹，回退选择部分结果"
                );
                let trace = traces[id].clone();
                let final_text = trace
                    .last()
                    .and_then(|hop| hop.text.clone())
                    .unwrap_or_default();
                Ok(RaceOutcome { final_text, trace })
            }
            None => {
                tracing::error!("所有 worker 均告失败");
                Err(RelayError::AllWorkersFailed)
            }
        }
    }
}
