// 集成测试公共模块
//
// 脚本化的模拟后端与引擎测试辅助

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use translation_relay::{HopChain, HopError, HopTranslator, ProgressSink, RelayEngine};

/// 按脚本回放结果的模拟后端
///
/// 每次 `translate_hop` 调用按顺序弹出脚本里的下一条结果；脚本耗尽
/// 后永远返回网络错误，所以空脚本可以模拟彻底死掉的出口。所有调用
/// 的 (text, from, to) 参数都会被记录下来供断言。
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, HopError>>>,
    calls: Mutex<Vec<(String, String, String)>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, HopError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// 每次调用前先睡 `delay`，模拟慢出口
    pub fn with_delay(script: Vec<Result<String, HopError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    /// 每一跳都失败的出口
    pub fn always_failing() -> Arc<Self> {
        Self::new(Vec::new())
    }

    /// 至今记录到的所有调用参数
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl HopTranslator for ScriptedBackend {
    async fn translate_hop(&self, text: &str, from: &str, to: &str) -> Result<String, HopError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((text.to_string(), from.to_string(), to.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(HopError::Network("script exhausted".to_string())))
    }
}

/// 记录每次进度回调的参数
pub struct RecordingSink {
    pub events: Mutex<Vec<(usize, String, bool)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<(usize, String, bool)> {
        self.events.lock().expect("events lock").clone()
    }
}

impl ProgressSink for RecordingSink {
    fn hop_completed(&self, worker: usize, lang: &str, success: bool) {
        self.events
            .lock()
            .expect("events lock")
            .push((worker, lang.to_string(), success));
    }
}

/// 用一组模拟后端搭一台引擎
pub fn engine_of(backends: &[Arc<ScriptedBackend>]) -> RelayEngine {
    let backends: Vec<Arc<dyn HopTranslator>> = backends
        .iter()
        .map(|backend| Arc::clone(backend) as Arc<dyn HopTranslator>)
        .collect();
    RelayEngine::with_backends(backends).expect("backend pool must not be empty")
}

pub fn chain_of(languages: &[&str]) -> HopChain {
    HopChain::new(languages.iter().map(|l| l.to_string()).collect()).expect("valid chain")
}

pub fn ok(text: &str) -> Result<String, HopError> {
    Ok(text.to_string())
}

pub fn network_err() -> Result<String, HopError> {
    Err(HopError::Network("simulated outage".to_string()))
}
