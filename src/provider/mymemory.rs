//! MyMemory 后端客户端
//!
//! 对 `ajaxfetch` 端点做单跳翻译调用。客户端自带有界重试：网络错误
//! 立即换次重试，解码失败等待一段时间再试，HTTP 414（URI 过长）直接
//! 放弃——重试改变不了请求长度。重试循环只包住"发请求 + 解码"；
//! 对解码成功的响应做状态分类只做一次，不再重试。

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use tokio::time::sleep;

use crate::config::{EgressEndpoint, ProviderConfig};
use crate::error::{HopError, RelayError, RelayResult};
use crate::provider::HopTranslator;

/// `ajaxfetch` 响应体
///
/// 非 200 的 responseStatus 可能是数字也可能是字符串，错误信息
/// 放在 translatedText 里。
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    #[serde(rename = "responseStatus")]
    response_status: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl ApiResponse {
    fn status_code(&self) -> i64 {
        match &self.response_status {
            Some(value) => value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .unwrap_or(-1),
            None => -1,
        }
    }
}

/// 绑定一条出口身份的 MyMemory 客户端
pub struct MyMemoryClient {
    http: reqwest::Client,
    api_url: String,
    max_attempts: usize,
    retry_delay: Duration,
    egress: String,
}

impl MyMemoryClient {
    /// 为一条出口身份构建客户端
    ///
    /// HTTP 会话经该出口的代理出网，单跳超时配置在会话级别，
    /// 协调器层不再设任何超时。
    pub fn new(egress: &EgressEndpoint, provider: &ProviderConfig) -> RelayResult<Self> {
        let proxy = reqwest::Proxy::all(egress.proxy_url())
            .map_err(|e| RelayError::HttpClient(format!("代理 {} 非法: {}", egress.proxy, e)))?;
        let http = reqwest::Client::builder()
            .proxy(proxy)
            .timeout(provider.hop_timeout())
            .build()
            .map_err(|e| RelayError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            api_url: provider.api_url.clone(),
            max_attempts: provider.max_attempts,
            retry_delay: provider.retry_delay(),
            egress: egress.proxy.clone(),
        })
    }

    /// 每次尝试用一个新的随机回信地址，后端按地址记配额
    fn random_contact() -> String {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        let name: String = (0..12)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        format!("{}@gmail.com", name)
    }
}

/// 对解码成功的响应做最终分类
fn classify(status: i64, translation: String, from: &str, to: &str) -> Result<String, HopError> {
    if status != 200 {
        if translation.contains("IS AN INVALID TARGET LANGUAGE") {
            return Err(HopError::InvalidLanguagePair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if status == 429 {
            return Err(HopError::QuotaExceeded(status));
        }
        return Err(HopError::BadStatus(status));
    }

    if translation.trim().is_empty() {
        return Err(HopError::EmptyResult);
    }

    Ok(translation)
}

#[async_trait]
impl HopTranslator for MyMemoryClient {
    async fn translate_hop(&self, text: &str, from: &str, to: &str) -> Result<String, HopError> {
        let langpair = format!("{}|{}", from, to);
        let mut decoded: Option<(i64, String)> = None;

        for attempt in 1..=self.max_attempts {
            let contact = Self::random_contact();
            let response = match self
                .http
                .get(&self.api_url)
                .query(&[
                    ("q", text),
                    ("langpair", langpair.as_str()),
                    ("mtonly", "1"),
                    ("de", contact.as_str()),
                ])
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(
                        egress = %self.egress,
                        attempt,
                        "请求失败: {}",
                        e
                    );
                    continue;
                }
            };

            let http_status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(egress = %self.egress, attempt, "读取响应失败: {}", e);
                    continue;
                }
            };

            match serde_json::from_str::<ApiResponse>(&body) {
                Ok(parsed) => {
                    if let Some(translation) =
                        parsed.response_data.as_ref().and_then(|d| d.translated_text.clone())
                    {
                        decoded = Some((parsed.status_code(), translation));
                        break;
                    }
                    // 结构对但缺字段，与解码失败同样处理
                    if http_status.as_u16() == 414 {
                        break;
                    }
                    tracing::warn!(
                        egress = %self.egress,
                        attempt,
                        "响应缺少译文字段，{}ms 后重试",
                        self.retry_delay.as_millis()
                    );
                    sleep(self.retry_delay).await;
                }
                Err(e) => {
                    if http_status.as_u16() == 414 {
                        // URI 过长，重试没有意义
                        break;
                    }
                    tracing::warn!(
                        egress = %self.egress,
                        attempt,
                        "JSON 解码失败 ({})，{}ms 后重试",
                        e,
                        self.retry_delay.as_millis()
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }

        let (status, translation) = decoded.ok_or_else(|| {
            HopError::Decode(format!(
                "经出口 {} 的 {} 次尝试均未得到可解码的响应",
                self.egress, self.max_attempts
            ))
        })?;

        classify(status, translation, from, to)
    }
}
