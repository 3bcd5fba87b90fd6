use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use super::{DispatchError, DispatchOutcome, DispatchResult, Dispatcher};
use crate::context::PageContext;
use crate::message::OutboundMessage;

/// 下载设置接口路径，直接拼接在 `host` 之后
pub const SETUP_PATH: &str = "download/setup";

/// 请求体的内容类型
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// HTTP 客户端选项
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// 请求超时，None 表示不设超时
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

/// 直接 POST 到后端的投递器
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDispatcher {
    /// `endpoint = host + "download/setup"`，按字符串拼接，不补斜杠
    pub fn new(host: &str, options: &HttpOptions) -> DispatchResult<Self> {
        let endpoint = format!("{}{}", host, SETUP_PATH);
        Url::parse(&endpoint).map_err(|source| DispatchError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// 从上下文的 `host` 构建
    pub fn from_context(ctx: &PageContext, options: &HttpOptions) -> DispatchResult<Self> {
        let host = ctx.str_value("host").ok_or(DispatchError::MissingHost)?;
        Self::new(host, options)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, message: &OutboundMessage) -> DispatchResult<DispatchOutcome> {
        let body = message.to_json()?;
        debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let response = match self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("download setup request failed: {}", e);
                return Ok(DispatchOutcome::TransportFailed {
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!("download setup rejected with status {}", status.as_u16());
            return Ok(DispatchOutcome::Rejected {
                status: status.as_u16(),
            });
        }

        // 响应体只记日志，解析失败不影响成功判定
        let body = match response.text().await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("download setup response is not JSON: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("failed to read download setup response: {}", e);
                None
            }
        };

        info!("download setup accepted: {:?}", body);
        Ok(DispatchOutcome::Accepted { body })
    }

    fn awaits_response(&self) -> bool {
        true
    }
}
