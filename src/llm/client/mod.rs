//! LLM客户端 - 为素材检索提供结构化提取能力

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LLMConfig;

mod providers;
pub mod utils;

pub use providers::Extractable;
use providers::{ExtractionSettings, ModelBackend};
use utils::evaluate_befitting_model;

/// LLM客户端
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    backend: ModelBackend,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let backend = ModelBackend::connect(&config)?;
        Ok(Self { backend, config })
    }

    fn settings<'a>(&self, model: &'a str, system_prompt: &'a str) -> ExtractionSettings<'a> {
        ExtractionSettings {
            model,
            system_prompt,
            max_tokens: u64::from(self.config.max_tokens),
        }
    }

    /// 通用重试逻辑
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    warn!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 数据提取方法，首选模型失败后切换到备选模型
    pub async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: Extractable,
    {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config, system_prompt, user_prompt);

        debug!("🤖 {} 模型 {} 提取中", self.backend.provider(), befitting_model);
        let extractor = self.backend.extractor::<T>(&self.settings(&befitting_model, system_prompt));
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        let first = self
            .retry_with_backoff(|| async {
                tokio::time::timeout(timeout, extractor.extract(user_prompt))
                    .await
                    .map_err(|_| anyhow::anyhow!("model call timed out"))?
            })
            .await;

        match (first, fallover_model) {
            (Ok(result), _) => Ok(result),
            (Err(e), Some(model)) => {
                warn!(
                    "❌ 调用模型服务出错，尝试 {} 次均失败，尝试使用备选模型{}...{}",
                    self.config.retry_attempts, model, e
                );
                let fallback = self.backend.extractor::<T>(&self.settings(&model, system_prompt));
                tokio::time::timeout(timeout, fallback.extract(user_prompt))
                    .await
                    .map_err(|_| anyhow::anyhow!("model call timed out"))?
            }
            (Err(e), None) => Err(e),
        }
    }
}
